//! PmStation Firmware — Main Entry Point
//!
//! Three long-running tasks share two stores:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  Core 0                                                        │
//! │   pm-sampler : UartTransport ─▶ SamplingScheduler ─▶ SampleStore│
//! │   weather    : SimWeatherSource ─▶ WeatherCollector ─▶ WeatherStore
//! │                                                                │
//! │  main thread                                                   │
//! │   TelemetryService ◀── both stores ──▶ LogEventSink (TELEM)    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::peripherals::Peripherals;
use log::info;

use pmstation::adapters::log_sink::LogEventSink;
use pmstation::adapters::time::SystemClock;
use pmstation::adapters::uart::UartTransport;
use pmstation::app::service::TelemetryService;
use pmstation::config::SystemConfig;
use pmstation::drivers::task_pin::{self, spawn_on_core};
use pmstation::pins;
use pmstation::scheduler::SamplingScheduler;
use pmstation::sensors::SensorDescriptor;
use pmstation::sensors::pmsx003::Pmsx003Decoder;
use pmstation::sensors::weather::{SimWeatherSource, WeatherCollector, WeatherStore};
use pmstation::store::SampleStore;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PmStation v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate()?;
    info!("Station uid: {}", config.device_uid);

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    info!("Initializing UART{} for PMSX003", pins::PMS_UART_PORT);
    let transport = UartTransport::new(
        peripherals.uart2,
        peripherals.pins.gpio17,
        peripherals.pins.gpio16,
    )?;

    // ── 4. Shared stores ──────────────────────────────────────
    let descriptor = SensorDescriptor::from_config(Pmsx003Decoder, &config.pm_sensor)?;
    let samples = Arc::new(SampleStore::for_sensor(&descriptor));
    let weather = Arc::new(WeatherStore::new());

    // ── 5. Tasks ──────────────────────────────────────────────
    let sampler = SamplingScheduler::new(
        descriptor,
        transport,
        SystemClock::new(FreeRtos),
        LogEventSink::new(),
        Arc::clone(&samples),
        config.pm_sensor.read_timeout_ms,
    );
    spawn_on_core(task_pin::PM_SAMPLER, move || sampler.run())?;

    let collector = WeatherCollector::new(
        SimWeatherSource::from_entropy(),
        SystemClock::new(FreeRtos),
        Arc::clone(&weather),
        config.weather_interval_ms,
    );
    spawn_on_core(task_pin::WEATHER, move || collector.run())?;

    // ── 6. Publish loop (never returns) ───────────────────────
    TelemetryService::new(&config, weather, samples)
        .run(SystemClock::new(FreeRtos), LogEventSink::new())
}
