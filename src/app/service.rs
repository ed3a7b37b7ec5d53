//! Telemetry service — assembles and emits the station's periodic message.
//!
//! [`TelemetryService`] is the consumer side of both stores.  It never
//! talks to hardware; the clock and the event sink are injected at call
//! sites, so the whole publish path runs under test with fakes.
//!
//! ```text
//!  WeatherStore ──read (blocks)──────────┐
//!                                        ▼
//!                              ┌──────────────────┐
//!                              │ TelemetryService │──▶ EventSink (Telemetry)
//!                              └──────────────────┘
//!                                        ▲
//!  SampleStore ──read_snapshot(10 ms)────┘
//! ```
//!
//! A sample store that is busy or still empty costs one cycle's
//! `pm_sensor` section; the weather fields are always present.

use core::time::Duration;
use std::sync::Arc;

use log::{debug, info};

use crate::config::{DeviceUid, SystemConfig};
use crate::error::SensorError;
use crate::sensors::weather::WeatherStore;
use crate::store::{SampleSnapshot, SampleStore};

use super::events::{AppEvent, PmSensorReport, TelemetryMessage};
use super::ports::{ClockPort, EventSink};

// ───────────────────────────────────────────────────────────────
// TelemetryService
// ───────────────────────────────────────────────────────────────

pub struct TelemetryService {
    uid: DeviceUid,
    weather: Arc<WeatherStore>,
    samples: Arc<SampleStore>,
    snapshot_timeout: Duration,
    publish_interval_ms: u32,
    published: u32,
    pm_omitted: u32,
}

impl TelemetryService {
    pub fn new(
        config: &SystemConfig,
        weather: Arc<WeatherStore>,
        samples: Arc<SampleStore>,
    ) -> Self {
        Self {
            uid: config.device_uid.clone(),
            weather,
            samples,
            snapshot_timeout: Duration::from_millis(u64::from(config.snapshot_timeout_ms)),
            publish_interval_ms: config.publish_interval_ms,
            published: 0,
            pm_omitted: 0,
        }
    }

    /// Messages emitted so far.
    pub fn published(&self) -> u32 {
        self.published
    }

    /// Messages emitted without a `pm_sensor` section.
    pub fn pm_omitted(&self) -> u32 {
        self.pm_omitted
    }

    /// Build one message stamped with `now_ms`.
    pub fn build_message(&self, now_ms: u32) -> TelemetryMessage {
        let w = self.weather.read();
        let pm_sensor = match self.samples.read_snapshot(self.snapshot_timeout) {
            Ok(Some(snap)) => Some(report(&snap)),
            Ok(None) => {
                debug!("Telemetry: no particulate sample yet");
                None
            }
            Err(SensorError::LockUnavailable) => {
                debug!("Telemetry: sample store busy, pm_sensor omitted");
                None
            }
            Err(e) => {
                debug!("Telemetry: sample store read failed ({})", e);
                None
            }
        };

        TelemetryMessage {
            uid: self.uid.clone(),
            uptime_ms: now_ms,
            temp: w.temperature_c,
            umi: w.humidity_pct,
            dirvento: w.wind_dir_deg,
            velvento: w.wind_speed_kmh,
            pressao: w.pressure_hpa,
            pm_sensor,
        }
    }

    /// Build a message for the current uptime and hand it to `sink`.
    pub fn publish_once(
        &mut self,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) -> TelemetryMessage {
        let msg = self.build_message(clock.uptime_ms());
        self.published = self.published.wrapping_add(1);
        if msg.pm_sensor.is_none() {
            self.pm_omitted = self.pm_omitted.wrapping_add(1);
        }
        sink.emit(&AppEvent::Telemetry(msg.clone()));
        msg
    }

    /// Publish every `publish_interval_ms`, forever.
    pub fn run(mut self, mut clock: impl ClockPort, mut sink: impl EventSink) -> ! {
        info!(
            "Telemetry: publishing as {} every {}ms",
            self.uid, self.publish_interval_ms
        );
        loop {
            self.publish_once(&clock, &mut sink);
            clock.sleep_ms(self.publish_interval_ms);
        }
    }
}

fn report(snap: &SampleSnapshot) -> PmSensorReport {
    let [pm1_0, pm2_5, pm10] = snap.mass_concentration;
    let [count_0_3, count_0_5, count_1_0, count_2_5, count_5_0, count_10] = snap.particle_count;
    PmSensorReport {
        id: snap.sensor_id.clone(),
        timestamp_ms: snap.timestamp_ms,
        pm1_0,
        pm2_5,
        pm10,
        count_0_3,
        count_0_5,
        count_1_0,
        count_2_5,
        count_5_0,
        count_10,
    }
}
