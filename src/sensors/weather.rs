//! Weather measurement channels and their collector task.
//!
//! The collector runs on its own period, independent of the particulate
//! sampler, and keeps the latest [`WeatherState`] behind a lock that is
//! never shared with the sample store.
//!
//! ## Dual-target design
//!
//! The station has no weather bus driver yet, so its channels are
//! simulated on every target by [`SimWeatherSource`].  A real driver
//! only needs to implement [`WeatherPort`].

use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::app::ports::{ClockPort, WeatherPort};

/// One set of weather readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WeatherState {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub wind_dir_deg: f32,
    pub wind_speed_kmh: f32,
    pub pressure_hpa: f32,
}

/// Latest weather readings, guarded by their own lock.
#[derive(Debug, Default)]
pub struct WeatherStore {
    state: Mutex<WeatherState>,
}

impl WeatherStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored readings.  Blocks until the lock is free.
    pub fn write(&self, state: WeatherState) {
        *self.state.lock() = state;
    }

    /// Copy of the stored readings.  Blocks until the lock is free.
    pub fn read(&self) -> WeatherState {
        *self.state.lock()
    }
}

// ───────────────────────────────────────────────────────────────
// Collector
// ───────────────────────────────────────────────────────────────

/// Periodic task that refreshes a [`WeatherStore`] from a [`WeatherPort`].
pub struct WeatherCollector<W, C> {
    source: W,
    clock: C,
    store: Arc<WeatherStore>,
    period_ms: u32,
}

impl<W: WeatherPort, C: ClockPort> WeatherCollector<W, C> {
    pub fn new(source: W, clock: C, store: Arc<WeatherStore>, period_ms: u32) -> Self {
        Self {
            source,
            clock,
            store,
            period_ms,
        }
    }

    /// One collection cycle: read, store, sleep.
    pub fn step(&mut self) {
        let state = self.source.read();
        debug!(
            "Weather: T={:.1} RH={:.0} dir={:.0} v={:.1} p={:.2}",
            state.temperature_c,
            state.humidity_pct,
            state.wind_dir_deg,
            state.wind_speed_kmh,
            state.pressure_hpa
        );
        self.store.write(state);
        self.clock.sleep_ms(self.period_ms);
    }

    /// Run forever.
    pub fn run(mut self) -> ! {
        log::info!("Weather collector started (period={}ms)", self.period_ms);
        loop {
            self.step();
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Simulated source
// ───────────────────────────────────────────────────────────────

/// Weather source producing random readings inside each channel's
/// physical range, quantised like the real instruments.
///
/// | channel    | range             | step  |
/// |------------|-------------------|-------|
/// | temperature| 10.0 – 39.9 °C    | 0.1   |
/// | humidity   | 20 – 98 %         | 1     |
/// | wind dir   | 0 – 358 °         | 1     |
/// | wind speed | 10.0 – 99.9 km/h  | 0.1   |
/// | pressure   | 1000.00 – 1013.24 | 0.01  |
#[derive(Debug, Clone)]
pub struct SimWeatherSource<R = StdRng> {
    rng: R,
}

impl SimWeatherSource<StdRng> {
    /// Seeded from the platform entropy source.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible sequence, for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SimWeatherSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> WeatherPort for SimWeatherSource<R> {
    fn read(&mut self) -> WeatherState {
        WeatherState {
            temperature_c: self.rng.gen_range(100..400) as f32 / 10.0,
            humidity_pct: self.rng.gen_range(20..99) as f32,
            wind_dir_deg: self.rng.gen_range(0..359) as f32,
            wind_speed_kmh: self.rng.gen_range(100..1_000) as f32 / 10.0,
            pressure_hpa: self.rng.gen_range(100_000..101_325) as f32 / 100.0,
        }
    }
}
