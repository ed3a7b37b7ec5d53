//! ESP32 clock adapter.
//!
//! Implements [`ClockPort`] for the sampling, weather and publish loops.
//!
//! - **`target_os = "espidf"`** — uptime from `esp_timer_get_time()`
//!   (microsecond precision, monotonic); sleeps go through a
//!   [`DelayNs`] provider, normally `esp_idf_hal::delay::FreeRtos`, so
//!   the calling task yields to the scheduler.
//! - **`not(target_os = "espidf")`** — uptime from `std::time::Instant`
//!   and [`StdDelay`] for host-side simulation.

use embedded_hal::delay::DelayNs;

use crate::app::ports::ClockPort;

/// Monotonic clock plus a blocking delay.
pub struct SystemClock<D> {
    delay: D,
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl<D: DelayNs> SystemClock<D> {
    pub fn new(delay: D) -> Self {
        Self {
            delay,
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since the clock was created (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl<D: DelayNs> ClockPort for SystemClock<D> {
    /// Wraps after ~49.7 days, like the millisecond tick it replaces.
    fn uptime_ms(&self) -> u32 {
        (self.uptime_us() / 1_000) as u32
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

/// Host delay backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(core::time::Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(core::time::Duration::from_millis(u64::from(ms)));
    }
}
