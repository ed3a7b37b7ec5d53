//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SamplingScheduler / TelemetryService (domain)
//! ```
//!
//! Driven adapters (clock, weather channels, event sinks) implement these
//! traits.  The domain types consume them via generics, so the sampling
//! and publishing logic never touches hardware directly.  The byte
//! transport for the particulate sensor lives in [`crate::transport`].

use crate::sensors::weather::WeatherState;

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: system timer → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic time plus the ability to suspend the calling task.
pub trait ClockPort {
    /// Milliseconds since boot.  Wraps after ~49 days; compare with
    /// `wrapping_sub`.
    fn uptime_ms(&self) -> u32;

    /// Suspend the calling task for `ms` milliseconds.
    fn sleep_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Weather port (driven adapter: weather channels → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the station's weather channels.
pub trait WeatherPort {
    fn read(&mut self) -> WeatherState;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, MQTT,
/// etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
