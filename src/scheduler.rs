//! Sampling scheduler — the periodic task that feeds the sample store.
//!
//! ```text
//!   ┌─────────┐  warm-up elapsed   ┌──────────────────────────────────────┐
//!   │ Warming │───────────────────▶│ Sampling                             │
//!   └─────────┘                    │  receive ─▶ decode ─▶ calibrate      │
//!                                  │     │                    │           │
//!                                  │  (short read:       (valid: write    │
//!                                  │   skip cycle)        SampleStore)    │
//!                                  │            sleep(sample_period)      │◀─┐
//!                                  └──────────────────────────────────────┘──┘
//! ```
//!
//! There is no exit from `Sampling` and no cancellation.  Each cycle is
//! independent: a failed read or a rejected frame leaves the store
//! untouched and the next period starts fresh.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{ClockPort, EventSink};
use crate::config::heapless_str;
use crate::error::{FrameFault, SensorError};
use crate::receiver::receive_frame;
use crate::sensors::calibration::calibrate;
use crate::sensors::{FrameDecoder, SensorDescriptor};
use crate::store::SampleStore;
use crate::transport::Transport;

/// Lifecycle of a sampling task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    /// Waiting out the sensor's stabilisation time.
    Warming,
    /// Sampling every period, forever.
    Sampling,
}

/// Result of one sampling cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A valid sample was written to the store.
    Accepted,
    /// No full frame arrived; nothing was decoded.
    ReadFailed(SensorError),
    /// A full frame arrived but failed validation.
    Rejected(Option<FrameFault>),
}

/// Running counters, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplerStats {
    pub cycles: u32,
    pub accepted: u32,
    pub read_failures: u32,
    pub rejected: u32,
}

/// Periodic sampling task for one sensor.
pub struct SamplingScheduler<T, D, C, E> {
    descriptor: SensorDescriptor<D>,
    transport: T,
    clock: C,
    sink: E,
    store: Arc<SampleStore>,
    read_timeout_ms: u32,
    state: SamplerState,
    stats: SamplerStats,
}

impl<T, D, C, E> SamplingScheduler<T, D, C, E>
where
    T: Transport,
    D: FrameDecoder,
    C: ClockPort,
    E: EventSink,
{
    pub fn new(
        descriptor: SensorDescriptor<D>,
        transport: T,
        clock: C,
        sink: E,
        store: Arc<SampleStore>,
        read_timeout_ms: u32,
    ) -> Self {
        Self {
            descriptor,
            transport,
            clock,
            sink,
            store,
            read_timeout_ms,
            state: SamplerState::Warming,
            stats: SamplerStats::default(),
        }
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn stats(&self) -> SamplerStats {
        self.stats
    }

    pub fn descriptor(&self) -> &SensorDescriptor<D> {
        &self.descriptor
    }

    /// Advance the task by one suspension point.
    ///
    /// In `Warming` this sleeps out the warm-up and returns `None`.  In
    /// `Sampling` it runs one cycle, sleeps one period and returns the
    /// cycle's outcome.
    pub fn step(&mut self) -> Option<CycleOutcome> {
        match self.state {
            SamplerState::Warming => {
                let started = AppEvent::SamplerStarted {
                    sensor_id: heapless_str(self.descriptor.id()),
                    warmup_ms: self.descriptor.warmup_ms(),
                };
                self.sink.emit(&started);
                self.clock.sleep_ms(self.descriptor.warmup_ms());
                self.state = SamplerState::Sampling;
                let uptime_ms = self.clock.uptime_ms();
                info!(
                    "Sampler[{}]: warm-up complete @{}ms, sampling every {}ms",
                    self.descriptor.id(),
                    uptime_ms,
                    self.descriptor.sample_period_ms()
                );
                self.sink.emit(&AppEvent::WarmupComplete { uptime_ms });
                None
            }
            SamplerState::Sampling => {
                let outcome = self.sample_once();
                self.clock.sleep_ms(self.descriptor.sample_period_ms());
                Some(outcome)
            }
        }
    }

    /// Receive → decode → calibrate → store, without sleeping.
    pub fn sample_once(&mut self) -> CycleOutcome {
        self.stats.cycles = self.stats.cycles.wrapping_add(1);

        let buf = match receive_frame(
            &mut self.transport,
            self.descriptor.frame_len(),
            self.read_timeout_ms,
        ) {
            Ok(buf) => buf,
            Err(e) => {
                self.stats.read_failures = self.stats.read_failures.wrapping_add(1);
                debug!("Sampler[{}]: cycle skipped ({})", self.descriptor.id(), e);
                self.sink.emit(&AppEvent::ReadFailed(e));
                return CycleOutcome::ReadFailed(e);
            }
        };

        let timestamp_ms = self.clock.uptime_ms();
        let frame = self.descriptor.decoder().decode(&buf, timestamp_ms);
        let sample = calibrate(&frame, self.descriptor.calibration());

        if !sample.valid {
            self.stats.rejected = self.stats.rejected.wrapping_add(1);
            match frame.fault {
                Some(fault) => {
                    warn!("Sampler[{}]: frame rejected ({})", self.descriptor.id(), fault);
                }
                None => warn!("Sampler[{}]: frame rejected", self.descriptor.id()),
            }
            self.sink.emit(&AppEvent::FrameRejected(frame.fault));
            return CycleOutcome::Rejected(frame.fault);
        }

        self.store.write(sample);
        self.stats.accepted = self.stats.accepted.wrapping_add(1);
        self.sink.emit(&AppEvent::SampleAccepted(sample));
        CycleOutcome::Accepted
    }

    /// Run forever: warm up once, then sample every period.
    pub fn run(mut self) -> ! {
        info!(
            "Sampler[{}]: {} on {}-byte frames, warm-up {}ms",
            self.descriptor.id(),
            self.descriptor.decoder().family(),
            self.descriptor.frame_len(),
            self.descriptor.warmup_ms()
        );
        loop {
            let _ = self.step();
        }
    }
}
