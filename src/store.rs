//! Shared sample store — single-slot cache of the latest valid sample.
//!
//! ```text
//!  SamplingScheduler ──write (blocks)──▶ ┌────────────┐
//!                                        │ SampleStore│──read_snapshot(timeout)──▶ TelemetryService
//!                                        └────────────┘
//! ```
//!
//! The writer always waits for the lock; a sample is never dropped on the
//! write side.  Readers get a bounded wait so a contended lock costs them
//! one stale publish cycle instead of stalling their cadence.  Once a
//! valid sample has landed the slot is never emptied again.

use core::time::Duration;

use log::warn;
use parking_lot::Mutex;
use serde::Serialize;

use crate::config::heapless_str;
use crate::error::{Error, Result, SensorError};
use crate::sensors::{
    COUNT_CHANNELS, CalibratedSample, FrameDecoder, MASS_CHANNELS, SENSOR_ID_CAP, SensorDescriptor,
    SensorId,
};

/// What the external publish path gets back from the core.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSnapshot {
    pub sensor_id: SensorId,
    pub timestamp_ms: u32,
    pub mass_concentration: [f32; MASS_CHANNELS],
    pub particle_count: [f32; COUNT_CHANNELS],
    pub valid: bool,
}

impl SampleSnapshot {
    /// Milliseconds between the sample's capture and `now_ms`.
    pub fn age_ms(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.timestamp_ms)
    }
}

/// Mutex-guarded single slot holding the most recent valid sample.
#[derive(Debug)]
pub struct SampleStore {
    sensor_id: SensorId,
    slot: Mutex<Option<CalibratedSample>>,
}

impl SampleStore {
    /// Store for the sensor called `sensor_id`.
    ///
    /// Ids longer than [`SENSOR_ID_CAP`] are rejected, the same way
    /// [`SensorDescriptor::new`] rejects them.
    pub fn new(sensor_id: &str) -> Result<Self> {
        let mut id = SensorId::new();
        id.push_str(sensor_id)
            .map_err(|_| Error::Config("sensor id too long"))?;
        Ok(Self::with_id(id))
    }

    /// Store keyed by an already-validated descriptor.
    pub fn for_sensor<D: FrameDecoder>(descriptor: &SensorDescriptor<D>) -> Self {
        // Fits: the descriptor checked the length when it was built.
        Self::with_id(heapless_str(descriptor.id()))
    }

    fn with_id(sensor_id: SensorId) -> Self {
        Self {
            sensor_id,
            slot: Mutex::new(None),
        }
    }

    pub fn sensor_id(&self) -> &str {
        &self.sensor_id
    }

    /// Replace the stored sample, waiting as long as it takes for the lock.
    ///
    /// Invalid samples are refused so readers only ever see usable data.
    /// Returns whether the slot was updated.
    pub fn write(&self, sample: CalibratedSample) -> bool {
        if !sample.valid {
            warn!("SampleStore: refusing invalid sample @{}ms", sample.timestamp_ms);
            return false;
        }
        *self.slot.lock() = Some(sample);
        true
    }

    /// Copy the current sample, waiting at most `timeout` for the lock.
    ///
    /// * `Ok(Some(_))`: the latest sample.
    /// * `Ok(None)`: no valid sample has been written yet.
    /// * `Err(SensorError::LockUnavailable)`: the wait expired.
    pub fn read_snapshot(
        &self,
        timeout: Duration,
    ) -> core::result::Result<Option<SampleSnapshot>, SensorError> {
        let guard = self
            .slot
            .try_lock_for(timeout)
            .ok_or(SensorError::LockUnavailable)?;
        let sample = *guard;
        drop(guard);

        Ok(sample.map(|s| SampleSnapshot {
            sensor_id: self.sensor_id.clone(),
            timestamp_ms: s.timestamp_ms,
            mass_concentration: s.mass_concentration,
            particle_count: s.particle_count,
            valid: s.valid,
        }))
    }

    /// Hold the slot lock for `hold`, simulating a slow writer.
    #[cfg(test)]
    pub(crate) fn hold_lock_for(&self, hold: Duration) {
        let _guard = self.slot.lock();
        std::thread::sleep(hold);
    }
}
