//! Per-channel linear calibration.
//!
//! Each channel has a dedicated `(factor, offset)` pair fixed at
//! configuration time; the calibrated value is `raw * factor + offset`.

use serde::{Deserialize, Serialize};

use super::{COUNT_CHANNELS, CalibratedSample, MASS_CHANNELS, RawFrame};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationEntry {
    pub factor: f32,
    pub offset: f32,
}

impl CalibrationEntry {
    pub const IDENTITY: Self = Self::new(1.0, 0.0);

    pub const fn new(factor: f32, offset: f32) -> Self {
        Self { factor, offset }
    }

    pub fn apply(&self, raw: u16) -> f32 {
        f32::from(raw) * self.factor + self.offset
    }

    pub fn is_finite(&self) -> bool {
        self.factor.is_finite() && self.offset.is_finite()
    }
}

impl Default for CalibrationEntry {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Calibration for every channel of a particulate sensor, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationTable {
    pub mass: [CalibrationEntry; MASS_CHANNELS],
    pub count: [CalibrationEntry; COUNT_CHANNELS],
}

impl CalibrationTable {
    pub const fn identity() -> Self {
        Self {
            mass: [CalibrationEntry::IDENTITY; MASS_CHANNELS],
            count: [CalibrationEntry::IDENTITY; COUNT_CHANNELS],
        }
    }

    /// Bench-derived correction for the PMSX003-N unit on the station.
    pub const fn pmsx003_default() -> Self {
        Self {
            mass: [
                CalibrationEntry::new(1.0, 0.0),
                CalibrationEntry::new(1.02, -1.5),
                CalibrationEntry::new(0.98, 0.5),
            ],
            count: [CalibrationEntry::IDENTITY; COUNT_CHANNELS],
        }
    }

    pub fn is_finite(&self) -> bool {
        self.mass.iter().chain(self.count.iter()).all(CalibrationEntry::is_finite)
    }
}

impl Default for CalibrationTable {
    fn default() -> Self {
        Self::pmsx003_default()
    }
}

/// Convert a raw frame into engineering units.
///
/// An invalid frame yields an invalid sample with the same timestamp and
/// zeroed channels; the table is not consulted.
pub fn calibrate(frame: &RawFrame, table: &CalibrationTable) -> CalibratedSample {
    let mut sample = CalibratedSample {
        timestamp_ms: frame.timestamp_ms,
        valid: frame.valid,
        ..CalibratedSample::default()
    };
    if !frame.valid {
        return sample;
    }

    for ((out, raw), cal) in sample
        .mass_concentration
        .iter_mut()
        .zip(frame.mass_concentration)
        .zip(&table.mass)
    {
        *out = cal.apply(raw);
    }
    for ((out, raw), cal) in sample
        .particle_count
        .iter_mut()
        .zip(frame.particle_count)
        .zip(&table.count)
    {
        *out = cal.apply(raw);
    }

    sample
}
