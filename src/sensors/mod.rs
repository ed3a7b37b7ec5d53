//! Sensor subsystem — frame decoding, calibration, and sensor descriptors.
//!
//! ```text
//!  Transport ──▶ receiver ──▶ FrameDecoder ──▶ calibrate ──▶ SampleStore
//!                 (N bytes)    (RawFrame)      (CalibratedSample)
//! ```
//!
//! A [`SensorDescriptor`] bundles everything the sampling loop needs to know
//! about one sensor instance: its id, frame length, timing, calibration table
//! and the decoder for its sensor family.  Decoders are plugged in through
//! the [`FrameDecoder`] trait so several families can share the receiver,
//! scheduler and store.

pub mod calibration;
pub mod pmsx003;
pub mod weather;

use serde::Serialize;

use crate::config::PmSensorConfig;
use crate::error::{Error, FrameFault, SensorError};
use calibration::CalibrationTable;

/// Largest frame any supported sensor family may declare.
pub const MAX_FRAME_BYTES: usize = 64;

/// Mass-concentration channels (PM1.0 / PM2.5 / PM10).
pub const MASS_CHANNELS: usize = 3;

/// Cumulative particle-count channels (>0.3, >0.5, >1.0, >2.5, >5.0, >10 µm).
pub const COUNT_CHANNELS: usize = 6;

/// Capacity of a sensor id string.
pub const SENSOR_ID_CAP: usize = 24;

/// Sensor identifier, stored inline.
pub type SensorId = heapless::String<SENSOR_ID_CAP>;

// ───────────────────────────────────────────────────────────────
// Frame decoder capability
// ───────────────────────────────────────────────────────────────

/// Decodes one fixed-length wire frame of a sensor family.
///
/// Implementations never panic on malformed input: every failure is
/// reported through [`RawFrame::valid`] and [`RawFrame::fault`].
pub trait FrameDecoder: Send + Sync {
    /// Human-readable family name (for logs).
    fn family(&self) -> &'static str;

    /// Exact wire frame length in bytes.
    fn frame_len(&self) -> usize;

    /// Stabilisation time after power-on before frames are trustworthy.
    fn warmup_ms(&self) -> u32;

    /// Decode `buf`, stamping the result with `timestamp_ms`.
    fn decode(&self, buf: &[u8], timestamp_ms: u32) -> RawFrame;
}

// ───────────────────────────────────────────────────────────────
// Frame / sample types
// ───────────────────────────────────────────────────────────────

/// Raw channel values of one decoded frame.
///
/// `valid` is `true` only when every validation gate passed; `fault` names
/// the gate that failed otherwise.  A checksum failure still carries the
/// extracted fields, but they must not be used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawFrame {
    pub timestamp_ms: u32,
    pub mass_concentration: [u16; MASS_CHANNELS],
    pub particle_count: [u16; COUNT_CHANNELS],
    pub temperature_tenths: u16,
    pub humidity_tenths: u16,
    pub valid: bool,
    pub fault: Option<FrameFault>,
}

impl RawFrame {
    /// An empty, invalid frame for a gate that failed before extraction.
    pub fn rejected(timestamp_ms: u32, fault: FrameFault) -> Self {
        Self {
            timestamp_ms,
            valid: false,
            fault: Some(fault),
            ..Self::default()
        }
    }

    /// Temperature in °C (one decimal of precision on the wire).
    pub fn temperature_c(&self) -> f32 {
        f32::from(self.temperature_tenths) / 10.0
    }

    /// Relative humidity in % (one decimal of precision on the wire).
    pub fn humidity_pct(&self) -> f32 {
        f32::from(self.humidity_tenths) / 10.0
    }
}

/// Engineering-unit sample produced by the calibrator.
///
/// When `valid` is `false` the numeric fields carry no meaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CalibratedSample {
    pub timestamp_ms: u32,
    pub mass_concentration: [f32; MASS_CHANNELS],
    pub particle_count: [f32; COUNT_CHANNELS],
    pub valid: bool,
}

// ───────────────────────────────────────────────────────────────
// Sensor descriptor
// ───────────────────────────────────────────────────────────────

/// Immutable description of one sensor instance.
///
/// Built once at startup; construction fails if the declared frame does
/// not fit the receive buffer or disagrees with the decoder.
#[derive(Debug, Clone)]
pub struct SensorDescriptor<D> {
    id: SensorId,
    frame_len: usize,
    sample_period_ms: u32,
    warmup_ms: u32,
    calibration: CalibrationTable,
    decoder: D,
}

impl<D: FrameDecoder> SensorDescriptor<D> {
    /// Build a descriptor.  Warm-up defaults to the decoder's family value.
    pub fn new(
        id: &str,
        decoder: D,
        frame_len: usize,
        sample_period_ms: u32,
        calibration: CalibrationTable,
    ) -> crate::error::Result<Self> {
        if frame_len > MAX_FRAME_BYTES {
            return Err(SensorError::FrameTooLong {
                len: frame_len,
                max: MAX_FRAME_BYTES,
            }
            .into());
        }
        if frame_len != decoder.frame_len() {
            return Err(SensorError::FrameLengthMismatch {
                declared: frame_len,
                decoder: decoder.frame_len(),
            }
            .into());
        }
        if sample_period_ms == 0 {
            return Err(Error::Config("sample period must be non-zero"));
        }

        let mut sensor_id = SensorId::new();
        sensor_id
            .push_str(id)
            .map_err(|_| Error::Config("sensor id too long"))?;

        Ok(Self {
            id: sensor_id,
            frame_len,
            sample_period_ms,
            warmup_ms: decoder.warmup_ms(),
            calibration,
            decoder,
        })
    }

    /// Build a descriptor from the persisted sensor configuration.
    pub fn from_config(decoder: D, config: &PmSensorConfig) -> crate::error::Result<Self> {
        let frame_len = decoder.frame_len();
        Ok(Self::new(
            &config.sensor_id,
            decoder,
            frame_len,
            config.sample_period_ms,
            config.calibration,
        )?
        .with_warmup_ms(config.warmup_ms))
    }

    /// Override the family warm-up time.
    #[must_use]
    pub fn with_warmup_ms(mut self, warmup_ms: u32) -> Self {
        self.warmup_ms = warmup_ms;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    pub fn sample_period_ms(&self) -> u32 {
        self.sample_period_ms
    }

    pub fn warmup_ms(&self) -> u32 {
        self.warmup_ms
    }

    pub fn calibration(&self) -> &CalibrationTable {
        &self.calibration
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }
}
