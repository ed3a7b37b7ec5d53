//! System configuration parameters
//!
//! All tunable parameters for the PmStation system.  Defaults match the
//! deployed station; the device uid can be overridden at build time with
//! the `DEVICE_UID` environment variable.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::sensors::SensorId;
use crate::sensors::calibration::CalibrationTable;
use crate::sensors::pmsx003;

/// Capacity of the device uid string.
pub const DEVICE_UID_CAP: usize = 32;

/// Device uid, stored inline.
pub type DeviceUid = heapless::String<DEVICE_UID_CAP>;

const DEFAULT_DEVICE_UID: &str = "ESTACAO_001_A0B1C2D3";
const DEFAULT_SENSOR_ID: &str = "PMSX003-N";

/// Particulate sensor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmSensorConfig {
    /// Identifier reported alongside every sample.
    pub sensor_id: SensorId,
    /// Time between sampling cycles (milliseconds).
    pub sample_period_ms: u32,
    /// Stabilisation delay before the first sample (milliseconds).
    pub warmup_ms: u32,
    /// Bounded wait for one full frame on the UART (milliseconds).
    pub read_timeout_ms: u32,
    /// Per-channel linear correction.
    pub calibration: CalibrationTable,
}

impl Default for PmSensorConfig {
    fn default() -> Self {
        Self {
            sensor_id: heapless_str(DEFAULT_SENSOR_ID),
            sample_period_ms: pmsx003::SAMPLE_PERIOD_MS, // 1 Hz
            warmup_ms: pmsx003::WARMUP_MS,
            read_timeout_ms: 1000,
            calibration: CalibrationTable::pmsx003_default(),
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Station identifier embedded in every telemetry message.
    pub device_uid: DeviceUid,

    // --- Particulate sensor ---
    pub pm_sensor: PmSensorConfig,

    // --- Timing ---
    /// Weather collection interval (milliseconds)
    pub weather_interval_ms: u32,
    /// Telemetry publish interval (milliseconds)
    pub publish_interval_ms: u32,
    /// Bounded wait when the publisher reads the sample store (milliseconds)
    pub snapshot_timeout_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            device_uid: heapless_str(option_env!("DEVICE_UID").unwrap_or(DEFAULT_DEVICE_UID)),
            pm_sensor: PmSensorConfig::default(),

            // Timing
            weather_interval_ms: 1000,  // 1 Hz
            publish_interval_ms: 5000,  // every 5 s
            snapshot_timeout_ms: 10,
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), Error> {
        let pm = &self.pm_sensor;
        if pm.sample_period_ms == 0 {
            return Err(Error::Config("pm_sensor.sample_period_ms must be non-zero"));
        }
        if pm.read_timeout_ms == 0 {
            return Err(Error::Config("pm_sensor.read_timeout_ms must be non-zero"));
        }
        if !pm.calibration.is_finite() {
            return Err(Error::Config("pm_sensor.calibration must be finite"));
        }
        if self.weather_interval_ms == 0 {
            return Err(Error::Config("weather_interval_ms must be non-zero"));
        }
        if self.publish_interval_ms == 0 {
            return Err(Error::Config("publish_interval_ms must be non-zero"));
        }
        if self.snapshot_timeout_ms >= self.publish_interval_ms {
            return Err(Error::Config(
                "snapshot_timeout_ms must be shorter than publish_interval_ms",
            ));
        }
        Ok(())
    }
}

/// Copy `s` into a fixed-capacity string, truncating at capacity.
pub(crate) fn heapless_str<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
