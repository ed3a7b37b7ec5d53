//! Outbound application events.
//!
//! The sampling scheduler and the [`TelemetryService`](super::service::TelemetryService)
//! emit these through the [`EventSink`](super::ports::EventSink) port.
//! Adapters on the other side decide what to do with them — log to
//! serial, hand to the MQTT publisher, etc.

use serde::Serialize;

use crate::config::DeviceUid;
use crate::error::{FrameFault, SensorError};
use crate::sensors::{CalibratedSample, SensorId};

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A sampling task started and is warming up.
    SamplerStarted { sensor_id: SensorId, warmup_ms: u32 },

    /// Warm-up finished; sampling begins.
    WarmupComplete { uptime_ms: u32 },

    /// A valid sample was calibrated and stored.
    SampleAccepted(CalibratedSample),

    /// A full frame arrived but failed validation.
    FrameRejected(Option<FrameFault>),

    /// The receiver did not deliver a full frame this cycle.
    ReadFailed(SensorError),

    /// A telemetry message is ready for transmission.
    Telemetry(TelemetryMessage),
}

/// Particulate section of a telemetry message.
///
/// Field names match the station's published JSON schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PmSensorReport {
    pub id: SensorId,
    pub timestamp_ms: u32,
    pub pm1_0: f32,
    pub pm2_5: f32,
    pub pm10: f32,
    pub count_0_3: f32,
    pub count_0_5: f32,
    pub count_1_0: f32,
    pub count_2_5: f32,
    pub count_5_0: f32,
    pub count_10: f32,
}

/// One publish cycle's worth of station data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryMessage {
    pub uid: DeviceUid,
    pub uptime_ms: u32,
    pub temp: f32,
    pub umi: f32,
    pub dirvento: f32,
    pub velvento: f32,
    pub pressao: f32,
    /// Present only when a valid particulate sample could be read in time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm_sensor: Option<PmSensorReport>,
}
