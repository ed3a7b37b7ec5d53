//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! Telemetry lines carry the message as JSON, ready for a network
//! publisher to pick up.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::SamplerStarted { sensor_id, warmup_ms } => {
                info!("START | sensor={} | warmup={}ms", sensor_id, warmup_ms);
            }
            AppEvent::WarmupComplete { uptime_ms } => {
                info!("START | warm-up complete @{}ms", uptime_ms);
            }
            AppEvent::SampleAccepted(s) => {
                let [pm1, pm25, pm10] = s.mass_concentration;
                let c = s.particle_count;
                info!(
                    "SAMPLE | @{}ms | PM1.0={:.1} PM2.5={:.1} PM10={:.1}ug/m3 | \
                     counts={:.0}/{:.0}/{:.0}/{:.0}/{:.0}/{:.0}",
                    s.timestamp_ms, pm1, pm25, pm10, c[0], c[1], c[2], c[3], c[4], c[5],
                );
            }
            AppEvent::FrameRejected(Some(fault)) => {
                warn!("FRAME | rejected: {}", fault);
            }
            AppEvent::FrameRejected(None) => {
                warn!("FRAME | rejected");
            }
            AppEvent::ReadFailed(e) => {
                debug!("FRAME | read failed: {}", e);
            }
            AppEvent::Telemetry(msg) => match serde_json::to_string(msg) {
                Ok(json) => info!("TELEM | {}", json),
                Err(e) => warn!("TELEM | serialisation failed: {}", e),
            },
        }
    }
}
