//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements            | Connects to                    |
//! |------------|-----------------------|--------------------------------|
//! | `log_sink` | EventSink             | Serial log output              |
//! | `time`     | ClockPort             | ESP32 system timer + FreeRTOS  |
//! | `uart`     | Transport             | PMSX003 UART / in-memory queue |
//!
//! The simulated weather source lives next to its collector in
//! [`crate::sensors::weather`].

pub mod log_sink;
pub mod time;
pub mod uart;
