//! Application core — domain logic, zero I/O.
//!
//! Events, port traits and the telemetry service.  All interaction with
//! hardware happens through the **port traits** defined in [`ports`],
//! keeping this layer testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
