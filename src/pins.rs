//! GPIO / peripheral pin assignments for the station main board.
//!
//! Single source of truth — every adapter references this module rather
//! than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// PMSX003 particulate sensor (UART2)
// ---------------------------------------------------------------------------

/// UART controller wired to the sensor.
pub const PMS_UART_PORT: u8 = 2;
/// Sensor TX → ESP32 RX.
pub const PMS_UART_RX_GPIO: i32 = 16;
/// ESP32 TX → sensor RX (unused by the passive protocol, but wired).
pub const PMS_UART_TX_GPIO: i32 = 17;
/// Fixed by the sensor: 9600 8N1.
pub const PMS_UART_BAUD: u32 = 9_600;
