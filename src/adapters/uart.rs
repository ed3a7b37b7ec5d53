//! UART transport adapter for the PMSX003 link.
//!
//! - **`target_os = "espidf"`** — [`UartTransport`] wraps an
//!   `esp_idf_hal::uart::UartDriver`.  `read` already blocks until the
//!   buffer is full or the tick budget runs out, which is exactly the
//!   bounded read the receiver wants.
//! - **`not(target_os = "espidf")`** — [`SimTransport`] serves bytes from
//!   an in-memory queue that tests (or a simulation harness) fill with
//!   whole or partial frames.

use crate::transport::Transport;

#[cfg(target_os = "espidf")]
pub use esp::UartTransport;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_hal::delay::TickType;
    use esp_idf_hal::gpio::{AnyIOPin, InputPin, OutputPin};
    use esp_idf_hal::peripheral::Peripheral;
    use esp_idf_hal::uart::{Uart, UartDriver, config::Config};
    use esp_idf_hal::units::Hertz;
    use esp_idf_svc::sys::EspError;

    use crate::pins;
    use crate::transport::Transport;

    /// PMSX003 serial link (9600 8N1, RX only in practice).
    pub struct UartTransport {
        uart: UartDriver<'static>,
    }

    impl UartTransport {
        pub fn new(
            uart: impl Peripheral<P = impl Uart> + 'static,
            tx: impl Peripheral<P = impl OutputPin> + 'static,
            rx: impl Peripheral<P = impl InputPin> + 'static,
        ) -> Result<Self, EspError> {
            let config = Config::new().baudrate(Hertz(pins::PMS_UART_BAUD));
            let uart = UartDriver::new(
                uart,
                tx,
                rx,
                Option::<AnyIOPin>::None,
                Option::<AnyIOPin>::None,
                &config,
            )?;
            log::info!(
                "UART: PMSX003 link up (tx={}, rx={}, {} baud)",
                pins::PMS_UART_TX_GPIO,
                pins::PMS_UART_RX_GPIO,
                pins::PMS_UART_BAUD
            );
            Ok(Self { uart })
        }
    }

    impl Transport for UartTransport {
        type Error = EspError;

        fn read_exact_within(
            &mut self,
            buf: &mut [u8],
            timeout_ms: u32,
        ) -> Result<usize, EspError> {
            let ticks = TickType::new_millis(u64::from(timeout_ms)).ticks();
            self.uart.read(buf, ticks)
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Simulation transport
// ───────────────────────────────────────────────────────────────

/// In-memory byte queue standing in for the sensor's serial line.
#[derive(Debug, Default)]
pub struct SimTransport {
    rx: std::collections::VecDeque<u8>,
    reads: u32,
}

impl SimTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue raw bytes as if the sensor had sent them.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    /// Bytes queued and not yet read.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Number of read calls made so far.
    pub fn reads(&self) -> u32 {
        self.reads
    }
}

impl Transport for SimTransport {
    type Error = core::convert::Infallible;

    /// Never waits: whatever is queued is all that will arrive.
    fn read_exact_within(
        &mut self,
        buf: &mut [u8],
        _timeout_ms: u32,
    ) -> Result<usize, Self::Error> {
        self.reads = self.reads.wrapping_add(1);
        let n = buf.len().min(self.rx.len());
        for (dst, src) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *dst = src;
        }
        Ok(n)
    }
}
