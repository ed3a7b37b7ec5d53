//! Transport abstraction — the byte channel a sensor speaks over.
//!
//! Concrete implementations:
//! - UART (ESP-IDF `UartDriver`) on the device
//! - In-memory byte queue for host simulation and tests
//!
//! The receiver is generic over `Transport`, so a new sensor bus needs
//! zero changes to the sampling logic.

/// Byte-oriented transport with bounded-wait reads.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Fill `buf` from the transport, waiting at most `timeout_ms` in total.
    ///
    /// Returns the number of bytes actually placed in `buf`.  A return
    /// value smaller than `buf.len()` means the wait expired first.
    fn read_exact_within(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn read_exact_within(
        &mut self,
        buf: &mut [u8],
        timeout_ms: u32,
    ) -> Result<usize, Self::Error> {
        (**self).read_exact_within(buf, timeout_ms)
    }
}
