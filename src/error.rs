//! Unified error types for the PmStation firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! task loops' error handling uniform.  All variants are `Copy` so they can
//! be passed through events and logs without allocation.
//!
//! None of the runtime variants are fatal: a failed sampling cycle is
//! skipped and the next period starts clean.  Only descriptor
//! misconfiguration is rejected up front.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The particulate sensor path failed (transport, protocol, store).
    Sensor(SensorError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Fewer than the required bytes arrived within the read window.
    ShortRead { expected: usize, received: usize },
    /// The transport itself reported an error.
    Transport,
    /// Header, declared length or checksum disagreed.
    Protocol(FrameFault),
    /// The sample slot lock could not be taken within the reader's wait.
    LockUnavailable,
    /// A descriptor declared a frame larger than the receive buffer.
    FrameTooLong { len: usize, max: usize },
    /// A descriptor's frame length disagrees with its decoder.
    FrameLengthMismatch { declared: usize, decoder: usize },
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortRead { expected, received } => {
                write!(f, "short read ({received}/{expected} bytes)")
            }
            Self::Transport => write!(f, "transport error"),
            Self::Protocol(fault) => write!(f, "protocol mismatch: {fault}"),
            Self::LockUnavailable => write!(f, "sample lock unavailable"),
            Self::FrameTooLong { len, max } => {
                write!(f, "frame length {len} exceeds maximum {max}")
            }
            Self::FrameLengthMismatch { declared, decoder } => {
                write!(f, "frame length {declared} does not match decoder ({decoder})")
            }
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Frame faults
// ---------------------------------------------------------------------------

/// The validation gate a frame failed.  Gates run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFault {
    /// Buffer length differs from the family's frame length.
    Length { expected: usize, actual: usize },
    /// Start-of-frame word did not match.
    Header(u16),
    /// Declared payload length word did not match.
    DeclaredLength(u16),
    /// Trailing checksum word disagrees with the byte sum.
    Checksum { expected: u16, computed: u16 },
}

impl fmt::Display for FrameFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length { expected, actual } => {
                write!(f, "length {actual}, expected {expected}")
            }
            Self::Header(word) => write!(f, "bad header 0x{word:04X}"),
            Self::DeclaredLength(len) => write!(f, "declared length {len}"),
            Self::Checksum { expected, computed } => {
                write!(f, "checksum 0x{computed:04X}, frame says 0x{expected:04X}")
            }
        }
    }
}

impl From<FrameFault> for SensorError {
    fn from(fault: FrameFault) -> Self {
        Self::Protocol(fault)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
