//! Plantower PMSX003 laser particulate sensor — 32-byte UART frame.
//!
//! Wire format (all words big-endian):
//! ```text
//!  0      2      4      6      8      10         16            28     30     32
//!  ┌──────┬──────┬──────┬──────┬──────┬──────────┬─────────────┬──────┬──────┐
//!  │ "BM" │  28  │PM1.0 │PM2.5 │ PM10 │ reserved │ 6 × count   │ temp │ csum │
//!  └──────┴──────┴──────┴──────┴──────┴──────────┴─────────────┴──────┴──────┘
//! ```
//!
//! The checksum is the 16-bit wrapping sum of bytes 0..30.  Humidity is
//! read from the word at offset 30, which on this family shares its bytes
//! with the checksum.

use super::{COUNT_CHANNELS, FrameDecoder, MASS_CHANNELS, RawFrame};
use crate::error::FrameFault;

/// Full frame length including header and checksum.
pub const FRAME_LEN: usize = 32;

/// Start-of-frame marker, ASCII "BM".
pub const HEADER: u16 = 0x424D;

/// Payload length the sensor declares in bytes 2–3.
pub const DECLARED_LEN: u16 = 28;

/// Laser stabilisation time after power-on.
pub const WARMUP_MS: u32 = 5_000;

/// Active-mode output rate.
pub const SAMPLE_PERIOD_MS: u32 = 1_000;

const DECLARED_LEN_OFFSET: usize = 2;
const MASS_OFFSETS: [usize; MASS_CHANNELS] = [4, 6, 8];
const COUNT_OFFSETS: [usize; COUNT_CHANNELS] = [16, 18, 20, 22, 24, 26];
const TEMPERATURE_OFFSET: usize = 28;
const HUMIDITY_OFFSET: usize = 30;
const CHECKSUM_OFFSET: usize = FRAME_LEN - 2;

fn read_word(buf: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([buf[at], buf[at + 1]])
}

/// 16-bit wrapping sum of `bytes`.
pub fn checksum(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |acc, &b| acc.wrapping_add(u16::from(b)))
}

/// Build a well-formed frame carrying the given channel values.
///
/// Used by the host simulation transport and by tests.
pub fn encode_frame(
    mass: [u16; MASS_CHANNELS],
    counts: [u16; COUNT_CHANNELS],
    temperature_tenths: u16,
) -> [u8; FRAME_LEN] {
    let mut buf = [0u8; FRAME_LEN];
    buf[..2].copy_from_slice(&HEADER.to_be_bytes());
    buf[DECLARED_LEN_OFFSET..DECLARED_LEN_OFFSET + 2].copy_from_slice(&DECLARED_LEN.to_be_bytes());
    for (at, value) in MASS_OFFSETS.into_iter().zip(mass) {
        buf[at..at + 2].copy_from_slice(&value.to_be_bytes());
    }
    for (at, value) in COUNT_OFFSETS.into_iter().zip(counts) {
        buf[at..at + 2].copy_from_slice(&value.to_be_bytes());
    }
    buf[TEMPERATURE_OFFSET..TEMPERATURE_OFFSET + 2]
        .copy_from_slice(&temperature_tenths.to_be_bytes());
    let sum = checksum(&buf[..CHECKSUM_OFFSET]);
    buf[CHECKSUM_OFFSET..].copy_from_slice(&sum.to_be_bytes());
    buf
}

/// Decoder for the PMSX003 family.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pmsx003Decoder;

impl FrameDecoder for Pmsx003Decoder {
    fn family(&self) -> &'static str {
        "PMSX003"
    }

    fn frame_len(&self) -> usize {
        FRAME_LEN
    }

    fn warmup_ms(&self) -> u32 {
        WARMUP_MS
    }

    fn decode(&self, buf: &[u8], timestamp_ms: u32) -> RawFrame {
        if buf.len() != FRAME_LEN {
            return RawFrame::rejected(
                timestamp_ms,
                FrameFault::Length {
                    expected: FRAME_LEN,
                    actual: buf.len(),
                },
            );
        }

        let header = read_word(buf, 0);
        if header != HEADER {
            return RawFrame::rejected(timestamp_ms, FrameFault::Header(header));
        }

        let declared = read_word(buf, DECLARED_LEN_OFFSET);
        if declared != DECLARED_LEN {
            return RawFrame::rejected(timestamp_ms, FrameFault::DeclaredLength(declared));
        }

        let mut frame = RawFrame {
            timestamp_ms,
            mass_concentration: MASS_OFFSETS.map(|at| read_word(buf, at)),
            particle_count: COUNT_OFFSETS.map(|at| read_word(buf, at)),
            temperature_tenths: read_word(buf, TEMPERATURE_OFFSET),
            humidity_tenths: read_word(buf, HUMIDITY_OFFSET),
            valid: true,
            fault: None,
        };

        let computed = checksum(&buf[..CHECKSUM_OFFSET]);
        let expected = read_word(buf, CHECKSUM_OFFSET);
        if computed != expected {
            frame.valid = false;
            frame.fault = Some(FrameFault::Checksum { expected, computed });
        }

        frame
    }
}
