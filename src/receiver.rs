//! Frame receiver — pulls exactly one frame's worth of bytes.
//!
//! A short read is a failure, never a partial result: the parser only ever
//! sees a buffer of the full declared length.  Retrying is the sampling
//! loop's business (next cycle), not this layer's.

use heapless::Vec;
use log::{debug, warn};

use crate::error::SensorError;
use crate::sensors::MAX_FRAME_BYTES;
use crate::transport::Transport;

/// Receive buffer sized for the largest supported frame.
pub type FrameBuf = Vec<u8, MAX_FRAME_BYTES>;

/// Read exactly `len` bytes within `timeout_ms`.
pub fn receive_frame<T: Transport>(
    transport: &mut T,
    len: usize,
    timeout_ms: u32,
) -> Result<FrameBuf, SensorError> {
    let mut frame = FrameBuf::new();
    frame
        .resize_default(len)
        .map_err(|()| SensorError::FrameTooLong {
            len,
            max: MAX_FRAME_BYTES,
        })?;

    let received = transport
        .read_exact_within(&mut frame, timeout_ms)
        .map_err(|e| {
            warn!("Receiver: transport error {:?}", e);
            SensorError::Transport
        })?;

    if received != len {
        debug!("Receiver: short read {}/{} bytes", received, len);
        return Err(SensorError::ShortRead {
            expected: len,
            received,
        });
    }

    Ok(frame)
}
