//! Fuzz target: `Pmsx003Decoder::decode`
//!
//! Drives arbitrary byte buffers into the PMSX003 decoder and the
//! calibrator behind it, asserting that neither panics and that only a
//! well-formed 32-byte frame is ever reported valid.
//!
//! cargo fuzz run fuzz_frame_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use pmstation::sensors::FrameDecoder;
use pmstation::sensors::calibration::{CalibrationTable, calibrate};
use pmstation::sensors::pmsx003::{self, Pmsx003Decoder};

fuzz_target!(|data: &[u8]| {
    let frame = Pmsx003Decoder.decode(data, 0);

    if frame.valid {
        assert_eq!(data.len(), pmsx003::FRAME_LEN, "valid frame of wrong length");
        assert_eq!(&data[..2], &[0x42, 0x4D], "valid frame without header");
        let sum = pmsx003::checksum(&data[..30]);
        assert_eq!(sum.to_be_bytes(), [data[30], data[31]], "valid frame with bad checksum");
        assert!(frame.fault.is_none());
    } else {
        assert!(frame.fault.is_some(), "rejection must name its gate");
    }

    let sample = calibrate(&frame, &CalibrationTable::pmsx003_default());
    assert_eq!(sample.valid, frame.valid);
    if !sample.valid {
        assert!(sample.mass_concentration.iter().all(|&v| v == 0.0));
    }
});
