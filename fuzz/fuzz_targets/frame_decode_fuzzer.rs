//! Fuzz target for frame decoding
//!
//! # Invariants
//!
//! - `Frame::decode` NEVER panics on arbitrary input
//! - A frame that decodes re-encodes to the identical byte string
//! - Header validation rejects payload claims above the cap before any
//!   allocation happens downstream

#![no_main]

use libfuzzer_sys::fuzz_target;
use remit_proto::Frame;

fuzz_target!(|data: &[u8]| {
    if let Ok(frame) = Frame::decode(data) {
        let mut buf = Vec::new();
        frame.encode(&mut buf).expect("decoded frame must re-encode");
        assert_eq!(buf, data, "re-encoding changed the byte string");
    }
});
