//! Fuzz target for frame construction and round-tripping
//!
//! # Strategy
//!
//! Build frames from arbitrary opcode/flag/id/payload combinations and
//! verify that every encodable frame decodes back to itself.

#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use remit_proto::{Frame, FrameFlags, FrameHeader, Opcode};

#[derive(Debug, Arbitrary)]
struct FuzzFrame {
    opcode: u8,
    response: bool,
    fault: bool,
    request_id: u64,
    payload: Vec<u8>,
}

fuzz_target!(|input: FuzzFrame| {
    let Some(opcode) = Opcode::from_u8(input.opcode) else {
        return;
    };

    let mut header = FrameHeader::new(opcode, input.request_id);
    let mut flags = FrameFlags::empty();
    if input.response {
        flags |= FrameFlags::RESPONSE;
    }
    if input.fault {
        flags |= FrameFlags::FAULT;
    }
    header.set_flags(flags);

    let frame = Frame::new(header, Bytes::from(input.payload));

    let mut buf = Vec::new();
    if frame.encode(&mut buf).is_ok() {
        let decoded = Frame::decode(&buf).expect("encoded frame must decode");
        assert_eq!(decoded, frame);
    }
});
