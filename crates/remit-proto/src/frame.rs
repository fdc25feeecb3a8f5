//! Frame layout and zero-copy header parsing.
//!
//! A frame is a 24-byte binary header followed by a CBOR body. The header
//! is fixed-layout and little-endian so it can be parsed without copying:
//!
//! ```text
//! offset  size  field
//! 0       4     magic       b"RMT1"
//! 4       1     opcode      request kind (shared by the response)
//! 5       1     flags       RESPONSE / FAULT bits
//! 6       2     reserved
//! 8       8     request_id  echoed verbatim by the responder
//! 16      4     payload_len CBOR body length in bytes
//! 20      4     padding
//! ```
//!
//! # Invariants
//!
//! - A response carries the request's opcode and request id unchanged
//! - `payload_len` never exceeds [`MAX_PAYLOAD_SIZE`]
//! - Decoding arbitrary bytes never panics

use bytes::Bytes;
use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
    little_endian::{U32, U64},
};

use crate::error::WireError;

/// Magic bytes opening every frame.
pub const MAGIC: [u8; 4] = *b"RMT1";

/// Size of the fixed frame header in bytes.
pub const HEADER_SIZE: usize = 24;

/// Upper bound on a single frame's payload.
pub const MAX_PAYLOAD_SIZE: usize = 1024 * 1024;

/// Request kinds understood by a Remit endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Register a name, failing if it is already bound.
    Bind = 1,
    /// Register a name, overwriting any existing binding.
    Rebind = 2,
    /// Resolve a name to a remote reference.
    Lookup = 3,
    /// Invoke an operation on an exported object.
    Invoke = 4,
}

impl Opcode {
    /// Decode an opcode byte, returning `None` for unknown values.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Bind),
            2 => Some(Self::Rebind),
            3 => Some(Self::Lookup),
            4 => Some(Self::Invoke),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Direction and outcome bits in the frame header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FrameFlags: u8 {
        /// Frame is a response to a previously sent request.
        const RESPONSE = 0b0000_0001;
        /// Response carries a [`crate::Fault`] body instead of a reply.
        const FAULT = 0b0000_0010;
    }
}

/// Fixed-size frame header.
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct FrameHeader {
    magic: [u8; 4],
    opcode: u8,
    flags: u8,
    reserved: [u8; 2],
    request_id: U64,
    payload_len: U32,
    padding: [u8; 4],
}

impl FrameHeader {
    /// Create a request header with empty flags and zero payload length.
    pub fn new(opcode: Opcode, request_id: u64) -> Self {
        Self {
            magic: MAGIC,
            opcode: opcode as u8,
            flags: FrameFlags::empty().bits(),
            reserved: [0; 2],
            request_id: U64::new(request_id),
            payload_len: U32::new(0),
            padding: [0; 4],
        }
    }

    /// Parse and validate a header from exactly [`HEADER_SIZE`] bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self, WireError> {
        let header = Self::read_from_bytes(bytes)
            .map_err(|_| WireError::Truncated { needed: HEADER_SIZE, have: bytes.len() })?;

        if header.magic != MAGIC {
            return Err(WireError::BadMagic);
        }

        let payload_len = header.payload_len.get() as usize;
        if payload_len > MAX_PAYLOAD_SIZE {
            return Err(WireError::PayloadTooLarge { size: payload_len });
        }

        Ok(header)
    }

    /// Raw opcode byte as sent on the wire.
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Decoded opcode, `None` if the peer sent an unknown value.
    pub fn opcode_enum(&self) -> Option<Opcode> {
        Opcode::from_u8(self.opcode)
    }

    /// Frame flags; unknown bits are dropped.
    pub fn flags(&self) -> FrameFlags {
        FrameFlags::from_bits_truncate(self.flags)
    }

    /// Replace the frame flags.
    pub fn set_flags(&mut self, flags: FrameFlags) {
        self.flags = flags.bits();
    }

    /// True once the `RESPONSE` bit is set.
    pub fn is_response(&self) -> bool {
        self.flags().contains(FrameFlags::RESPONSE)
    }

    /// True if this response signals a fault.
    pub fn is_fault(&self) -> bool {
        self.flags().contains(FrameFlags::FAULT)
    }

    /// Request id echoed between requester and responder.
    pub fn request_id(&self) -> u64 {
        self.request_id.get()
    }

    /// Payload length announced by the header.
    pub fn payload_len(&self) -> u32 {
        self.payload_len.get()
    }

    fn set_payload_len(&mut self, len: u32) {
        self.payload_len = U32::new(len);
    }
}

/// One wire message: header plus CBOR body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Fixed-size frame header.
    pub header: FrameHeader,
    /// CBOR body; may be empty.
    pub payload: Bytes,
}

impl Frame {
    /// Assemble a frame, fixing up the header's payload length.
    pub fn new(mut header: FrameHeader, payload: Bytes) -> Self {
        header.set_payload_len(payload.len() as u32);
        Self { header, payload }
    }

    /// Build a request frame.
    pub fn request(opcode: Opcode, request_id: u64, payload: Bytes) -> Self {
        Self::new(FrameHeader::new(opcode, request_id), payload)
    }

    /// Build the successful response to `request`.
    ///
    /// The opcode and request id are echoed; only the `RESPONSE` flag is set.
    pub fn response_to(request: &FrameHeader, payload: Bytes) -> Self {
        let mut header = *request;
        header.set_flags(FrameFlags::RESPONSE);
        Self::new(header, payload)
    }

    /// Build a fault response to `request`; `payload` is an encoded fault.
    pub fn fault_to(request: &FrameHeader, payload: Bytes) -> Self {
        let mut header = *request;
        header.set_flags(FrameFlags::RESPONSE | FrameFlags::FAULT);
        Self::new(header, payload)
    }

    /// Encode the frame into `buf`.
    pub fn encode(&self, buf: &mut Vec<u8>) -> Result<(), WireError> {
        if self.payload.len() > MAX_PAYLOAD_SIZE {
            return Err(WireError::PayloadTooLarge { size: self.payload.len() });
        }

        let mut header = self.header;
        header.set_payload_len(self.payload.len() as u32);

        buf.extend_from_slice(header.as_bytes());
        buf.extend_from_slice(&self.payload);
        Ok(())
    }

    /// Decode one complete frame from `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.len() < HEADER_SIZE {
            return Err(WireError::Truncated { needed: HEADER_SIZE, have: bytes.len() });
        }

        let header = FrameHeader::parse(&bytes[..HEADER_SIZE])?;
        let expected = header.payload_len() as usize;
        let body = &bytes[HEADER_SIZE..];

        if body.len() != expected {
            return Err(WireError::LengthMismatch { expected, actual: body.len() });
        }

        Ok(Self { header, payload: Bytes::copy_from_slice(body) })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hex_literal::hex;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn header_is_exactly_header_size() {
        assert_eq!(std::mem::size_of::<FrameHeader>(), HEADER_SIZE);
    }

    #[test]
    fn golden_lookup_request() {
        let frame = Frame::request(Opcode::Lookup, 0x0102_0304_0506_0708, Bytes::new());

        let mut buf = Vec::new();
        frame.encode(&mut buf).unwrap();

        assert_eq!(
            buf,
            hex!(
                "524d5431" // magic "RMT1"
                "03"       // opcode Lookup
                "00"       // flags
                "0000"     // reserved
                "0807060504030201" // request id, little endian
                "00000000" // payload length
                "00000000" // padding
            )
        );
    }

    #[test]
    fn decode_rejects_bad_magic() {
        let mut buf = Vec::new();
        Frame::request(Opcode::Bind, 1, Bytes::new()).encode(&mut buf).unwrap();
        buf[0] = b'X';

        assert!(matches!(Frame::decode(&buf), Err(WireError::BadMagic)));
    }

    #[test]
    fn decode_rejects_short_buffer() {
        let result = Frame::decode(&[0u8; 7]);
        assert!(matches!(result, Err(WireError::Truncated { .. })));
    }

    #[test]
    fn decode_rejects_length_mismatch() {
        let mut buf = Vec::new();
        Frame::request(Opcode::Invoke, 9, Bytes::from_static(b"abc")).encode(&mut buf).unwrap();
        buf.pop();

        assert!(matches!(Frame::decode(&buf), Err(WireError::LengthMismatch { .. })));
    }

    #[test]
    fn decode_rejects_oversized_payload_claim() {
        let mut buf = Vec::new();
        Frame::request(Opcode::Invoke, 9, Bytes::new()).encode(&mut buf).unwrap();
        // Rewrite payload_len to exceed the cap without supplying the bytes.
        buf[16..20].copy_from_slice(&(MAX_PAYLOAD_SIZE as u32 + 1).to_le_bytes());

        assert!(matches!(Frame::decode(&buf), Err(WireError::PayloadTooLarge { .. })));
    }

    #[test]
    fn response_echoes_opcode_and_request_id() {
        let request = Frame::request(Opcode::Lookup, 77, Bytes::new());
        let response = Frame::response_to(&request.header, Bytes::from_static(b"ok"));

        assert_eq!(response.header.opcode(), Opcode::Lookup as u8);
        assert_eq!(response.header.request_id(), 77);
        assert!(response.header.is_response());
        assert!(!response.header.is_fault());
    }

    #[test]
    fn fault_response_sets_both_flags() {
        let request = Frame::request(Opcode::Bind, 5, Bytes::new());
        let response = Frame::fault_to(&request.header, Bytes::new());

        assert!(response.header.is_response());
        assert!(response.header.is_fault());
    }

    #[test]
    fn unknown_opcode_decodes_as_none() {
        let mut buf = Vec::new();
        Frame::request(Opcode::Bind, 1, Bytes::new()).encode(&mut buf).unwrap();
        buf[4] = 0xEE;

        let frame = Frame::decode(&buf).unwrap();
        assert_eq!(frame.header.opcode_enum(), None);
        assert_eq!(frame.header.opcode(), 0xEE);
    }

    proptest! {
        #[test]
        fn frame_roundtrip(request_id in any::<u64>(), payload in proptest::collection::vec(any::<u8>(), 0..512)) {
            let frame = Frame::request(Opcode::Invoke, request_id, Bytes::from(payload));

            let mut buf = Vec::new();
            frame.encode(&mut buf).unwrap();
            let decoded = Frame::decode(&buf).unwrap();

            prop_assert_eq!(frame, decoded);
        }
    }
}
