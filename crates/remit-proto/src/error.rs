//! Wire-level error types.

use thiserror::Error;

/// Errors produced while encoding or decoding frames and payloads.
#[derive(Debug, Error)]
pub enum WireError {
    /// Frame does not start with the protocol magic bytes.
    #[error("bad magic bytes")]
    BadMagic,

    /// Buffer is too short to hold what the frame claims.
    #[error("frame truncated: need {needed} bytes, have {have}")]
    Truncated {
        /// Bytes required by the header.
        needed: usize,
        /// Bytes actually available.
        have: usize,
    },

    /// Header payload length disagrees with the bytes on the wire.
    #[error("payload length mismatch: header says {expected}, frame carries {actual}")]
    LengthMismatch {
        /// Length announced by the header.
        expected: usize,
        /// Length actually present.
        actual: usize,
    },

    /// Payload exceeds the per-frame cap.
    #[error("payload too large: {size} bytes")]
    PayloadTooLarge {
        /// Announced payload size.
        size: usize,
    },

    /// CBOR serialization failed.
    #[error("payload encode failed: {reason}")]
    Encode {
        /// Description of the serializer failure.
        reason: String,
    },

    /// CBOR deserialization failed.
    #[error("payload decode failed: {reason}")]
    Decode {
        /// Description of the deserializer failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = WireError::LengthMismatch { expected: 10, actual: 4 };
        assert_eq!(err.to_string(), "payload length mismatch: header says 10, frame carries 4");
    }
}
