//! Wire protocol for the Remit registry and invocation channel.
//!
//! Every message on the wire is one [`Frame`]: a fixed-size binary header
//! parsed zero-copy, followed by a CBOR body. Requests and responses share
//! an opcode; a response sets the `RESPONSE` frame flag, and a failed
//! request additionally sets `FAULT` and carries a [`Fault`] body instead
//! of the reply type.
//!
//! # Components
//!
//! - [`Frame`] / [`FrameHeader`]: framing, opcodes, flags
//! - [`payloads`]: CBOR request/response bodies
//! - [`Fault`]: wire representation of a server-side failure
//! - [`WireError`]: malformed-frame and codec failures

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod fault;
mod frame;
pub mod payloads;

pub use error::WireError;
pub use fault::{Fault, FaultKind};
pub use frame::{Frame, FrameFlags, FrameHeader, HEADER_SIZE, MAX_PAYLOAD_SIZE, Opcode};
pub use payloads::{from_payload, to_payload};
pub use payloads::registry::RemoteRef;
