//! Core logic for the Remit remote-invocation demo.
//!
//! This crate is transport-agnostic: it owns the registry table, the
//! account object and its invocation dispatch, and the async frame codec.
//! Listening, connecting, and timeouts live in the server and client
//! crates.
//!
//! # Components
//!
//! - [`RegistryTable`]: name → remote reference bindings
//! - [`Account`]: the one stateful remote object, writes serialized
//! - [`ExportTable`]: object id → account, request dispatch
//! - [`codec`]: frame read/write over any `AsyncRead`/`AsyncWrite`

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod codec;
pub mod dispatch;
pub mod registry;

pub use account::{Account, AccountState};
pub use codec::{CodecError, read_frame, write_frame};
pub use dispatch::{DispatchError, ExportTable};
pub use registry::{RegistryError, RegistryTable};
