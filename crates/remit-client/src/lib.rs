//! Remit client: registry lookup and the account proxy.
//!
//! A client resolves a service name against a registry endpoint, obtains
//! a [`RemoteRef`], and connects an [`AccountProxy`] through which the
//! remote object's operations are invoked as if local. Every call is
//! synchronous request/response with a bounded timeout; an unreachable
//! or silent peer surfaces as [`ClientError::Communication`] instead of
//! blocking the caller indefinitely.
//!
//! # Components
//!
//! - [`lookup`] / [`RegistryClient`]: name resolution, bind, rebind
//! - [`AccountProxy`]: hand-written stub for the account contract
//! - [`ClientError`]: typed failures mapped back from wire faults

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod proxy;

use std::time::Duration;

pub use error::ClientError;
pub use proxy::{AccountProxy, RegistryClient};
pub use remit_proto::payloads::registry::RemoteRef;

/// Default bound on a single remote call, connect included.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolve `name` against the registry at `registry` (`host:port`).
///
/// Convenience wrapper over [`RegistryClient`] for the common
/// lookup-then-invoke flow.
///
/// # Errors
///
/// [`ClientError::NameNotFound`] if nothing is bound under `name`,
/// [`ClientError::Communication`] if the registry is unreachable.
pub async fn lookup(
    registry: &str,
    name: &str,
    call_timeout: Duration,
) -> Result<RemoteRef, ClientError> {
    let mut client = RegistryClient::connect(registry, call_timeout).await?;
    client.lookup(name).await
}
