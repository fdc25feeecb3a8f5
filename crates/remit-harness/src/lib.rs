//! Integration harness for Remit.
//!
//! Spawns real servers on ephemeral ports so tests can exercise the full
//! publish/discover/invoke path over sockets. Tests that only need the
//! registry table or the account object live in the owning crates; this
//! crate is for behavior that crosses process boundaries in production.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::net::SocketAddr;

use remit_proto::RemoteRef;
use remit_server::{Server, ServerError, ServerRuntimeConfig};
use tokio::task::JoinHandle;

/// A server running in the background for one test.
pub struct ServerUnderTest {
    /// Invocation endpoint (and registry address in hosted mode).
    pub addr: SocketAddr,
    /// Reference the server published under its service name.
    pub published: RemoteRef,
    /// Task driving the server's accept loop.
    pub handle: JoinHandle<Result<(), ServerError>>,
}

/// Config binding the registry to `registry_addr` with demo defaults.
pub fn registry_config(registry_addr: &str) -> ServerRuntimeConfig {
    ServerRuntimeConfig { registry_addr: registry_addr.to_string(), ..Default::default() }
}

/// Config hosting a fresh registry on an ephemeral port.
///
/// Port 0 always wins the bind, so the spawned server is hosted and its
/// `addr` is the registry address for the test.
pub fn ephemeral_registry_config() -> ServerRuntimeConfig {
    registry_config("127.0.0.1:0")
}

/// Bind a server and drive its run loop on a background task.
pub async fn spawn_server(config: ServerRuntimeConfig) -> Result<ServerUnderTest, ServerError> {
    let server = Server::bind(config).await?;
    let addr = server.local_addr()?;
    let published = server.published_ref().clone();
    let handle = tokio::spawn(server.run());

    Ok(ServerUnderTest { addr, published, handle })
}

/// Reserve a port that is currently free on the loopback interface.
///
/// The reserving listener is dropped before returning, so the port can
/// be taken over by the code under test. Used for create-or-attach
/// scenarios that need a fixed, shareable port.
pub fn free_port() -> std::io::Result<u16> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}
