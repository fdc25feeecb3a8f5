//! Remote registry publication for attached servers.
//!
//! When another process already owns the registry port, this server
//! publishes its binding into that registry over the wire. Publication
//! is a single rebind so repeated server runs replace the stale
//! reference instead of failing.

use std::time::Duration;

use remit_core::{read_frame, write_frame};
use remit_proto::{Fault, Frame, Opcode, RemoteRef, from_payload, payloads::registry::BindRequest, to_payload};
use tokio::{net::TcpStream, time::timeout};

use crate::error::ServerError;

/// Request id for the one-shot publication roundtrip.
const PUBLISH_REQUEST_ID: u64 = 1;

/// Rebind `name` → `target` in the registry at `registry_addr`.
pub(crate) async fn publish_remote(
    registry_addr: &str,
    name: &str,
    target: &RemoteRef,
    attach_timeout: Duration,
) -> Result<(), ServerError> {
    let mut stream = timeout(attach_timeout, TcpStream::connect(registry_addr))
        .await
        .map_err(|_| {
            ServerError::Registry(format!("timed out connecting to registry at {registry_addr}"))
        })?
        .map_err(|e| ServerError::Transport(e.to_string()))?;

    let payload = to_payload(&BindRequest { name: name.to_string(), target: target.clone() })
        .map_err(|e| ServerError::Protocol(e.to_string()))?;
    let request = Frame::request(Opcode::Rebind, PUBLISH_REQUEST_ID, payload);

    let reply = timeout(attach_timeout, async {
        write_frame(&mut stream, &request).await?;
        read_frame(&mut stream).await
    })
    .await
    .map_err(|_| ServerError::Registry("timed out publishing binding".to_string()))?
    .map_err(|e| ServerError::Transport(e.to_string()))?;

    if reply.header.is_fault() {
        let fault: Fault = from_payload(&reply.payload)
            .map_err(|e| ServerError::Protocol(e.to_string()))?;
        return Err(ServerError::Registry(fault.to_string()));
    }

    if !reply.header.is_response() || reply.header.request_id() != PUBLISH_REQUEST_ID {
        return Err(ServerError::Protocol("unexpected reply to rebind".to_string()));
    }

    Ok(())
}
