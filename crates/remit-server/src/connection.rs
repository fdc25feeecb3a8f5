//! Per-connection frame loop and request routing.
//!
//! Frames on one connection are processed strictly in order: read a
//! request, route it, write the reply. Concurrency comes from the accept
//! loop spawning one task per connection; invocations from different
//! connections are serialized by the account's state lock, not here.

use std::sync::Arc;

use bytes::Bytes;
use remit_core::{CodecError, read_frame, write_frame};
use remit_proto::{
    Fault, FaultKind, Frame, FrameHeader, Opcode, from_payload,
    payloads::{
        invoke::{InvokeReply, InvokeRequest},
        registry::{BindRequest, LookupReply, LookupRequest},
    },
    to_payload,
};
use tokio::net::TcpStream;

use crate::{ServerContext, error::ServerError};

/// Serve one client connection until it closes or misbehaves.
pub(crate) async fn handle_connection(
    mut stream: TcpStream,
    ctx: Arc<ServerContext>,
) -> Result<(), ServerError> {
    let peer = stream.peer_addr().map_or_else(|_| "unknown".to_string(), |a| a.to_string());
    tracing::debug!("new connection from {}", peer);

    loop {
        let frame = match read_frame(&mut stream).await {
            Ok(frame) => frame,
            Err(CodecError::Io(e)) => {
                tracing::debug!("connection from {} closed: {}", peer, e);
                break;
            },
            Err(CodecError::Wire(e)) => {
                tracing::warn!("malformed frame from {}: {}", peer, e);
                break;
            },
        };

        let reply = route(&ctx, &frame).await?;
        write_frame(&mut stream, &reply)
            .await
            .map_err(|e| ServerError::Transport(e.to_string()))?;
    }

    Ok(())
}

/// Produce the reply frame for one request.
///
/// Expected failures (unknown name, occupied name, unknown object, bad
/// request) become fault replies; only encoding breakage is an `Err`.
async fn route(ctx: &ServerContext, frame: &Frame) -> Result<Frame, ServerError> {
    let header = &frame.header;

    let Some(opcode) = header.opcode_enum() else {
        return fault_reply(
            header,
            &Fault::new(FaultKind::BadRequest, format!("unknown opcode {}", header.opcode())),
        );
    };

    match opcode {
        Opcode::Bind => handle_bind(ctx, frame, false).await,
        Opcode::Rebind => handle_bind(ctx, frame, true).await,
        Opcode::Lookup => handle_lookup(ctx, frame).await,
        Opcode::Invoke => handle_invoke(ctx, frame).await,
    }
}

async fn handle_bind(
    ctx: &ServerContext,
    frame: &Frame,
    overwrite: bool,
) -> Result<Frame, ServerError> {
    let Some(registry) = ctx.registry.as_ref() else {
        return not_a_registry(&frame.header);
    };

    let request: BindRequest = match from_payload(&frame.payload) {
        Ok(request) => request,
        Err(e) => {
            return fault_reply(&frame.header, &Fault::new(FaultKind::BadRequest, e.to_string()));
        },
    };

    let mut table = registry.write().await;
    if overwrite {
        table.rebind(&request.name, request.target);
        return Ok(Frame::response_to(&frame.header, Bytes::new()));
    }

    match table.bind(&request.name, request.target) {
        Ok(()) => Ok(Frame::response_to(&frame.header, Bytes::new())),
        Err(e) => fault_reply(&frame.header, &e.to_fault()),
    }
}

async fn handle_lookup(ctx: &ServerContext, frame: &Frame) -> Result<Frame, ServerError> {
    let Some(registry) = ctx.registry.as_ref() else {
        return not_a_registry(&frame.header);
    };

    let request: LookupRequest = match from_payload(&frame.payload) {
        Ok(request) => request,
        Err(e) => {
            return fault_reply(&frame.header, &Fault::new(FaultKind::BadRequest, e.to_string()));
        },
    };

    let table = registry.read().await;
    match table.lookup(&request.name) {
        Ok(target) => {
            let payload = to_payload(&LookupReply { target })
                .map_err(|e| ServerError::Protocol(e.to_string()))?;
            Ok(Frame::response_to(&frame.header, payload))
        },
        Err(e) => fault_reply(&frame.header, &e.to_fault()),
    }
}

async fn handle_invoke(ctx: &ServerContext, frame: &Frame) -> Result<Frame, ServerError> {
    let request: InvokeRequest = match from_payload(&frame.payload) {
        Ok(request) => request,
        Err(e) => {
            return fault_reply(&frame.header, &Fault::new(FaultKind::BadRequest, e.to_string()));
        },
    };

    match ctx.exports.dispatch(&request).await {
        Ok(value) => {
            let payload = to_payload(&InvokeReply { value })
                .map_err(|e| ServerError::Protocol(e.to_string()))?;
            Ok(Frame::response_to(&frame.header, payload))
        },
        Err(e) => fault_reply(&frame.header, &e.to_fault()),
    }
}

fn not_a_registry(header: &FrameHeader) -> Result<Frame, ServerError> {
    fault_reply(header, &Fault::new(FaultKind::BadRequest, "registry not hosted on this endpoint"))
}

fn fault_reply(request: &FrameHeader, fault: &Fault) -> Result<Frame, ServerError> {
    let payload = to_payload(fault).map_err(|e| ServerError::Protocol(e.to_string()))?;
    Ok(Frame::fault_to(request, payload))
}
