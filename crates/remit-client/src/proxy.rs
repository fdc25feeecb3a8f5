//! Request channel, registry client, and the account proxy.
//!
//! The proxy is a hand-written stub: each contract operation serializes
//! into an `Invoke` frame, travels over one reused TCP connection, and
//! blocks the caller until the response or a communication failure. A
//! call that receives no response within the channel's timeout fails
//! instead of waiting indefinitely.

use std::time::Duration;

use bytes::Bytes;
use remit_core::{read_frame, write_frame};
use remit_proto::{
    Fault, Frame, Opcode, from_payload,
    payloads::{
        invoke::{InvokeReply, InvokeRequest, MethodCall, ReturnValue},
        registry::{BindRequest, LookupReply, LookupRequest, RemoteRef},
    },
    to_payload,
};
use tokio::{net::TcpStream, time::timeout};

use crate::error::ClientError;

/// One request/response connection to a Remit endpoint.
///
/// Request ids increment per call and must be echoed by the responder;
/// a mismatched reply is a protocol violation, not a communication
/// failure.
pub(crate) struct RequestChannel {
    stream: TcpStream,
    next_request_id: u64,
    call_timeout: Duration,
}

impl RequestChannel {
    /// Connect to `addr`, bounded by `call_timeout`.
    pub(crate) async fn connect(addr: &str, call_timeout: Duration) -> Result<Self, ClientError> {
        let stream = timeout(call_timeout, TcpStream::connect(addr)).await??;
        Ok(Self { stream, next_request_id: 0, call_timeout })
    }

    /// Send one request and wait for its reply.
    pub(crate) async fn roundtrip(
        &mut self,
        opcode: Opcode,
        payload: Bytes,
    ) -> Result<Frame, ClientError> {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        let request = Frame::request(opcode, request_id, payload);

        let stream = &mut self.stream;
        let reply = timeout(self.call_timeout, async move {
            write_frame(stream, &request).await?;
            read_frame(stream).await
        })
        .await??;

        if !reply.header.is_response() || reply.header.opcode() != opcode as u8 {
            return Err(ClientError::Protocol {
                reason: format!(
                    "expected response to opcode {}, got opcode {} flags {:?}",
                    opcode as u8,
                    reply.header.opcode(),
                    reply.header.flags()
                ),
            });
        }

        if reply.header.request_id() != request_id {
            return Err(ClientError::Protocol {
                reason: format!(
                    "request id mismatch: sent {request_id}, got {}",
                    reply.header.request_id()
                ),
            });
        }

        if reply.header.is_fault() {
            let fault: Fault = from_payload(&reply.payload)
                .map_err(|e| ClientError::Protocol { reason: e.to_string() })?;
            return Err(ClientError::from_fault(fault));
        }

        Ok(reply)
    }
}

/// Client for a registry endpoint: bind, rebind, and lookup by name.
pub struct RegistryClient {
    channel: RequestChannel,
}

impl RegistryClient {
    /// Connect to the registry at `registry` (`host:port`).
    pub async fn connect(registry: &str, call_timeout: Duration) -> Result<Self, ClientError> {
        let channel = RequestChannel::connect(registry, call_timeout).await?;
        Ok(Self { channel })
    }

    /// Register `target` under `name`, failing if the name is bound.
    pub async fn bind(&mut self, name: &str, target: &RemoteRef) -> Result<(), ClientError> {
        let payload = to_payload(&BindRequest { name: name.to_string(), target: target.clone() })?;
        self.channel.roundtrip(Opcode::Bind, payload).await?;
        Ok(())
    }

    /// Register `target` under `name`, overwriting any existing binding.
    pub async fn rebind(&mut self, name: &str, target: &RemoteRef) -> Result<(), ClientError> {
        let payload = to_payload(&BindRequest { name: name.to_string(), target: target.clone() })?;
        self.channel.roundtrip(Opcode::Rebind, payload).await?;
        Ok(())
    }

    /// Resolve `name` to its current remote reference.
    pub async fn lookup(&mut self, name: &str) -> Result<RemoteRef, ClientError> {
        let payload = to_payload(&LookupRequest { name: name.to_string() })?;
        let reply = self.channel.roundtrip(Opcode::Lookup, payload).await?;

        let reply: LookupReply = from_payload(&reply.payload)?;
        Ok(reply.target)
    }
}

/// Local surrogate for the remote account object.
///
/// Obtained from a [`RemoteRef`]; forwards each operation over the wire
/// and unwraps the returned value. Calls are synchronous request/response
/// on one connection.
pub struct AccountProxy {
    channel: RequestChannel,
    object_id: u64,
}

impl AccountProxy {
    /// Connect to the endpoint a lookup returned.
    pub async fn connect(target: &RemoteRef, call_timeout: Duration) -> Result<Self, ClientError> {
        let channel = RequestChannel::connect(&target.endpoint(), call_timeout).await?;
        Ok(Self { channel, object_id: target.object_id })
    }

    /// Read the account holder's name.
    pub async fn account_name(&mut self) -> Result<String, ClientError> {
        match self.invoke(MethodCall::GetAccountName).await? {
            ReturnValue::Text(name) => Ok(name),
            other => Err(unexpected_value("get_account_name", &other)),
        }
    }

    /// Overwrite the account holder's name.
    pub async fn set_account_name(&mut self, name: impl Into<String>) -> Result<(), ClientError> {
        match self.invoke(MethodCall::SetAccountName { name: name.into() }).await? {
            ReturnValue::Unit => Ok(()),
            other => Err(unexpected_value("set_account_name", &other)),
        }
    }

    /// Read the current balance.
    pub async fn balance(&mut self) -> Result<f64, ClientError> {
        match self.invoke(MethodCall::GetBalance).await? {
            ReturnValue::Number(value) => Ok(value),
            other => Err(unexpected_value("get_balance", &other)),
        }
    }

    /// Overwrite the current balance.
    pub async fn set_balance(&mut self, value: f64) -> Result<(), ClientError> {
        match self.invoke(MethodCall::SetBalance { value }).await? {
            ReturnValue::Unit => Ok(()),
            other => Err(unexpected_value("set_balance", &other)),
        }
    }

    /// Read the formatted name + balance summary.
    pub async fn account_info(&mut self) -> Result<String, ClientError> {
        match self.invoke(MethodCall::GetAccountInfo).await? {
            ReturnValue::Text(info) => Ok(info),
            other => Err(unexpected_value("get_account_info", &other)),
        }
    }

    async fn invoke(&mut self, call: MethodCall) -> Result<ReturnValue, ClientError> {
        let payload = to_payload(&InvokeRequest { object_id: self.object_id, call })?;
        let reply = self.channel.roundtrip(Opcode::Invoke, payload).await?;

        let reply: InvokeReply = from_payload(&reply.payload)?;
        Ok(reply.value)
    }
}

fn unexpected_value(method: &str, value: &ReturnValue) -> ClientError {
    ClientError::Protocol { reason: format!("unexpected return value for {method}: {value:?}") }
}
