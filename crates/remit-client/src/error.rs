//! Client error types.

use remit_core::CodecError;
use remit_proto::{Fault, FaultKind};
use thiserror::Error;

/// Errors from client-side registry and invocation calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Lookup of a name with no binding.
    #[error("name not found: {name}")]
    NameNotFound {
        /// The unbound service name.
        name: String,
    },

    /// Non-overwriting bind of an occupied name.
    #[error("name already bound: {name}")]
    NameAlreadyBound {
        /// The occupied service name.
        name: String,
    },

    /// Transport failed: connect refused, stream closed, or call timed out.
    #[error("remote communication failed: {reason}")]
    Communication {
        /// Description of the transport failure.
        reason: String,
    },

    /// The peer answered with something other than a well-formed reply to
    /// our request.
    #[error("protocol violation: {reason}")]
    Protocol {
        /// Description of the violation.
        reason: String,
    },

    /// Server-side fault with no more specific mapping.
    #[error("remote fault: {kind:?}: {detail}")]
    Fault {
        /// Failure category from the wire.
        kind: FaultKind,
        /// Fault detail from the wire.
        detail: String,
    },
}

impl ClientError {
    /// True for transport-level failures (unreachable peer, timeout).
    ///
    /// These are the errors a retrying caller could reasonably attempt
    /// again; everything else is deterministic.
    pub fn is_communication(&self) -> bool {
        matches!(self, Self::Communication { .. })
    }

    /// Rebuild a typed error from a wire fault.
    pub(crate) fn from_fault(fault: Fault) -> Self {
        match fault.kind {
            FaultKind::NameNotFound => Self::NameNotFound { name: fault.detail },
            FaultKind::NameAlreadyBound => Self::NameAlreadyBound { name: fault.detail },
            FaultKind::UnknownObject | FaultKind::BadRequest => {
                Self::Fault { kind: fault.kind, detail: fault.detail }
            },
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Communication { reason: err.to_string() }
    }
}

impl From<tokio::time::error::Elapsed> for ClientError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Self::Communication { reason: "call timed out".to_string() }
    }
}

impl From<remit_proto::WireError> for ClientError {
    fn from(err: remit_proto::WireError) -> Self {
        Self::Protocol { reason: err.to_string() }
    }
}

impl From<CodecError> for ClientError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Io(e) => Self::Communication { reason: e.to_string() },
            CodecError::Wire(e) => Self::Protocol { reason: e.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_faults_map_to_typed_errors() {
        let err = ClientError::from_fault(Fault::new(FaultKind::NameNotFound, "Account"));
        assert!(matches!(err, ClientError::NameNotFound { name } if name == "Account"));

        let err = ClientError::from_fault(Fault::new(FaultKind::NameAlreadyBound, "Account"));
        assert!(matches!(err, ClientError::NameAlreadyBound { name } if name == "Account"));
    }

    #[test]
    fn other_faults_stay_generic() {
        let err = ClientError::from_fault(Fault::new(FaultKind::BadRequest, "nope"));
        assert!(matches!(err, ClientError::Fault { kind: FaultKind::BadRequest, .. }));
    }

    #[test]
    fn only_transport_failures_are_communication() {
        let timeout: ClientError = ClientError::Communication { reason: "call timed out".into() };
        assert!(timeout.is_communication());

        let not_found = ClientError::NameNotFound { name: "Account".into() };
        assert!(!not_found.is_communication());
    }
}
