//! Wire representation of server-side failures.
//!
//! A fault is the body of a response frame whose `FAULT` flag is set. The
//! client maps it back to a typed error at the proxy boundary; transport
//! failures never appear here, they surface locally on the calling side.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Failure category carried on the wire as a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum FaultKind {
    /// Lookup or unbind of a name with no binding.
    NameNotFound = 1,
    /// Non-overwriting bind of an occupied name.
    NameAlreadyBound = 2,
    /// Invocation against an object id that is not exported.
    UnknownObject = 3,
    /// Request the endpoint cannot serve (bad opcode, undecodable body,
    /// registry operation on a non-registry endpoint).
    BadRequest = 4,
}

impl FaultKind {
    /// Stable label used in logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::NameNotFound => "name_not_found",
            Self::NameAlreadyBound => "name_already_bound",
            Self::UnknownObject => "unknown_object",
            Self::BadRequest => "bad_request",
        }
    }
}

/// Fault body of a failed response.
///
/// For the name-keyed kinds (`NameNotFound`, `NameAlreadyBound`) `detail`
/// carries the offending service name verbatim so the client can rebuild
/// a typed error without re-parsing prose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    /// Failure category.
    pub kind: FaultKind,
    /// Offending name, or a human-readable description.
    pub detail: String,
}

impl Fault {
    /// Build a fault from its parts.
    pub fn new(kind: FaultKind, detail: impl Into<String>) -> Self {
        Self { kind, detail: detail.into() }
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.detail)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn fault_serde_roundtrip() {
        let fault = Fault::new(FaultKind::NameNotFound, "Account");

        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&fault, &mut bytes).unwrap();
        let decoded: Fault = ciborium::de::from_reader(&bytes[..]).unwrap();

        assert_eq!(fault, decoded);
    }

    #[test]
    fn kind_encodes_as_integer() {
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&FaultKind::UnknownObject, &mut bytes).unwrap();

        let decoded: u8 = ciborium::de::from_reader(&bytes[..]).unwrap();
        assert_eq!(decoded, 3);
    }

    #[test]
    fn fault_display() {
        let fault = Fault::new(FaultKind::BadRequest, "registry not hosted here");
        assert_eq!(fault.to_string(), "bad_request: registry not hosted here");
    }
}
