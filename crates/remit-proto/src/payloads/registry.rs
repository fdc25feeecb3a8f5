//! Registry operation bodies: bind, rebind, and lookup.

use serde::{Deserialize, Serialize};

/// Network-addressable reference to an exported object.
///
/// Returned by lookup and stored in the registry table. A reference has no
/// lifecycle of its own; it is valid only while the owning server process
/// and its registry entry exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRef {
    /// Host the owning server advertises.
    pub host: String,
    /// Port of the owning server's invocation endpoint.
    pub port: u16,
    /// Identity of the exported object on that endpoint.
    pub object_id: u64,
}

impl RemoteRef {
    /// Socket address string for connecting to the endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl std::fmt::Display for RemoteRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}#{:016x}", self.host, self.port, self.object_id)
    }
}

/// Body of `Bind` and `Rebind` requests.
///
/// A successful bind or rebind response carries an empty body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindRequest {
    /// Service name to register.
    pub name: String,
    /// Reference the name should resolve to.
    pub target: RemoteRef,
}

/// Body of a `Lookup` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    /// Service name to resolve.
    pub name: String,
}

/// Body of a successful `Lookup` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupReply {
    /// Reference currently bound to the requested name.
    pub target: RemoteRef,
}
