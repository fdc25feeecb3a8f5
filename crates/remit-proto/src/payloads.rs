//! CBOR request and response bodies.
//!
//! Bodies are serde types encoded with ciborium. Helpers here convert
//! between payload types and the raw [`bytes::Bytes`] carried by a frame.

pub mod invoke;
pub mod registry;

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::WireError;

/// Encode a payload body to CBOR bytes.
pub fn to_payload<T: Serialize>(value: &T) -> Result<Bytes, WireError> {
    let mut bytes = Vec::new();
    ciborium::ser::into_writer(value, &mut bytes)
        .map_err(|e| WireError::Encode { reason: e.to_string() })?;
    Ok(Bytes::from(bytes))
}

/// Decode a payload body from CBOR bytes.
pub fn from_payload<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, WireError> {
    ciborium::de::from_reader(bytes).map_err(|e| WireError::Decode { reason: e.to_string() })
}
