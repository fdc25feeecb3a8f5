//! Name registry table.
//!
//! Maps service names to remote references. The table itself is plain
//! data; the hosting server wraps it in a lock and serves it over the
//! wire. Create-or-attach semantics (who owns the listening socket) live
//! in the server crate.
//!
//! # Invariants
//!
//! - A name resolves to at most one live reference at a time
//! - `bind` never disturbs an existing binding, `rebind` always wins

use std::collections::HashMap;

use remit_proto::{Fault, FaultKind, RemoteRef};
use thiserror::Error;

/// Errors from registry table operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Non-overwriting bind of an occupied name.
    #[error("name already bound: {name}")]
    NameAlreadyBound {
        /// The occupied service name.
        name: String,
    },

    /// Lookup of a name with no binding.
    #[error("name not found: {name}")]
    NameNotFound {
        /// The unbound service name.
        name: String,
    },
}

impl RegistryError {
    /// Wire fault equivalent of this error.
    ///
    /// The offending name travels in the fault detail so the client can
    /// rebuild the typed error.
    pub fn to_fault(&self) -> Fault {
        match self {
            Self::NameAlreadyBound { name } => Fault::new(FaultKind::NameAlreadyBound, name),
            Self::NameNotFound { name } => Fault::new(FaultKind::NameNotFound, name),
        }
    }
}

/// Name → remote reference bindings for one registry instance.
#[derive(Debug, Default)]
pub struct RegistryTable {
    bindings: HashMap<String, RemoteRef>,
}

impl RegistryTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `target` under `name`, refusing to overwrite.
    pub fn bind(&mut self, name: &str, target: RemoteRef) -> Result<(), RegistryError> {
        if self.bindings.contains_key(name) {
            return Err(RegistryError::NameAlreadyBound { name: name.to_string() });
        }

        tracing::debug!(name, %target, "bound service");
        self.bindings.insert(name.to_string(), target);
        Ok(())
    }

    /// Register `target` under `name`, overwriting any existing binding.
    pub fn rebind(&mut self, name: &str, target: RemoteRef) {
        tracing::debug!(name, %target, "rebound service");
        self.bindings.insert(name.to_string(), target);
    }

    /// Resolve `name` to its current binding.
    pub fn lookup(&self, name: &str) -> Result<RemoteRef, RegistryError> {
        self.bindings
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NameNotFound { name: name.to_string() })
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True if no names are bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn make_ref(object_id: u64) -> RemoteRef {
        RemoteRef { host: "127.0.0.1".to_string(), port: 1099, object_id }
    }

    #[test]
    fn lookup_of_unbound_name_fails() {
        let table = RegistryTable::new();
        let result = table.lookup("Account");
        assert_eq!(result, Err(RegistryError::NameNotFound { name: "Account".to_string() }));
    }

    #[test]
    fn bind_refuses_occupied_name_and_keeps_original() {
        let mut table = RegistryTable::new();
        table.bind("Account", make_ref(1)).unwrap();

        let result = table.bind("Account", make_ref(2));
        assert_eq!(result, Err(RegistryError::NameAlreadyBound { name: "Account".to_string() }));

        // Original binding unchanged.
        assert_eq!(table.lookup("Account").unwrap().object_id, 1);
    }

    #[test]
    fn rebind_always_overwrites() {
        let mut table = RegistryTable::new();
        table.rebind("Account", make_ref(1));
        table.rebind("Account", make_ref(2));

        assert_eq!(table.lookup("Account").unwrap().object_id, 2);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn names_are_independent() {
        let mut table = RegistryTable::new();
        table.bind("Account", make_ref(1)).unwrap();
        table.bind("Ledger", make_ref(2)).unwrap();

        assert_eq!(table.lookup("Account").unwrap().object_id, 1);
        assert_eq!(table.lookup("Ledger").unwrap().object_id, 2);
    }

    #[test]
    fn registry_error_maps_to_fault_with_name_detail() {
        let err = RegistryError::NameNotFound { name: "Account".to_string() };
        let fault = err.to_fault();

        assert_eq!(fault.kind, remit_proto::FaultKind::NameNotFound);
        assert_eq!(fault.detail, "Account");
    }

    proptest! {
        // The last rebind in any sequence is the one lookup observes.
        #[test]
        fn last_rebind_wins(ids in proptest::collection::vec(any::<u64>(), 1..32)) {
            let mut table = RegistryTable::new();
            for id in &ids {
                table.rebind("Account", make_ref(*id));
            }

            let last = *ids.last().unwrap();
            prop_assert_eq!(table.lookup("Account").unwrap().object_id, last);
        }
    }
}
