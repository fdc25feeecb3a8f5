//! Invocation dispatch against exported objects.

use std::{collections::HashMap, sync::Arc};

use remit_proto::{
    Fault, FaultKind,
    payloads::invoke::{InvokeRequest, MethodCall, ReturnValue},
};
use thiserror::Error;

use crate::account::Account;

/// Errors from invocation dispatch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// Invocation addressed an object id that is not exported.
    #[error("no exported object with id {object_id:016x}")]
    UnknownObject {
        /// The unknown object id.
        object_id: u64,
    },
}

impl DispatchError {
    /// Wire fault equivalent of this error.
    pub fn to_fault(&self) -> Fault {
        match self {
            Self::UnknownObject { object_id } => {
                Fault::new(FaultKind::UnknownObject, format!("{object_id:016x}"))
            },
        }
    }
}

/// Object id → account mapping for one server process.
///
/// The demo exports exactly one account, but dispatch is keyed by object
/// id so a stale reference from a previous server run faults cleanly
/// instead of hitting the wrong object.
#[derive(Debug, Default)]
pub struct ExportTable {
    objects: HashMap<u64, Arc<Account>>,
}

impl ExportTable {
    /// Create an empty export table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Export `account` under `object_id`.
    pub fn export(&mut self, object_id: u64, account: Arc<Account>) {
        tracing::debug!(object_id, "exported object");
        self.objects.insert(object_id, account);
    }

    /// Apply one invocation to the addressed object.
    pub async fn dispatch(&self, request: &InvokeRequest) -> Result<ReturnValue, DispatchError> {
        let account = self
            .objects
            .get(&request.object_id)
            .ok_or(DispatchError::UnknownObject { object_id: request.object_id })?;

        tracing::debug!(method = request.call.name(), "dispatching invocation");

        let value = match &request.call {
            MethodCall::GetAccountName => ReturnValue::Text(account.account_name().await),
            MethodCall::SetAccountName { name } => {
                account.set_account_name(name.clone()).await;
                ReturnValue::Unit
            },
            MethodCall::GetBalance => ReturnValue::Number(account.balance().await),
            MethodCall::SetBalance { value } => {
                account.set_balance(*value).await;
                ReturnValue::Unit
            },
            MethodCall::GetAccountInfo => ReturnValue::Text(account.account_info().await),
        };

        Ok(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn table_with_account(object_id: u64) -> ExportTable {
        let mut table = ExportTable::new();
        table.export(object_id, Arc::new(Account::default()));
        table
    }

    #[tokio::test]
    async fn dispatch_reads_defaults() {
        let table = table_with_account(7);

        let request = InvokeRequest { object_id: 7, call: MethodCall::GetAccountName };
        let value = table.dispatch(&request).await.unwrap();
        assert_eq!(value, ReturnValue::Text("Warren Buffett".to_string()));

        let request = InvokeRequest { object_id: 7, call: MethodCall::GetBalance };
        let value = table.dispatch(&request).await.unwrap();
        assert_eq!(value, ReturnValue::Number(10_000.0));
    }

    #[tokio::test]
    async fn dispatch_applies_writes_in_order() {
        let table = table_with_account(7);

        let set_name = InvokeRequest {
            object_id: 7,
            call: MethodCall::SetAccountName { name: "Money-Maker".to_string() },
        };
        assert_eq!(table.dispatch(&set_name).await.unwrap(), ReturnValue::Unit);

        let set_balance = InvokeRequest {
            object_id: 7,
            call: MethodCall::SetBalance { value: 10_000_000_000.0 },
        };
        assert_eq!(table.dispatch(&set_balance).await.unwrap(), ReturnValue::Unit);

        let info = InvokeRequest { object_id: 7, call: MethodCall::GetAccountInfo };
        match table.dispatch(&info).await.unwrap() {
            ReturnValue::Text(info) => {
                assert!(info.contains("Money-Maker"));
                assert!(info.contains("10000000000.00"));
            },
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn dispatch_faults_on_unknown_object() {
        let table = table_with_account(7);

        let request = InvokeRequest { object_id: 8, call: MethodCall::GetBalance };
        let result = table.dispatch(&request).await;

        assert_eq!(result, Err(DispatchError::UnknownObject { object_id: 8 }));
        let fault = result.unwrap_err().to_fault();
        assert_eq!(fault.kind, remit_proto::FaultKind::UnknownObject);
    }
}
