//! Invocation bodies: method calls and their return values.

use serde::{Deserialize, Serialize};

/// One operation of the account contract, with its arguments.
///
/// Arguments are owned by the call for the duration of the request only;
/// the server never retains them beyond applying the operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MethodCall {
    /// Read the account holder's name.
    GetAccountName,
    /// Overwrite the account holder's name.
    SetAccountName {
        /// New account name.
        name: String,
    },
    /// Read the current balance.
    GetBalance,
    /// Overwrite the current balance.
    SetBalance {
        /// New balance.
        value: f64,
    },
    /// Read the formatted name + balance summary.
    GetAccountInfo,
}

impl MethodCall {
    /// Operation name used in per-invocation log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetAccountName => "get_account_name",
            Self::SetAccountName { .. } => "set_account_name",
            Self::GetBalance => "get_balance",
            Self::SetBalance { .. } => "set_balance",
            Self::GetAccountInfo => "get_account_info",
        }
    }
}

/// Body of an `Invoke` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeRequest {
    /// Exported object the call is addressed to.
    pub object_id: u64,
    /// Operation to apply.
    pub call: MethodCall,
}

/// Value returned by a successful invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReturnValue {
    /// Setter completed; nothing to return.
    Unit,
    /// String result.
    Text(String),
    /// Numeric result.
    Number(f64),
}

/// Body of a successful `Invoke` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeReply {
    /// Result of the invocation.
    pub value: ReturnValue,
}
