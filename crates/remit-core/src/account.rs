//! The account object served over the invocation channel.
//!
//! `Account` is the only stateful remote object in the system. Its state
//! is owned exclusively by the server process and mutated only through
//! dispatched invocations; concurrent invocations against one account are
//! serialized by the state lock.
//!
//! # Invariants
//!
//! - Reads may run concurrently with each other, never with a write
//! - Setters overwrite unconditionally: no validation, no range checks

use tokio::sync::RwLock;

/// Mutable account record.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountState {
    /// Account holder's name.
    pub name: String,
    /// Current balance.
    pub balance: f64,
}

impl Default for AccountState {
    fn default() -> Self {
        Self { name: "Warren Buffett".to_string(), balance: 10_000.0 }
    }
}

/// Stateful remote object implementing the account contract.
///
/// Every operation logs its own name; the events are an observability
/// side channel, not part of the contract.
#[derive(Debug, Default)]
pub struct Account {
    state: RwLock<AccountState>,
}

impl Account {
    /// Create an account with the given initial state.
    pub fn new(state: AccountState) -> Self {
        Self { state: RwLock::new(state) }
    }

    /// Read the account holder's name.
    pub async fn account_name(&self) -> String {
        tracing::info!("call account_name");
        self.state.read().await.name.clone()
    }

    /// Overwrite the account holder's name.
    pub async fn set_account_name(&self, name: String) {
        tracing::info!("call set_account_name");
        self.state.write().await.name = name;
    }

    /// Read the current balance.
    pub async fn balance(&self) -> f64 {
        tracing::info!("call balance");
        self.state.read().await.balance
    }

    /// Overwrite the current balance.
    pub async fn set_balance(&self, value: f64) {
        tracing::info!("call set_balance");
        self.state.write().await.balance = value;
    }

    /// Read the formatted name + balance summary.
    pub async fn account_info(&self) -> String {
        tracing::info!("call account_info");
        let state = self.state.read().await;
        format!("AccountName: {}\nBalance: {:.2}", state.name, state.balance)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn fresh_account_has_demo_defaults() {
        let account = Account::default();

        assert_eq!(account.account_name().await, "Warren Buffett");
        assert!((account.balance().await - 10_000.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn setters_overwrite_unconditionally() {
        let account = Account::default();

        account.set_account_name("Money-Maker".to_string()).await;
        assert_eq!(account.account_name().await, "Money-Maker");

        account.set_balance(10_000_000_000.0).await;
        assert!((account.balance().await - 10_000_000_000.0).abs() < f64::EPSILON);

        // Matches the source demo: negative balances are accepted as-is.
        account.set_balance(-42.5).await;
        assert!((account.balance().await + 42.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn account_info_formats_name_and_balance() {
        let account = Account::default();
        insta::assert_snapshot!(
            account.account_info().await,
            @"AccountName: Warren Buffett\nBalance: 10000.00"
        );
    }

    #[tokio::test]
    async fn account_info_reflects_updates() {
        let account = Account::default();
        account.set_account_name("Money-Maker".to_string()).await;
        account.set_balance(10_000_000_000.0).await;

        let info = account.account_info().await;
        assert!(info.contains("Money-Maker"));
        assert!(info.contains("10000000000.00"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writes_leave_one_written_value() {
        let account = Arc::new(Account::default());

        let writers: Vec<_> = (0..16)
            .map(|i| {
                let account = Arc::clone(&account);
                tokio::spawn(async move { account.set_balance(f64::from(i) * 1_000.0).await })
            })
            .collect();

        for writer in writers {
            writer.await.unwrap();
        }

        let balance = account.balance().await;
        let written: Vec<f64> = (0..16).map(|i| f64::from(i) * 1_000.0).collect();
        assert!(
            written.iter().any(|v| (balance - v).abs() < f64::EPSILON),
            "balance {balance} is not one of the written values"
        );
    }
}
