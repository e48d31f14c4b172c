//! Store module
//!
//! Persistence seams for balances and the transaction ledger.
//! The core only talks to the traits; PostgreSQL and in-memory backends
//! implement them.

mod balance_repository;
mod error;
mod ledger_repository;
mod memory;

use async_trait::async_trait;

use crate::domain::{BalanceDelta, HistoryPage, NewTransaction, Transaction, UserBalance};

pub use balance_repository::PgBalanceStore;
pub use error::StoreError;
pub use ledger_repository::PgLedger;
pub use memory::{MemoryBalanceStore, MemoryLedger};

/// Authoritative per-user balance and reserve
#[async_trait]
pub trait BalanceStore: Send + Sync {
    /// Current state; users without a record read as `(0, 0)`
    async fn get(&self, user_id: i64) -> Result<UserBalance, StoreError>;

    /// Atomically apply `delta` to one user.
    ///
    /// Fails with [`StoreError::InsufficientFunds`] and changes nothing
    /// when a negative balance delta would leave the balance below zero.
    /// Concurrent calls for the same user are serialized.
    async fn apply(&self, user_id: i64, delta: BalanceDelta) -> Result<UserBalance, StoreError>;
}

/// Append-only transaction history
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Persist a record and return it with its assigned id
    async fn append(&self, transaction: NewTransaction) -> Result<Transaction, StoreError>;

    /// Every record, oldest id first
    async fn find_all(&self) -> Result<Vec<Transaction>, StoreError>;

    /// Most recent record for an order (by timestamp, then id)
    async fn find_last_by_order(&self, order_id: i64) -> Result<Option<Transaction>, StoreError>;

    /// One page of a user's records in the requested order
    async fn find_by_user(
        &self,
        user_id: i64,
        page: HistoryPage,
    ) -> Result<Vec<Transaction>, StoreError>;
}
