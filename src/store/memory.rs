//! In-memory stores
//!
//! Process-local backends with the same semantics as the PostgreSQL ones.
//! Used for `STORAGE_BACKEND=memory` and in tests, where the failure
//! injection hooks simulate an unreachable store.

use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    BalanceDelta, HistoryPage, HistorySort, NewTransaction, Transaction, UserBalance,
};

use super::{BalanceStore, Ledger, StoreError};

/// Balance store over a mutex-guarded map.
///
/// The single lock serializes every mutation, which is a superset of the
/// per-user serialization the contract asks for.
#[derive(Debug, Default)]
pub struct MemoryBalanceStore {
    users: Mutex<HashMap<i64, UserBalance>>,
    /// user id -> number of `apply` calls that still succeed before failing
    failures: Mutex<HashMap<i64, usize>>,
}

impl MemoryBalanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from known balances
    pub async fn with_balances(balances: impl IntoIterator<Item = UserBalance>) -> Self {
        let store = Self::new();
        {
            let mut users = store.users.lock().await;
            for balance in balances {
                users.insert(balance.user_id, balance);
            }
        }
        store
    }

    /// Make every `apply` for this user fail as unavailable
    pub async fn fail_user(&self, user_id: i64) {
        self.fail_user_after(user_id, 0).await;
    }

    /// Let `successes` more `apply` calls for this user through, then fail
    pub async fn fail_user_after(&self, user_id: i64, successes: usize) {
        self.failures.lock().await.insert(user_id, successes);
    }

    /// Clear injected failures for this user
    pub async fn recover_user(&self, user_id: i64) {
        self.failures.lock().await.remove(&user_id);
    }

    async fn check_injected_failure(&self, user_id: i64) -> Result<(), StoreError> {
        let mut failures = self.failures.lock().await;
        match failures.get_mut(&user_id) {
            Some(0) => Err(StoreError::Unavailable(format!(
                "balance store rejected update for user {}",
                user_id
            ))),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BalanceStore for MemoryBalanceStore {
    async fn get(&self, user_id: i64) -> Result<UserBalance, StoreError> {
        let users = self.users.lock().await;
        Ok(users
            .get(&user_id)
            .copied()
            .unwrap_or_else(|| UserBalance::empty(user_id)))
    }

    async fn apply(&self, user_id: i64, delta: BalanceDelta) -> Result<UserBalance, StoreError> {
        self.check_injected_failure(user_id).await?;

        let mut users = self.users.lock().await;
        let current = users
            .get(&user_id)
            .copied()
            .unwrap_or_else(|| UserBalance::empty(user_id));
        let next = current
            .apply(delta)
            .map_err(|_| StoreError::Overflow(user_id))?;

        if delta.is_debit() && next.balance < 0 {
            return Err(StoreError::InsufficientFunds {
                user_id,
                required: -delta.balance,
                available: current.balance,
            });
        }
        if delta.is_release() && next.reserve < 0 {
            return Err(StoreError::InsufficientReserve {
                user_id,
                required: -delta.reserve,
                available: current.reserve,
            });
        }

        users.insert(user_id, next);
        Ok(next)
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    records: Vec<Transaction>,
    next_id: i64,
    /// Appends that still succeed before failing; `None` means never fail
    appends_before_failure: Option<usize>,
}

/// Ledger over a mutex-guarded vector
#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: Mutex<LedgerState>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `successes` more appends through, then fail every append
    pub async fn fail_appends_after(&self, successes: usize) {
        self.state.lock().await.appends_before_failure = Some(successes);
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.state.lock().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn append(&self, transaction: NewTransaction) -> Result<Transaction, StoreError> {
        let mut state = self.state.lock().await;

        match state.appends_before_failure.as_mut() {
            Some(0) => {
                return Err(StoreError::Unavailable(
                    "ledger rejected append".to_string(),
                ))
            }
            Some(remaining) => *remaining -= 1,
            None => {}
        }

        state.next_id += 1;
        let record = transaction.into_record(state.next_id);
        state.records.push(record.clone());
        Ok(record)
    }

    async fn find_all(&self) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.state.lock().await.records.clone())
    }

    async fn find_last_by_order(&self, order_id: i64) -> Result<Option<Transaction>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .records
            .iter()
            .filter(|t| t.order_id == order_id)
            .max_by_key(|t| (t.timestamp, t.id))
            .cloned())
    }

    async fn find_by_user(
        &self,
        user_id: i64,
        page: HistoryPage,
    ) -> Result<Vec<Transaction>, StoreError> {
        let state = self.state.lock().await;
        let mut records: Vec<Transaction> = state
            .records
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();

        match page.sort {
            HistorySort::ByDate => records.sort_by_key(|t| Reverse((t.timestamp, t.id))),
            HistorySort::ByAmount => {
                records.sort_by_key(|t| Reverse((t.value.unsigned_abs(), t.id)))
            }
        }

        Ok(records
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }
}
