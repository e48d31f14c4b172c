//! Shared application state
//!
//! Store handles injected into every request.

use std::sync::Arc;

use sqlx::PgPool;

use crate::handlers::{QueryHandler, TransactionHandler, TransferHandler};
use crate::store::{BalanceStore, Ledger, MemoryBalanceStore, MemoryLedger, PgBalanceStore, PgLedger};

#[derive(Clone)]
pub struct AppState {
    pub balances: Arc<dyn BalanceStore>,
    pub ledger: Arc<dyn Ledger>,
}

impl AppState {
    pub fn new(balances: Arc<dyn BalanceStore>, ledger: Arc<dyn Ledger>) -> Self {
        Self { balances, ledger }
    }

    /// Both stores on one PostgreSQL pool
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgBalanceStore::new(pool.clone())),
            Arc::new(PgLedger::new(pool)),
        )
    }

    /// Fresh, empty in-memory stores
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryBalanceStore::new()),
            Arc::new(MemoryLedger::new()),
        )
    }

    pub fn transactions(&self) -> TransactionHandler {
        TransactionHandler::new(self.balances.clone(), self.ledger.clone())
    }

    pub fn transfers(&self) -> TransferHandler {
        TransferHandler::new(self.balances.clone(), self.ledger.clone())
    }

    pub fn queries(&self) -> QueryHandler {
        QueryHandler::new(self.balances.clone(), self.ledger.clone())
    }
}
