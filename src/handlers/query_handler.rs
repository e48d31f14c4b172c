//! Query Handler
//!
//! Read side: user history pages, order lookups, the full listing and
//! current balances.

use std::sync::Arc;

use crate::domain::{HistoryPage, Transaction, UserBalance};
use crate::error::AppError;
use crate::store::{BalanceStore, Ledger};

use super::validation;
use super::{HistoryQuery, HistoryResult};

/// Handler for read-only queries
pub struct QueryHandler {
    balances: Arc<dyn BalanceStore>,
    ledger: Arc<dyn Ledger>,
}

impl QueryHandler {
    pub fn new(balances: Arc<dyn BalanceStore>, ledger: Arc<dyn Ledger>) -> Self {
        Self { balances, ledger }
    }

    /// One page of a user's history; empty when there is nothing there
    pub async fn history(&self, query: HistoryQuery) -> Result<HistoryResult, AppError> {
        validation::validate_user_id(query.user_id)?;
        let page = HistoryPage::new(query.page, query.sort)?;

        let history = self.ledger.find_by_user(query.user_id, page).await?;

        Ok(HistoryResult {
            user_id: query.user_id,
            page: query.page,
            sort: query.sort,
            history,
        })
    }

    /// Latest record for an order
    pub async fn find_by_order(&self, order_id: i64) -> Result<Transaction, AppError> {
        self.ledger
            .find_last_by_order(order_id)
            .await?
            .ok_or(AppError::TransactionNotFound(order_id))
    }

    /// Every record in the ledger
    pub async fn list_all(&self) -> Result<Vec<Transaction>, AppError> {
        Ok(self.ledger.find_all().await?)
    }

    /// Current balance and reserve; unknown users read as zero
    pub async fn balance(&self, user_id: i64) -> Result<UserBalance, AppError> {
        validation::validate_user_id(user_id)?;
        Ok(self.balances.get(user_id).await?)
    }
}
