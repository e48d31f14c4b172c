//! Command definitions
//!
//! Commands represent intentions to change or read the system state.

use crate::domain::{HistorySort, Transaction, UserBalance};

// =========================================================================
// TransactionCommand
// =========================================================================

/// Command to hold, approve or cancel an amount for one user
#[derive(Debug, Clone)]
pub struct TransactionCommand {
    pub order_id: i64,
    pub user_id: i64,
    pub service_id: i64,
    /// Nominal amount, always positive
    pub value: i64,
    /// Raw status token; parsed by the handler
    pub status: String,
    pub note: Option<String>,
}

impl TransactionCommand {
    pub fn new(order_id: i64, user_id: i64, service_id: i64, value: i64) -> Self {
        Self {
            order_id,
            user_id,
            service_id,
            value,
            status: String::new(),
            note: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

// =========================================================================
// TransferCommand
// =========================================================================

/// Command to move funds between users
#[derive(Debug, Clone, Copy)]
pub struct TransferCommand {
    pub sender: i64,
    pub recipient: i64,
    pub value: i64,
}

impl TransferCommand {
    pub fn new(sender: i64, recipient: i64, value: i64) -> Self {
        Self {
            sender,
            recipient,
            value,
        }
    }
}

// =========================================================================
// HistoryQuery
// =========================================================================

/// Query for one page of a user's transactions
#[derive(Debug, Clone, Copy)]
pub struct HistoryQuery {
    pub user_id: i64,
    pub page: i64,
    pub sort: HistorySort,
}

impl HistoryQuery {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            page: 1,
            sort: HistorySort::default(),
        }
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn with_sort(mut self, sort: HistorySort) -> Self {
        self.sort = sort;
        self
    }
}

/// Result of a successful transfer: one record per leg
#[derive(Debug, Clone)]
pub struct TransferResult {
    pub sender: Transaction,
    pub recipient: Transaction,
    pub sender_balance: UserBalance,
    pub recipient_balance: UserBalance,
}

/// Result of a successful transaction
#[derive(Debug, Clone)]
pub struct TransactionResult {
    pub transaction: Transaction,
    pub balance: UserBalance,
}

/// One page of history
#[derive(Debug, Clone)]
pub struct HistoryResult {
    pub user_id: i64,
    pub page: i64,
    pub sort: HistorySort,
    pub history: Vec<Transaction>,
}
