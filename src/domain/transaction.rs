//! Transaction records
//!
//! Immutable ledger entries. Corrections are new records, never edits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TransactionStatus;

/// A persisted ledger record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub order_id: i64,
    pub user_id: i64,
    pub service_id: i64,
    /// Signed delta applied to the user's balance
    pub value: i64,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
    pub note: String,
}

/// A record ready to append; the ledger assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub order_id: i64,
    pub user_id: i64,
    pub service_id: i64,
    pub value: i64,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
    pub note: String,
}

impl NewTransaction {
    /// Attach the ledger-assigned id
    pub fn into_record(self, id: i64) -> Transaction {
        Transaction {
            id,
            order_id: self.order_id,
            user_id: self.user_id,
            service_id: self.service_id,
            value: self.value,
            timestamp: self.timestamp,
            status: self.status,
            note: self.note,
        }
    }
}
