//! Store Errors
//!
//! Error types for balance store and ledger operations.

/// Errors that can occur in the stores
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Debit rejected by the conditional update
    #[error("Insufficient funds for user {user_id}: required {required}, available {available}")]
    InsufficientFunds {
        user_id: i64,
        required: i64,
        available: i64,
    },

    /// Release rejected because the reserve holds less than requested
    #[error("Insufficient reserve for user {user_id}: required {required}, available {available}")]
    InsufficientReserve {
        user_id: i64,
        required: i64,
        available: i64,
    },

    /// Balance or reserve would overflow
    #[error("Balance overflow for user {0}")]
    Overflow(i64),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Backend unreachable or refused the call
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Persisted row could not be decoded
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}

impl StoreError {
    /// Check if the store refused the change on the current funds
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            StoreError::InsufficientFunds { .. } | StoreError::InsufficientReserve { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_classification() {
        let err = StoreError::InsufficientFunds {
            user_id: 1,
            required: 50,
            available: 20,
        };
        assert!(err.is_rejection());
        assert!(err.to_string().contains("required 50"));

        let err = StoreError::InsufficientReserve {
            user_id: 1,
            required: 30,
            available: 0,
        };
        assert!(err.is_rejection());

        let err = StoreError::Unavailable("connection reset".to_string());
        assert!(!err.is_rejection());

        let err = StoreError::Database(sqlx::Error::PoolTimedOut);
        assert!(!err.is_rejection());
    }
}
