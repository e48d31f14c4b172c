//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

/// Validation failures raised before any balance is touched.
///
/// These errors represent malformed requests and business rule violations.
/// They are independent of the web/infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// User id is zero or negative
    #[error("Invalid user id: {0}")]
    InvalidUserId(i64),

    /// Amount is zero or negative
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    /// Status token is not one of the lifecycle states
    #[error("Unknown transaction status: {0:?}")]
    UnknownStatus(String),

    /// Sort key is not one of the history orderings
    #[error("Unknown history sort key: {0:?}")]
    UnknownSort(String),

    /// History pages are 1-based
    #[error("Invalid page number: {0}")]
    InvalidPage(i64),

    /// Transfer to self
    #[error("Cannot transfer to the same user")]
    SameUserTransfer,

    /// Balance would go negative
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: i64, available: i64 },

    /// Reserve would go negative (approve/cancel of more than is held)
    #[error("Insufficient reserve: required {required}, available {available}")]
    InsufficientReserve { required: i64, available: i64 },

    /// Balance or reserve would overflow
    #[error("Balance arithmetic overflow for user {0}")]
    Overflow(i64),
}

impl DomainError {
    /// Create an insufficient balance error
    pub fn insufficient_balance(required: i64, available: i64) -> Self {
        Self::InsufficientBalance {
            required,
            available,
        }
    }

    /// Create an insufficient reserve error
    pub fn insufficient_reserve(required: i64, available: i64) -> Self {
        Self::InsufficientReserve {
            required,
            available,
        }
    }

    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidUserId(_) => "invalid_user_id",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::UnknownStatus(_) => "unknown_status",
            Self::UnknownSort(_) => "unknown_sort",
            Self::InvalidPage(_) => "invalid_page",
            Self::SameUserTransfer => "same_user_transfer",
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::InsufficientReserve { .. } => "insufficient_reserve",
            Self::Overflow(_) => "balance_overflow",
        }
    }
}
