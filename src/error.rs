//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::DomainError;
use crate::store::StoreError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No transaction found for order {0}")]
    TransactionNotFound(i64),

    // Validation errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Store errors (insufficient funds or infrastructure)
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Transfer recipient leg failed and the sender could not be refunded
    #[error(
        "Transfer of {amount} from user {sender} to user {recipient} failed and \
         the sender refund also failed: transfer error: {transfer_error}; \
         refund error: {compensation_error}"
    )]
    CompensationFailed {
        sender: i64,
        recipient: i64,
        amount: i64,
        transfer_error: StoreError,
        compensation_error: StoreError,
    },

    /// Balances were committed but not every record reached the ledger
    #[error("Balance change committed but {missing} ledger record(s) were not written: {source}")]
    LedgerGap {
        missing: usize,
        #[source]
        source: StoreError,
    },
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    /// HTTP status, stable error code and optional details
    fn parts(&self) -> (StatusCode, &'static str, Option<String>) {
        match self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }
            AppError::Domain(domain_err) => (StatusCode::BAD_REQUEST, domain_err.code(), None),

            // 404 Not Found
            AppError::TransactionNotFound(order_id) => (
                StatusCode::NOT_FOUND,
                "transaction_not_found",
                Some(order_id.to_string()),
            ),

            AppError::Store(store_err) => match store_err {
                StoreError::InsufficientFunds { .. } => {
                    (StatusCode::BAD_REQUEST, "insufficient_funds", None)
                }
                StoreError::InsufficientReserve { .. } => {
                    (StatusCode::BAD_REQUEST, "insufficient_reserve", None)
                }
                StoreError::Overflow(_) => (StatusCode::BAD_REQUEST, "balance_overflow", None),
                // 503: reads may be retried by the caller
                StoreError::Database(e) => {
                    tracing::error!("Database error: {:?}", e);
                    (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", None)
                }
                StoreError::Unavailable(msg) => {
                    tracing::error!("Store unavailable: {}", msg);
                    (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", None)
                }
                StoreError::CorruptRecord(msg) => {
                    tracing::error!("Corrupt record: {}", msg);
                    (StatusCode::INTERNAL_SERVER_ERROR, "corrupt_record", None)
                }
            },

            // 500 Internal Server Error
            AppError::CompensationFailed {
                sender,
                recipient,
                amount,
                ..
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "compensation_failed",
                Some(format!(
                    "sender {} debited {} without matching credit to {}",
                    sender, amount, recipient
                )),
            ),
            AppError::LedgerGap { missing, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ledger_incomplete",
                Some(format!("{} record(s) missing", missing)),
            ),
        }
    }

    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        self.parts().0
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = self.parts();

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Domain(DomainError::InvalidAmount(0)).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::TransactionNotFound(3).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Store(StoreError::Unavailable("down".to_string())).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Store(StoreError::InsufficientFunds {
                user_id: 1,
                required: 2,
                available: 1
            })
            .status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_reserve_rejection_is_client_error() {
        let err = AppError::Store(StoreError::InsufficientReserve {
            user_id: 1,
            required: 30,
            available: 0,
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.parts().1, "insufficient_reserve");
    }

    #[test]
    fn test_compensation_failure_message_names_both_causes() {
        let err = AppError::CompensationFailed {
            sender: 1,
            recipient: 2,
            amount: 50,
            transfer_error: StoreError::Unavailable("recipient down".to_string()),
            compensation_error: StoreError::Unavailable("sender down".to_string()),
        };

        let message = err.to_string();
        assert!(message.contains("recipient down"));
        assert!(message.contains("sender down"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
