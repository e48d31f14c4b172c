//! Transaction status
//!
//! The three-state reservation protocol: hold, then approve or cancel.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DomainError;

/// Lifecycle state of a transaction.
///
/// On the wire the hold state is spelled `"in process"`, and an empty
/// status is read as a hold as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TransactionStatus {
    /// Funds debited from balance and parked in reserve
    Holding,
    /// Reserve released, hold settled
    Approved,
    /// Reserve released, held amount refunded to balance
    Canceled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Holding => "in process",
            TransactionStatus::Approved => "approved",
            TransactionStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "in process" => Ok(TransactionStatus::Holding),
            "approved" => Ok(TransactionStatus::Approved),
            "canceled" => Ok(TransactionStatus::Canceled),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for TransactionStatus {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TransactionStatus> for String {
    fn from(status: TransactionStatus) -> Self {
        status.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tokens() {
        assert_eq!("".parse::<TransactionStatus>(), Ok(TransactionStatus::Holding));
        assert_eq!(
            "in process".parse::<TransactionStatus>(),
            Ok(TransactionStatus::Holding)
        );
        assert_eq!(
            "approved".parse::<TransactionStatus>(),
            Ok(TransactionStatus::Approved)
        );
        assert_eq!(
            "canceled".parse::<TransactionStatus>(),
            Ok(TransactionStatus::Canceled)
        );
    }

    #[test]
    fn test_unknown_token_rejected() {
        let result = "cancelled".parse::<TransactionStatus>();
        assert_eq!(
            result,
            Err(DomainError::UnknownStatus("cancelled".to_string()))
        );
    }

    #[test]
    fn test_hold_persists_as_in_process() {
        assert_eq!(TransactionStatus::Holding.to_string(), "in process");

        let json = serde_json::to_string(&TransactionStatus::Holding).unwrap();
        assert_eq!(json, "\"in process\"");
    }
}
