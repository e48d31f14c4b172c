//! Transaction Lifecycle
//!
//! Translates a caller-declared status and nominal amount into the deltas
//! applied to balance and reserve:
//!
//! | status       | balance | reserve |
//! |--------------|---------|---------|
//! | `in process` | `-v`    | `+v`    |
//! | `approved`   | `0`     | `-v`    |
//! | `canceled`   | `+v`    | `-v`    |
//!
//! A hold followed by a cancel of the same amount leaves the user where
//! they started.

use super::{BalanceDelta, NewTransaction, TransactionStatus};

/// Output of the lifecycle: what to apply and what to record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTransaction {
    pub delta: BalanceDelta,
    /// Record with `value` rewritten to the applied balance delta
    pub record: NewTransaction,
}

/// Stateless lifecycle engine
pub struct TransactionLifecycle;

impl TransactionLifecycle {
    /// Compute deltas for a request whose `value` holds the nominal amount.
    ///
    /// The nominal amount must already be validated as positive.
    pub fn prepare(request: NewTransaction) -> PreparedTransaction {
        let delta = Self::delta_for(request.status, request.value);
        let record = NewTransaction {
            value: delta.balance,
            ..request
        };

        PreparedTransaction { delta, record }
    }

    /// Deltas for a nominal amount in the given state
    pub fn delta_for(status: TransactionStatus, nominal: i64) -> BalanceDelta {
        match status {
            TransactionStatus::Holding => BalanceDelta::new(-nominal, nominal),
            TransactionStatus::Approved => BalanceDelta::new(0, -nominal),
            TransactionStatus::Canceled => BalanceDelta::new(nominal, -nominal),
        }
    }
}
