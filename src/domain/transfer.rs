//! Transfer legs
//!
//! A transfer is two single-user mutations. This module only describes
//! them; the handler applies them and handles compensation.

use chrono::Utc;

use super::{BalanceDelta, NewTransaction, TransactionStatus};

pub const TRANSFER_TO_NOTE: &str = "Transfer to another user";
pub const TRANSFER_FROM_NOTE: &str = "Transfer from another user";

/// The two sides of a peer-to-peer transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferLegs {
    pub sender: i64,
    pub recipient: i64,
    pub value: i64,
}

impl TransferLegs {
    pub fn new(sender: i64, recipient: i64, value: i64) -> Self {
        Self {
            sender,
            recipient,
            value,
        }
    }

    pub fn sender_delta(&self) -> BalanceDelta {
        BalanceDelta::balance_only(-self.value)
    }

    pub fn recipient_delta(&self) -> BalanceDelta {
        BalanceDelta::balance_only(self.value)
    }

    /// Delta re-applied to the sender when the recipient leg fails.
    ///
    /// This is the recipient's intended delta, which exactly undoes the
    /// sender debit.
    pub fn compensation_delta(&self) -> BalanceDelta {
        self.recipient_delta()
    }

    /// Ledger record for the sender leg, stamped now
    pub fn sender_record(&self) -> NewTransaction {
        Self::record(self.sender, -self.value, TRANSFER_TO_NOTE)
    }

    /// Ledger record for the recipient leg, stamped now
    pub fn recipient_record(&self) -> NewTransaction {
        Self::record(self.recipient, self.value, TRANSFER_FROM_NOTE)
    }

    fn record(user_id: i64, value: i64, note: &str) -> NewTransaction {
        NewTransaction {
            order_id: 0,
            user_id,
            service_id: 0,
            value,
            timestamp: Utc::now(),
            status: TransactionStatus::Approved,
            note: note.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leg_deltas() {
        let legs = TransferLegs::new(1, 2, 50);

        assert_eq!(legs.sender_delta(), BalanceDelta::new(-50, 0));
        assert_eq!(legs.recipient_delta(), BalanceDelta::new(50, 0));
        assert_eq!(legs.compensation_delta(), BalanceDelta::new(50, 0));
    }

    #[test]
    fn test_records_cancel_out() {
        let legs = TransferLegs::new(1, 2, 50);
        let sender = legs.sender_record();
        let recipient = legs.recipient_record();

        assert_eq!(sender.value + recipient.value, 0);
        assert_eq!(sender.user_id, 1);
        assert_eq!(recipient.user_id, 2);
        assert_eq!(sender.note, TRANSFER_TO_NOTE);
        assert_eq!(recipient.note, TRANSFER_FROM_NOTE);
        assert_eq!(sender.status, TransactionStatus::Approved);
        assert_eq!(recipient.status, TransactionStatus::Approved);
    }
}
