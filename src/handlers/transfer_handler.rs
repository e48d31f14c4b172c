//! Transfer Handler
//!
//! Moves funds between two users as two single-user balance updates.
//! There is no shared transaction across the legs: if the recipient credit
//! fails, the sender debit is undone by a second, compensating update.
//! If that one fails too, the sender stays debited and the error says so.

use std::sync::Arc;

use crate::domain::{OperationContext, TransferLegs};
use crate::error::AppError;
use crate::store::{BalanceStore, Ledger, StoreError};

use super::validation;
use super::{TransferCommand, TransferResult};

/// Handler for peer-to-peer transfers
pub struct TransferHandler {
    balances: Arc<dyn BalanceStore>,
    ledger: Arc<dyn Ledger>,
}

impl TransferHandler {
    pub fn new(balances: Arc<dyn BalanceStore>, ledger: Arc<dyn Ledger>) -> Self {
        Self { balances, ledger }
    }

    /// Execute the transfer command
    pub async fn execute(
        &self,
        command: TransferCommand,
        context: &OperationContext,
    ) -> Result<TransferResult, AppError> {
        validation::validate_transfer_request(&command)?;

        let sender_balance = self.balances.get(command.sender).await?;
        validation::validate_transfer_funds(&command, &sender_balance)?;

        let legs = TransferLegs::new(command.sender, command.recipient, command.value);

        // Leg 1: debit sender. Nothing to undo if this fails.
        let sender_balance = self.balances.apply(legs.sender, legs.sender_delta()).await?;

        // Leg 2: credit recipient, compensating the sender on failure
        let recipient_balance = match self
            .balances
            .apply(legs.recipient, legs.recipient_delta())
            .await
        {
            Ok(balance) => balance,
            Err(transfer_error) => {
                return Err(self.compensate(&legs, transfer_error, context).await);
            }
        };

        // Each leg is stamped when its record is built
        let sender_record = legs.sender_record();
        let sender = self.ledger.append(sender_record).await.map_err(|e| {
            Self::ledger_gap(&legs, 2, e, context)
        })?;

        let recipient_record = legs.recipient_record();
        let recipient = self.ledger.append(recipient_record).await.map_err(|e| {
            Self::ledger_gap(&legs, 1, e, context)
        })?;

        tracing::info!(
            correlation_id = ?context.correlation_id,
            client_ip = ?context.client_ip,
            sender = legs.sender,
            recipient = legs.recipient,
            amount = legs.value,
            sender_transaction_id = sender.id,
            recipient_transaction_id = recipient.id,
            "Transfer completed"
        );

        Ok(TransferResult {
            sender,
            recipient,
            sender_balance,
            recipient_balance,
        })
    }

    /// Refund the sender after a failed recipient credit.
    ///
    /// Always returns the error to report: the transfer failure when the
    /// refund lands, `CompensationFailed` when it does not.
    async fn compensate(
        &self,
        legs: &TransferLegs,
        transfer_error: StoreError,
        context: &OperationContext,
    ) -> AppError {
        tracing::warn!(
            correlation_id = ?context.correlation_id,
            sender = legs.sender,
            recipient = legs.recipient,
            amount = legs.value,
            error = %transfer_error,
            "Recipient credit failed, refunding sender"
        );

        match self
            .balances
            .apply(legs.sender, legs.compensation_delta())
            .await
        {
            Ok(_) => AppError::Store(transfer_error),
            Err(compensation_error) => {
                tracing::error!(
                    correlation_id = ?context.correlation_id,
                    sender = legs.sender,
                    recipient = legs.recipient,
                    amount = legs.value,
                    transfer_error = %transfer_error,
                    compensation_error = %compensation_error,
                    "Sender refund failed; sender left debited, manual reconciliation required"
                );
                AppError::CompensationFailed {
                    sender: legs.sender,
                    recipient: legs.recipient,
                    amount: legs.value,
                    transfer_error,
                    compensation_error,
                }
            }
        }
    }

    fn ledger_gap(
        legs: &TransferLegs,
        missing: usize,
        source: StoreError,
        context: &OperationContext,
    ) -> AppError {
        tracing::error!(
            correlation_id = ?context.correlation_id,
            sender = legs.sender,
            recipient = legs.recipient,
            amount = legs.value,
            missing,
            error = %source,
            "Transfer committed but ledger records are missing"
        );
        AppError::LedgerGap { missing, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TransactionStatus, UserBalance};
    use crate::store::{MemoryBalanceStore, MemoryLedger};

    async fn setup(sender_balance: i64) -> (Arc<MemoryBalanceStore>, Arc<MemoryLedger>, TransferHandler) {
        let balances = Arc::new(
            MemoryBalanceStore::with_balances([UserBalance {
                user_id: 1,
                balance: sender_balance,
                reserve: 0,
            }])
            .await,
        );
        let ledger = Arc::new(MemoryLedger::new());
        let handler = TransferHandler::new(balances.clone(), ledger.clone());
        (balances, ledger, handler)
    }

    #[tokio::test]
    async fn test_transfer_moves_funds_and_records_both_legs() {
        let (balances, ledger, handler) = setup(100).await;

        let result = handler
            .execute(TransferCommand::new(1, 2, 50), &OperationContext::new())
            .await
            .unwrap();

        assert_eq!(balances.get(1).await.unwrap().balance, 50);
        assert_eq!(balances.get(2).await.unwrap().balance, 50);
        assert_eq!(result.sender.value, -50);
        assert_eq!(result.recipient.value, 50);
        assert_eq!(result.sender.value + result.recipient.value, 0);
        assert_eq!(result.sender.status, TransactionStatus::Approved);
        assert_eq!(ledger.len().await, 2);
    }

    #[tokio::test]
    async fn test_insufficient_funds_touches_nothing() {
        let (balances, ledger, handler) = setup(10).await;

        let err = handler
            .execute(TransferCommand::new(1, 2, 50), &OperationContext::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Domain(_)));
        assert_eq!(balances.get(1).await.unwrap().balance, 10);
        assert_eq!(balances.get(2).await.unwrap().balance, 0);
        assert!(ledger.is_empty().await);
    }

    #[tokio::test]
    async fn test_recipient_failure_refunds_sender() {
        let (balances, ledger, handler) = setup(100).await;
        balances.fail_user(2).await;

        let err = handler
            .execute(TransferCommand::new(1, 2, 40), &OperationContext::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Store(StoreError::Unavailable(_))));
        assert_eq!(balances.get(1).await.unwrap().balance, 100);
        assert!(ledger.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_refund_is_reported() {
        let (balances, ledger, handler) = setup(100).await;
        balances.fail_user(2).await;
        // Sender debit goes through, the refund does not
        balances.fail_user_after(1, 1).await;

        let err = handler
            .execute(TransferCommand::new(1, 2, 40), &OperationContext::new())
            .await
            .unwrap_err();

        match err {
            AppError::CompensationFailed {
                sender,
                recipient,
                amount,
                ..
            } => {
                assert_eq!((sender, recipient, amount), (1, 2, 40));
            }
            other => panic!("Expected CompensationFailed, got: {:?}", other),
        }
        assert_eq!(balances.get(1).await.unwrap().balance, 60);
        assert!(ledger.is_empty().await);
    }

    #[tokio::test]
    async fn test_ledger_failure_keeps_balances() {
        let (balances, ledger, handler) = setup(100).await;
        ledger.fail_appends_after(1).await;

        let err = handler
            .execute(TransferCommand::new(1, 2, 30), &OperationContext::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::LedgerGap { missing: 1, .. }));
        assert_eq!(balances.get(1).await.unwrap().balance, 70);
        assert_eq!(balances.get(2).await.unwrap().balance, 30);
        assert_eq!(ledger.len().await, 1);
    }
}
