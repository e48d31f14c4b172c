//! Transaction Handler
//!
//! Runs one hold / approve / cancel through validation, the balance
//! store and the ledger, in that order.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{NewTransaction, OperationContext, TransactionLifecycle, TransactionStatus};
use crate::error::AppError;
use crate::store::{BalanceStore, Ledger};

use super::validation;
use super::{TransactionCommand, TransactionResult};

/// Handler for single-user transactions
pub struct TransactionHandler {
    balances: Arc<dyn BalanceStore>,
    ledger: Arc<dyn Ledger>,
}

impl TransactionHandler {
    pub fn new(balances: Arc<dyn BalanceStore>, ledger: Arc<dyn Ledger>) -> Self {
        Self { balances, ledger }
    }

    /// Execute the transaction command
    pub async fn execute(
        &self,
        command: TransactionCommand,
        context: &OperationContext,
    ) -> Result<TransactionResult, AppError> {
        validation::validate_user_id(command.user_id)?;
        validation::validate_amount(command.value)?;
        let status: TransactionStatus = command.status.parse()?;

        let prepared = TransactionLifecycle::prepare(NewTransaction {
            order_id: command.order_id,
            user_id: command.user_id,
            service_id: command.service_id,
            value: command.value,
            timestamp: Utc::now(),
            status,
            note: command.note.unwrap_or_default(),
        });

        let current = self.balances.get(command.user_id).await?;
        validation::validate_mutation(&current, prepared.delta)?;

        // The store re-checks balance and reserve under its own lock
        let balance = self
            .balances
            .apply(command.user_id, prepared.delta)
            .await
            .map_err(|e| {
                if e.is_rejection() {
                    tracing::warn!(
                        correlation_id = ?context.correlation_id,
                        client_ip = ?context.client_ip,
                        user_id = command.user_id,
                        order_id = command.order_id,
                        error = %e,
                        "Funds changed after validation, update rejected"
                    );
                }
                e
            })?;

        let transaction = self.ledger.append(prepared.record).await.map_err(|e| {
            tracing::error!(
                correlation_id = ?context.correlation_id,
                user_id = command.user_id,
                order_id = command.order_id,
                balance_delta = prepared.delta.balance,
                reserve_delta = prepared.delta.reserve,
                error = %e,
                "Balance updated but transaction was not recorded"
            );
            AppError::LedgerGap {
                missing: 1,
                source: e,
            }
        })?;

        tracing::info!(
            correlation_id = ?context.correlation_id,
            client_ip = ?context.client_ip,
            transaction_id = transaction.id,
            order_id = transaction.order_id,
            user_id = transaction.user_id,
            status = %transaction.status,
            "Transaction applied"
        );

        Ok(TransactionResult {
            transaction,
            balance,
        })
    }
}
