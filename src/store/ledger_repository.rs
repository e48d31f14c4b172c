//! PostgreSQL Ledger
//!
//! Append-only `transactions` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{HistoryPage, NewTransaction, Transaction, TransactionStatus};

use super::{Ledger, StoreError};

/// Row as stored in the `transactions` table
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: i64,
    order_id: i64,
    user_id: i64,
    service_id: i64,
    cost: i64,
    time_st: DateTime<Utc>,
    note: String,
    status: String,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = StoreError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let status: TransactionStatus = row.status.parse().map_err(|_| {
            StoreError::CorruptRecord(format!(
                "transaction {} has status {:?}",
                row.id, row.status
            ))
        })?;

        Ok(Transaction {
            id: row.id,
            order_id: row.order_id,
            user_id: row.user_id,
            service_id: row.service_id,
            value: row.cost,
            timestamp: row.time_st,
            status,
            note: row.note,
        })
    }
}

fn into_records(rows: Vec<TransactionRow>) -> Result<Vec<Transaction>, StoreError> {
    rows.into_iter().map(Transaction::try_from).collect()
}

/// Ledger backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgLedger {
    pool: PgPool,
}

impl PgLedger {
    /// Create a new PgLedger with a database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Ledger for PgLedger {
    async fn append(&self, transaction: NewTransaction) -> Result<Transaction, StoreError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO transactions (order_id, user_id, service_id, cost, time_st, note, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(transaction.order_id)
        .bind(transaction.user_id)
        .bind(transaction.service_id)
        .bind(transaction.value)
        .bind(transaction.timestamp)
        .bind(&transaction.note)
        .bind(transaction.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(transaction.into_record(id))
    }

    async fn find_all(&self) -> Result<Vec<Transaction>, StoreError> {
        let rows: Vec<TransactionRow> = sqlx::query_as(
            r#"
            SELECT id, order_id, user_id, service_id, cost, time_st, note, status
            FROM transactions
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        into_records(rows)
    }

    async fn find_last_by_order(&self, order_id: i64) -> Result<Option<Transaction>, StoreError> {
        let row: Option<TransactionRow> = sqlx::query_as(
            r#"
            SELECT id, order_id, user_id, service_id, cost, time_st, note, status
            FROM transactions
            WHERE order_id = $1
            ORDER BY time_st DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Transaction::try_from).transpose()
    }

    async fn find_by_user(
        &self,
        user_id: i64,
        page: HistoryPage,
    ) -> Result<Vec<Transaction>, StoreError> {
        // order_by() is a fixed expression per sort key, never user input
        let query = format!(
            r#"
            SELECT id, order_id, user_id, service_id, cost, time_st, note, status
            FROM transactions
            WHERE user_id = $1
            ORDER BY {}
            LIMIT $2 OFFSET $3
            "#,
            page.sort.order_by()
        );

        let rows: Vec<TransactionRow> = sqlx::query_as(&query)
            .bind(user_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        into_records(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> TransactionRow {
        TransactionRow {
            id: 12,
            order_id: 4,
            user_id: 1,
            service_id: 2,
            cost: -30,
            time_st: Utc::now(),
            note: String::new(),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_row_conversion() {
        let record = Transaction::try_from(row("in process")).unwrap();
        assert_eq!(record.id, 12);
        assert_eq!(record.value, -30);
        assert_eq!(record.status, TransactionStatus::Holding);
    }

    #[test]
    fn test_unknown_status_row_is_corrupt() {
        let err = Transaction::try_from(row("pending")).unwrap_err();
        assert!(matches!(err, StoreError::CorruptRecord(_)));
    }
}
