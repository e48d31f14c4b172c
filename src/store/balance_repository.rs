//! PostgreSQL Balance Store
//!
//! Per-user balances in the `users` table. Every mutation runs in its own
//! transaction holding the user's row lock.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{BalanceDelta, UserBalance};

use super::{BalanceStore, StoreError};

/// Balance store backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgBalanceStore {
    pool: PgPool,
}

impl PgBalanceStore {
    /// Create a new PgBalanceStore with a database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BalanceStore for PgBalanceStore {
    async fn get(&self, user_id: i64) -> Result<UserBalance, StoreError> {
        let row: Option<(i64, i64)> =
            sqlx::query_as("SELECT balance, reserve FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(match row {
            Some((balance, reserve)) => UserBalance {
                user_id,
                balance,
                reserve,
            },
            None => UserBalance::empty(user_id),
        })
    }

    async fn apply(&self, user_id: i64, delta: BalanceDelta) -> Result<UserBalance, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Seed the row so there is always something to lock
        sqlx::query(
            r#"
            INSERT INTO users (id, balance, reserve)
            VALUES ($1, 0, 0)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let (balance, reserve): (i64, i64) =
            sqlx::query_as("SELECT balance, reserve FROM users WHERE id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;

        let current = UserBalance {
            user_id,
            balance,
            reserve,
        };
        let next = current
            .apply(delta)
            .map_err(|_| StoreError::Overflow(user_id))?;

        if delta.is_debit() && next.balance < 0 {
            // Dropping the transaction rolls back and releases the lock
            return Err(StoreError::InsufficientFunds {
                user_id,
                required: -delta.balance,
                available: current.balance,
            });
        }
        if delta.is_release() && next.reserve < 0 {
            return Err(StoreError::InsufficientReserve {
                user_id,
                required: -delta.reserve,
                available: current.reserve,
            });
        }

        sqlx::query("UPDATE users SET balance = $2, reserve = $3 WHERE id = $1")
            .bind(user_id)
            .bind(next.balance)
            .bind(next.reserve)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            user_id,
            balance_delta = delta.balance,
            reserve_delta = delta.reserve,
            balance = next.balance,
            reserve = next.reserve,
            "Balance updated"
        );

        Ok(next)
    }
}
