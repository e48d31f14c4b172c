//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::util::ServiceExt;

use user_balance::api::{self, AppState};
use user_balance::store::{MemoryBalanceStore, MemoryLedger};
use user_balance::UserBalance;

/// App over in-memory stores, with handles to the stores for assertions
pub struct TestApp {
    pub router: Router,
    pub balances: Arc<MemoryBalanceStore>,
    pub ledger: Arc<MemoryLedger>,
}

impl TestApp {
    pub async fn empty() -> Self {
        Self::with_balances(Vec::<(i64, i64)>::new()).await
    }

    pub async fn with_balances(balances: impl IntoIterator<Item = (i64, i64)>) -> Self {
        let balances = Arc::new(
            MemoryBalanceStore::with_balances(balances.into_iter().map(|(user_id, balance)| {
                UserBalance {
                    user_id,
                    balance,
                    reserve: 0,
                }
            }))
            .await,
        );
        let ledger = Arc::new(MemoryLedger::new());
        let state = AppState::new(balances.clone(), ledger.clone());

        Self {
            router: api::build_router(state),
            balances,
            ledger,
        }
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        (status, json)
    }
}

/// Setup test database - create schema and truncate tables
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    sqlx::raw_sql(include_str!("../../migrations/0001_init.sql"))
        .execute(&pool)
        .await
        .expect("Failed to apply schema");

    sqlx::query("TRUNCATE TABLE transactions, users RESTART IDENTITY")
        .execute(&pool)
        .await
        .expect("Failed to clean up DB");

    pool
}
