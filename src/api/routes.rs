//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::domain::{HistorySort, OperationContext, Transaction};
use crate::error::AppError;
use crate::handlers::{HistoryQuery, TransactionCommand, TransferCommand};

use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub order_id: i64,
    pub user_id: i64,
    pub service_id: i64,
    pub value: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub transaction: Transaction,
    pub balance: i64,
    pub reserve: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransferRequest {
    pub sender: i64,
    pub recipient: i64,
    pub value: i64,
}

#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub sender: Transaction,
    pub recipient: Transaction,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default)]
    pub sort: Option<String>,
}

fn default_page() -> i64 {
    1
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub user_id: i64,
    pub page: i64,
    pub sort: HistorySort,
    pub history: Vec<Transaction>,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub user_id: i64,
    pub balance: i64,
    pub reserve: i64,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/transactions", post(post_transaction).get(list_transactions))
        .route("/transactions/:order_id", get(get_transaction))
        .route("/transfers", post(post_transfer))
        .route("/users/:user_id/history", get(get_user_history))
        .route("/users/:user_id/balance", get(get_user_balance))
}

fn parse_id(raw: &str, what: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::InvalidRequest(format!("Invalid {} id: {:?}", what, raw)))
}

fn decode<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))
}

fn decode_query<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))
}

// =========================================================================
// POST /transactions
// =========================================================================

/// Hold, approve or cancel an amount
async fn post_transaction(
    State(state): State<AppState>,
    context: Option<Extension<OperationContext>>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TransactionResponse>), AppError> {
    let request = decode(payload)?;
    let context = context.map(|Extension(c)| c).unwrap_or_default();

    let command = TransactionCommand::new(
        request.order_id,
        request.user_id,
        request.service_id,
        request.value,
    )
    .with_status(request.status);
    let command = match request.note {
        Some(note) => command.with_note(note),
        None => command,
    };

    let result = state.transactions().execute(command, &context).await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse {
            transaction: result.transaction,
            balance: result.balance.balance,
            reserve: result.balance.reserve,
        }),
    ))
}

// =========================================================================
// GET /transactions
// =========================================================================

/// Every transaction in the ledger
async fn list_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = state.queries().list_all().await?;
    Ok(Json(transactions))
}

// =========================================================================
// GET /transactions/:order_id
// =========================================================================

/// Latest transaction for an order
async fn get_transaction(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<Transaction>, AppError> {
    let order_id = parse_id(&order_id, "transaction")?;
    let transaction = state.queries().find_by_order(order_id).await?;
    Ok(Json(transaction))
}

// =========================================================================
// POST /transfers
// =========================================================================

/// Move funds between users
async fn post_transfer(
    State(state): State<AppState>,
    context: Option<Extension<OperationContext>>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<TransferResponse>, AppError> {
    let request = decode(payload)?;
    let context = context.map(|Extension(c)| c).unwrap_or_default();

    let command = TransferCommand::new(request.sender, request.recipient, request.value);
    let result = state.transfers().execute(command, &context).await?;

    Ok(Json(TransferResponse {
        sender: result.sender,
        recipient: result.recipient,
        status: "completed".to_string(),
    }))
}

// =========================================================================
// GET /users/:user_id/history
// =========================================================================

/// One page of a user's transactions
async fn get_user_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<HistoryResponse>, AppError> {
    let user_id = parse_id(&user_id, "user")?;
    let params = decode_query(params)?;
    let sort: HistorySort = match params.sort.as_deref() {
        Some(token) => token.parse()?,
        None => HistorySort::default(),
    };

    let query = HistoryQuery::new(user_id)
        .with_page(params.page)
        .with_sort(sort);
    let result = state.queries().history(query).await?;

    Ok(Json(HistoryResponse {
        user_id: result.user_id,
        page: result.page,
        sort: result.sort,
        history: result.history,
    }))
}

// =========================================================================
// GET /users/:user_id/balance
// =========================================================================

/// Current balance and reserve
async fn get_user_balance(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<BalanceResponse>, AppError> {
    let user_id = parse_id(&user_id, "user")?;
    let balance = state.queries().balance(user_id).await?;

    Ok(Json(BalanceResponse {
        user_id: balance.user_id,
        balance: balance.balance,
        reserve: balance.reserve,
    }))
}
