//! user_balance Library
//!
//! Per-user balances with two-phase reservations, peer-to-peer transfers
//! and paginated transaction history.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
mod error;
pub mod handlers;
pub mod store;

pub use config::Config;
pub use domain::{BalanceDelta, DomainError, OperationContext, Transaction, TransactionStatus, UserBalance};
pub use error::{AppError, AppResult};
pub use store::{BalanceStore, Ledger, StoreError};
