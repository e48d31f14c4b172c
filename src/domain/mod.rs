//! Domain module
//!
//! Core domain types and business logic.
//! Everything in here is pure: no I/O, no store handles.

pub mod balance;
pub mod context;
pub mod error;
pub mod history;
pub mod lifecycle;
pub mod status;
pub mod transaction;
pub mod transfer;

pub use balance::{BalanceDelta, UserBalance};
pub use context::OperationContext;
pub use error::DomainError;
pub use history::{HistoryPage, HistorySort, HISTORY_PAGE_SIZE};
pub use lifecycle::{PreparedTransaction, TransactionLifecycle};
pub use status::TransactionStatus;
pub use transaction::{NewTransaction, Transaction};
pub use transfer::{TransferLegs, TRANSFER_FROM_NOTE, TRANSFER_TO_NOTE};
