//! Command Handlers module
//!
//! Handlers that orchestrate business operations.
//! Each handler coordinates validation, the balance store and the ledger.

mod commands;
mod query_handler;
mod transaction_handler;
mod transfer_handler;
pub mod validation;


pub use commands::*;
pub use query_handler::QueryHandler;
pub use transaction_handler::TransactionHandler;
pub use transfer_handler::TransferHandler;
