//! Request validation
//!
//! Checks run before any mutation. A rejection here leaves every store
//! untouched.

use crate::domain::{BalanceDelta, DomainError, UserBalance};

use super::TransferCommand;

pub fn validate_user_id(user_id: i64) -> Result<(), DomainError> {
    if user_id <= 0 {
        return Err(DomainError::InvalidUserId(user_id));
    }
    Ok(())
}

pub fn validate_amount(value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::InvalidAmount(value));
    }
    Ok(())
}

/// Reject a delta that would overdraw the balance or the reserve
pub fn validate_mutation(
    current: &UserBalance,
    delta: BalanceDelta,
) -> Result<UserBalance, DomainError> {
    delta.check_against(current)
}

/// Shape checks that need no store access
pub fn validate_transfer_request(command: &TransferCommand) -> Result<(), DomainError> {
    validate_user_id(command.sender)?;
    validate_user_id(command.recipient)?;
    validate_amount(command.value)?;

    if command.sender == command.recipient {
        return Err(DomainError::SameUserTransfer);
    }
    Ok(())
}

/// Sender must currently hold at least the transferred amount
pub fn validate_transfer_funds(
    command: &TransferCommand,
    sender: &UserBalance,
) -> Result<(), DomainError> {
    if sender.balance < command.value {
        return Err(DomainError::insufficient_balance(
            command.value,
            sender.balance,
        ));
    }
    Ok(())
}
