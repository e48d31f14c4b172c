//! Balance types
//!
//! Per-user (balance, reserve) state and the signed deltas applied to it.
//! All values are integers in minor currency units.

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Current funds of one user.
///
/// A user with no recorded activity is `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBalance {
    pub user_id: i64,
    pub balance: i64,
    pub reserve: i64,
}

impl UserBalance {
    /// Balance of a user that has never been touched
    pub fn empty(user_id: i64) -> Self {
        Self {
            user_id,
            balance: 0,
            reserve: 0,
        }
    }

    /// Apply a delta with checked arithmetic.
    ///
    /// Does not enforce non-negativity; see [`BalanceDelta::check_against`].
    pub fn apply(&self, delta: BalanceDelta) -> Result<Self, DomainError> {
        let balance = self
            .balance
            .checked_add(delta.balance)
            .ok_or(DomainError::Overflow(self.user_id))?;
        let reserve = self
            .reserve
            .checked_add(delta.reserve)
            .ok_or(DomainError::Overflow(self.user_id))?;

        Ok(Self {
            user_id: self.user_id,
            balance,
            reserve,
        })
    }
}

/// Signed change to a user's balance and reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BalanceDelta {
    pub balance: i64,
    pub reserve: i64,
}

impl BalanceDelta {
    pub fn new(balance: i64, reserve: i64) -> Self {
        Self { balance, reserve }
    }

    /// Delta that only moves the balance
    pub fn balance_only(balance: i64) -> Self {
        Self { balance, reserve: 0 }
    }

    /// True when this delta takes money out of the balance
    pub fn is_debit(&self) -> bool {
        self.balance < 0
    }

    /// True when this delta takes money out of the reserve
    pub fn is_release(&self) -> bool {
        self.reserve < 0
    }

    /// Check that applying this delta to `current` keeps both fields
    /// non-negative, returning the resulting state.
    pub fn check_against(&self, current: &UserBalance) -> Result<UserBalance, DomainError> {
        let next = current.apply(*self)?;

        if self.is_debit() && next.balance < 0 {
            return Err(DomainError::insufficient_balance(
                -self.balance,
                current.balance,
            ));
        }
        if self.is_release() && next.reserve < 0 {
            return Err(DomainError::insufficient_reserve(
                -self.reserve,
                current.reserve,
            ));
        }

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_delta() {
        let start = UserBalance {
            user_id: 7,
            balance: 100,
            reserve: 0,
        };

        let next = start.apply(BalanceDelta::new(-30, 30)).unwrap();
        assert_eq!(next.balance, 70);
        assert_eq!(next.reserve, 30);
        assert_eq!(next.user_id, 7);
    }

    #[test]
    fn test_overflow_is_rejected() {
        let start = UserBalance {
            user_id: 1,
            balance: i64::MAX,
            reserve: 0,
        };

        let result = start.apply(BalanceDelta::balance_only(1));
        assert_eq!(result, Err(DomainError::Overflow(1)));
    }

    #[test]
    fn test_debit_beyond_balance_rejected() {
        let current = UserBalance {
            user_id: 1,
            balance: 20,
            reserve: 0,
        };

        let result = BalanceDelta::balance_only(-50).check_against(&current);
        assert_eq!(result, Err(DomainError::insufficient_balance(50, 20)));
    }

    #[test]
    fn test_release_beyond_reserve_rejected() {
        let current = UserBalance {
            user_id: 1,
            balance: 70,
            reserve: 10,
        };

        let result = BalanceDelta::new(0, -30).check_against(&current);
        assert_eq!(result, Err(DomainError::insufficient_reserve(30, 10)));
        assert!(BalanceDelta::new(0, -30).is_release());
        assert!(!BalanceDelta::new(-30, 30).is_release());
    }

    #[test]
    fn test_credit_to_empty_user_allowed() {
        let current = UserBalance::empty(9);
        let next = BalanceDelta::balance_only(50).check_against(&current).unwrap();
        assert_eq!(next.balance, 50);
        assert!(!BalanceDelta::balance_only(50).is_debit());
    }
}
