//! History paging

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::DomainError;

/// Records per history page
pub const HISTORY_PAGE_SIZE: i64 = 10;

/// Ordering of a user's history. Ties are always broken by id descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistorySort {
    /// Newest first
    #[default]
    ByDate,
    /// Largest absolute value first
    ByAmount,
}

impl HistorySort {
    /// SQL ordering expression, including the id tie-break
    pub fn order_by(&self) -> &'static str {
        match self {
            HistorySort::ByDate => "time_st DESC, id DESC",
            HistorySort::ByAmount => "ABS(cost) DESC, id DESC",
        }
    }
}

impl FromStr for HistorySort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "by_date" => Ok(HistorySort::ByDate),
            "by_amount" => Ok(HistorySort::ByAmount),
            other => Err(DomainError::UnknownSort(other.to_string())),
        }
    }
}

/// A validated page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPage {
    pub page: i64,
    pub sort: HistorySort,
}

impl HistoryPage {
    pub fn new(page: i64, sort: HistorySort) -> Result<Self, DomainError> {
        if page < 1 {
            return Err(DomainError::InvalidPage(page));
        }
        Ok(Self { page, sort })
    }

    pub fn limit(&self) -> i64 {
        HISTORY_PAGE_SIZE
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(HISTORY_PAGE_SIZE)
    }
}
