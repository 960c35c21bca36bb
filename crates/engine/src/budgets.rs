//! Budget primitives.
//!
//! Budgets are a monthly cap per spending category. The key is
//! `(category, month)`; setting the same key again replaces the limit
//! instead of stacking a second budget.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// First day of a calendar month, `"YYYY-MM"` on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BudgetMonth {
    pub year: i32,
    pub month: u32,
}

impl BudgetMonth {
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidAmount(format!(
                "invalid month: {month}"
            )));
        }
        Ok(Self { year, month })
    }
}

impl std::fmt::Display for BudgetMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl From<BudgetMonth> for String {
    fn from(month: BudgetMonth) -> Self {
        month.to_string()
    }
}

impl TryFrom<String> for BudgetMonth {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let (year, month) = value
            .split_once('-')
            .ok_or_else(|| EngineError::InvalidAmount(format!("invalid month: {value}")))?;
        let year: i32 = year
            .parse()
            .map_err(|_| EngineError::InvalidAmount(format!("invalid month: {value}")))?;
        let month: u32 = month
            .parse()
            .map_err(|_| EngineError::InvalidAmount(format!("invalid month: {value}")))?;
        Self::new(year, month)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    pub month: BudgetMonth,
    pub limit: Money,
}

impl Budget {
    pub fn new(
        user_id: Uuid,
        category: String,
        month: BudgetMonth,
        limit: Money,
    ) -> ResultEngine<Self> {
        if !limit.is_positive() {
            return Err(EngineError::InvalidAmount(
                "budget limit must be > 0".to_string(),
            ));
        }
        if limit > Money::MAX_AMOUNT {
            return Err(EngineError::InvalidAmount(
                "budget limit too large".to_string(),
            ));
        }
        if category.trim().is_empty() {
            return Err(EngineError::InvalidAmount(
                "category must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            category,
            month,
            limit,
        })
    }
}
