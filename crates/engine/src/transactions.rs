//! Transaction primitives.
//!
//! A `Transaction` is a single income or expense record belonging to one
//! user. Amounts are always positive; the sign comes from the kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Money,
    pub category: String,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        user_id: Uuid,
        kind: TransactionKind,
        amount: Money,
        category: String,
        note: Option<String>,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }
        if amount > Money::MAX_AMOUNT {
            return Err(EngineError::InvalidAmount(
                "amount too large".to_string(),
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
            kind,
            amount,
            category,
            note,
            occurred_at,
        })
    }

    /// Amount with the kind's sign applied; expenses are negative.
    #[must_use]
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

/// Per-user income/expense totals over the whole history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_income: Money,
    pub total_expenses: Money,
    pub net_balance: Money,
}

impl Statistics {
    /// Totals over a transaction history. Sums saturate at the `Money`
    /// range instead of wrapping.
    #[must_use]
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut stats = Self::default();
        for tx in transactions {
            match tx.kind {
                TransactionKind::Income => {
                    stats.total_income = stats
                        .total_income
                        .checked_add(tx.amount)
                        .unwrap_or(Money::MAX);
                }
                TransactionKind::Expense => {
                    stats.total_expenses = stats
                        .total_expenses
                        .checked_add(tx.amount)
                        .unwrap_or(Money::MAX);
                }
            }
            stats.net_balance = stats
                .net_balance
                .checked_add(tx.signed_amount())
                .unwrap_or(if tx.kind == TransactionKind::Expense {
                    Money::MIN
                } else {
                    Money::MAX
                });
        }
        stats
    }
}
