//! Trip primitives.
//!
//! A `Trip` is a group expense-sharing session: a fixed, ordered participant
//! list plus the expenses paid against it. Expenses are owned by their trip;
//! they are appended and removed through the trip, never on their own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, settlement, settlement::SplitSummary};

/// A single payment made by one participant, shared equally among all.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub description: String,
    pub amount: Money,
    pub paid_by: String,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        description: String,
        amount: Money,
        paid_by: String,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "expense amount must be > 0".to_string(),
            ));
        }
        if amount > Money::MAX_AMOUNT {
            return Err(EngineError::InvalidAmount(
                "expense amount too large".to_string(),
            ));
        }
        if description.trim().is_empty() {
            return Err(EngineError::InvalidAmount(
                "expense description must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            description,
            amount,
            paid_by,
            created_at,
        })
    }
}

/// Holds the participant list and expense history of one shared trip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub participants: Vec<String>,
    /// Emails the trip is shared with; members see it in their trip list.
    pub emails: Vec<String>,
    pub expenses: Vec<Expense>,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    pub fn new(
        name: String,
        owner_id: Uuid,
        participants: Vec<String>,
        emails: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if name.trim().is_empty() {
            return Err(EngineError::InvalidAmount(
                "trip name must not be empty".to_string(),
            ));
        }
        if participants.is_empty() {
            return Err(EngineError::InvalidParticipant(
                "trip needs at least one participant".to_string(),
            ));
        }
        for (idx, participant) in participants.iter().enumerate() {
            if participant.trim().is_empty() {
                return Err(EngineError::InvalidParticipant(
                    "participant name must not be empty".to_string(),
                ));
            }
            if participants[..idx].contains(participant) {
                return Err(EngineError::ExistingKey(participant.clone()));
            }
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            owner_id,
            participants,
            emails,
            expenses: Vec::new(),
            created_at,
        })
    }

    /// `true` if `email` is on the trip's share list.
    #[must_use]
    pub fn is_shared_with(&self, email: &str) -> bool {
        self.emails.iter().any(|e| e.eq_ignore_ascii_case(email))
    }

    /// Appends an expense. The payer must be a current participant.
    pub fn add_expense(
        &mut self,
        description: String,
        amount: Money,
        paid_by: String,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        if !self.participants.contains(&paid_by) {
            return Err(EngineError::InvalidParticipant(format!(
                "{paid_by} is not a participant of this trip"
            )));
        }
        let expense = Expense::new(description, amount, paid_by, created_at)?;
        let id = expense.id;
        self.expenses.push(expense);
        Ok(id)
    }

    /// Removes an expense from the trip's history.
    pub fn remove_expense(&mut self, expense_id: Uuid) -> ResultEngine<()> {
        let position = self
            .expenses
            .iter()
            .position(|e| e.id == expense_id)
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;
        self.expenses.remove(position);
        Ok(())
    }

    /// Computes balances and settlement transfers for the current history.
    ///
    /// Pure and side-effect-free; nothing is cached.
    #[must_use]
    pub fn split(&self) -> SplitSummary {
        settlement::split_summary(&self.participants, &self.expenses)
    }
}
