use chrono::NaiveDateTime;
use engine::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

/// Whether the entry moved money out of or into the account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    Debit,
    Credit,
}

/// One normalized row extracted from a statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementEntry {
    pub occurred_at: NaiveDateTime,
    pub description: String,
    pub kind: EntryKind,
    pub amount: Money,
}
