use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;

    /// Request body for POST /signup.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Signup {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserCreated {
        pub id: Uuid,
    }

    /// Profile of the authenticated user; never includes the password.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub name: String,
        pub email: String,
        pub created_at: DateTime<Utc>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub kind: TransactionKind,
        /// Positive amount in paise; the kind defines the sign.
        pub amount_minor: i64,
        pub category: String,
        pub note: Option<String>,
        /// Optional; the server uses now() when absent.
        pub occurred_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub category: String,
        pub note: Option<String>,
        pub occurred_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }
}

pub mod budget {
    use super::*;

    /// Request body for POST /budgets; replaces any existing budget for the
    /// same `(category, month)`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetUpsert {
        pub category: String,
        /// `"YYYY-MM"`; the server uses the current month when absent.
        pub month: Option<String>,
        pub limit_minor: i64,
    }

    /// Query string for GET /budgets.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetListQuery {
        /// `"YYYY-MM"`; defaults to the current month.
        pub month: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub category: String,
        /// `"YYYY-MM"`.
        pub month: String,
        pub limit_minor: i64,
        /// Expense total for the matching category and month.
        pub spent_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetListResponse {
        pub budgets: Vec<BudgetView>,
    }
}

pub mod trip {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripNew {
        pub name: String,
        /// Display names taking part in the split; order is preserved.
        pub participants: Vec<String>,
        /// Account emails the trip is shared with.
        #[serde(default)]
        pub emails: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripView {
        pub id: Uuid,
        pub name: String,
        pub participants: Vec<String>,
        pub emails: Vec<String>,
        pub expenses: Vec<ExpenseView>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripListResponse {
        pub trips: Vec<TripView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub description: String,
        pub amount_minor: i64,
        pub paid_by: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub description: String,
        pub amount_minor: i64,
        pub paid_by: String,
        pub created_at: DateTime<Utc>,
    }
}

pub mod split {
    use super::*;

    /// Response body for GET /trips/{id}/split.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitResponse {
        pub total_minor: i64,
        pub per_head_minor: i64,
        pub balances: Vec<BalanceView>,
        pub settlements: Vec<SettlementView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub participant: String,
        /// Positive is owed money, negative owes.
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementView {
        pub from: String,
        pub to: String,
        pub amount_minor: i64,
    }
}

pub mod statement {
    use super::*;

    /// Request body for POST /statement: raw text already extracted from a
    /// statement PDF plus the date window to keep.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatementExtract {
        pub text: String,
        pub from_date: NaiveDate,
        pub to_date: NaiveDate,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum EntryKind {
        Debit,
        Credit,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryView {
        /// Statement-local timestamp; PhonePe prints no timezone.
        pub occurred_at: chrono::NaiveDateTime,
        pub description: String,
        pub kind: EntryKind,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatementResponse {
        pub entries: Vec<EntryView>,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Statistic {
        pub total_income_minor: i64,
        pub total_expenses_minor: i64,
        pub net_balance_minor: i64,
    }
}
