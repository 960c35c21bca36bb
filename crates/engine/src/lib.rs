use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

pub use budgets::{Budget, BudgetMonth};
pub use error::EngineError;
pub use money::Money;
pub use settlement::{
    Balance, BalanceSheet, SETTLE_EPSILON, SplitSummary, Transfer, compute_balances, settle,
    split_summary,
};
pub use transactions::{Statistics, Transaction, TransactionKind};
pub use trips::{Expense, Trip};
pub use users::User;

mod budgets;
mod error;
mod money;
pub mod settlement;
mod transactions;
mod trips;
mod users;

pub type ResultEngine<T> = Result<T, EngineError>;

/// In-memory state for all users. One instance lives behind a lock for the
/// lifetime of the process.
#[derive(Debug, Default)]
pub struct Engine {
    /// Keyed by lowercased email.
    users: HashMap<String, User>,
    /// Per-user transaction history, newest last.
    transactions: HashMap<Uuid, Vec<Transaction>>,
    /// Per-user budgets keyed by `(category, month)`; setting the same key
    /// again replaces the previous limit.
    budgets: HashMap<Uuid, HashMap<(String, BudgetMonth), Budget>>,
    trips: HashMap<Uuid, Trip>,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn user_by_id(&self, user_id: Uuid) -> ResultEngine<&User> {
        self.users
            .values()
            .find(|u| u.id == user_id)
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    fn trip_checked(&self, trip_id: Uuid, user: &User) -> ResultEngine<&Trip> {
        let trip = self
            .trips
            .get(&trip_id)
            .ok_or_else(|| EngineError::KeyNotFound("trip not exists".to_string()))?;
        if trip.owner_id != user.id && !trip.is_shared_with(&user.email) {
            return Err(EngineError::KeyNotFound("trip not exists".to_string()));
        }
        Ok(trip)
    }

    fn trip_checked_mut(&mut self, trip_id: Uuid, user: &User) -> ResultEngine<&mut Trip> {
        let trip = self
            .trips
            .get_mut(&trip_id)
            .ok_or_else(|| EngineError::KeyNotFound("trip not exists".to_string()))?;
        if trip.owner_id != user.id && !trip.is_shared_with(&user.email) {
            return Err(EngineError::KeyNotFound("trip not exists".to_string()));
        }
        Ok(trip)
    }

    // ---- users -----------------------------------------------------------

    /// Registers a new user. Fails if the email is already taken.
    pub fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        let user = User::new(
            name.to_string(),
            email.to_string(),
            password.to_string(),
            created_at,
        )?;
        if self.users.contains_key(&user.email) {
            return Err(EngineError::ExistingKey(user.email));
        }
        let id = user.id;
        self.users.insert(user.email.clone(), user);
        Ok(id)
    }

    /// Resolves credentials to a user.
    ///
    /// Unknown email and wrong password both come back as `Forbidden`, so a
    /// caller cannot probe which emails exist.
    pub fn authenticate(&self, email: &str, password: &str) -> ResultEngine<&User> {
        let email = email.trim().to_ascii_lowercase();
        let user = self
            .users
            .get(&email)
            .ok_or_else(|| EngineError::Forbidden("invalid credentials".to_string()))?;
        if !user.verify_password(password) {
            return Err(EngineError::Forbidden("invalid credentials".to_string()));
        }
        Ok(user)
    }

    /// Returns a user's profile.
    pub fn user(&self, user_id: Uuid) -> ResultEngine<&User> {
        self.user_by_id(user_id)
    }

    // ---- transactions ----------------------------------------------------

    pub fn add_transaction(
        &mut self,
        user_id: Uuid,
        kind: TransactionKind,
        amount: Money,
        category: &str,
        note: Option<&str>,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        self.user_by_id(user_id)?;
        let tx = Transaction::new(
            user_id,
            kind,
            amount,
            category.to_string(),
            note.map(|s| s.to_string()),
            occurred_at,
        )?;
        let id = tx.id;
        self.transactions.entry(user_id).or_default().push(tx);
        Ok(id)
    }

    /// Lists a user's transactions, newest first.
    pub fn list_transactions(&self, user_id: Uuid) -> ResultEngine<Vec<&Transaction>> {
        self.user_by_id(user_id)?;
        let mut out: Vec<&Transaction> = self
            .transactions
            .get(&user_id)
            .map(|txs| txs.iter().collect())
            .unwrap_or_default();
        out.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(out)
    }

    pub fn delete_transaction(&mut self, user_id: Uuid, transaction_id: Uuid) -> ResultEngine<()> {
        let txs = self
            .transactions
            .get_mut(&user_id)
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
        let position = txs
            .iter()
            .position(|tx| tx.id == transaction_id)
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
        txs.remove(position);
        Ok(())
    }

    /// Income/expense totals over the user's whole history.
    pub fn statistics(&self, user_id: Uuid) -> ResultEngine<Statistics> {
        self.user_by_id(user_id)?;
        let stats = self
            .transactions
            .get(&user_id)
            .map(|txs| Statistics::from_transactions(txs.iter()))
            .unwrap_or_default();
        Ok(stats)
    }

    // ---- budgets ---------------------------------------------------------

    /// Creates or replaces the budget for `(category, month)`.
    pub fn set_budget(
        &mut self,
        user_id: Uuid,
        category: &str,
        month: BudgetMonth,
        limit: Money,
    ) -> ResultEngine<Uuid> {
        self.user_by_id(user_id)?;
        let budget = Budget::new(user_id, category.to_string(), month, limit)?;
        let id = budget.id;
        self.budgets
            .entry(user_id)
            .or_default()
            .insert((budget.category.clone(), month), budget);
        Ok(id)
    }

    /// Lists a user's budgets, sorted by month then category.
    pub fn list_budgets(&self, user_id: Uuid) -> ResultEngine<Vec<&Budget>> {
        self.user_by_id(user_id)?;
        let mut out: Vec<&Budget> = self
            .budgets
            .get(&user_id)
            .map(|budgets| budgets.values().collect())
            .unwrap_or_default();
        out.sort_by(|a, b| (a.month, &a.category).cmp(&(b.month, &b.category)));
        Ok(out)
    }

    pub fn delete_budget(&mut self, user_id: Uuid, budget_id: Uuid) -> ResultEngine<()> {
        let budgets = self
            .budgets
            .get_mut(&user_id)
            .ok_or_else(|| EngineError::KeyNotFound("budget not exists".to_string()))?;
        let key = budgets
            .iter()
            .find(|(_, b)| b.id == budget_id)
            .map(|(key, _)| key.clone())
            .ok_or_else(|| EngineError::KeyNotFound("budget not exists".to_string()))?;
        budgets.remove(&key);
        Ok(())
    }

    /// How much of each budget is spent, from the matching month's expense
    /// transactions. Returns `(budget, spent)` pairs in `list_budgets` order,
    /// restricted to `month` when one is given.
    pub fn budget_usage(
        &self,
        user_id: Uuid,
        month: Option<BudgetMonth>,
    ) -> ResultEngine<Vec<(&Budget, Money)>> {
        let budgets = self.list_budgets(user_id)?;
        let transactions = self.transactions.get(&user_id);
        let out = budgets
            .into_iter()
            .filter(|budget| month.is_none_or(|m| budget.month == m))
            .map(|budget| {
                let spent = transactions
                    .map(|txs| {
                        txs.iter()
                            .filter(|tx| {
                                tx.kind == TransactionKind::Expense
                                    && tx.category == budget.category
                                    && month_of(tx.occurred_at) == budget.month
                            })
                            .map(|tx| tx.amount)
                            .sum()
                    })
                    .unwrap_or(Money::ZERO);
                (budget, spent)
            })
            .collect();
        Ok(out)
    }

    // ---- trips -----------------------------------------------------------

    pub fn new_trip(
        &mut self,
        user_id: Uuid,
        name: &str,
        participants: Vec<String>,
        emails: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        self.user_by_id(user_id)?;
        let trip = Trip::new(name.to_string(), user_id, participants, emails, created_at)?;
        let id = trip.id;
        self.trips.insert(id, trip);
        Ok(id)
    }

    /// Lists trips the user owns or is shared on, newest first.
    pub fn list_trips(&self, user_id: Uuid) -> ResultEngine<Vec<&Trip>> {
        let user = self.user_by_id(user_id)?;
        let mut out: Vec<&Trip> = self
            .trips
            .values()
            .filter(|trip| trip.owner_id == user.id || trip.is_shared_with(&user.email))
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    pub fn trip(&self, user_id: Uuid, trip_id: Uuid) -> ResultEngine<&Trip> {
        let user = self.user_by_id(user_id)?.clone();
        self.trip_checked(trip_id, &user)
    }

    /// Deletes a trip. Only the owner may delete; shared members get
    /// `Forbidden`.
    pub fn delete_trip(&mut self, user_id: Uuid, trip_id: Uuid) -> ResultEngine<()> {
        let user = self.user_by_id(user_id)?.clone();
        let trip = self.trip_checked(trip_id, &user)?;
        if trip.owner_id != user.id {
            return Err(EngineError::Forbidden(
                "only the owner can delete a trip".to_string(),
            ));
        }
        self.trips.remove(&trip_id);
        Ok(())
    }

    pub fn add_trip_expense(
        &mut self,
        user_id: Uuid,
        trip_id: Uuid,
        description: &str,
        amount: Money,
        paid_by: &str,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        let user = self.user_by_id(user_id)?.clone();
        let trip = self.trip_checked_mut(trip_id, &user)?;
        trip.add_expense(
            description.to_string(),
            amount,
            paid_by.to_string(),
            created_at,
        )
    }

    pub fn remove_trip_expense(
        &mut self,
        user_id: Uuid,
        trip_id: Uuid,
        expense_id: Uuid,
    ) -> ResultEngine<()> {
        let user = self.user_by_id(user_id)?.clone();
        let trip = self.trip_checked_mut(trip_id, &user)?;
        trip.remove_expense(expense_id)
    }

    /// Recomputes balances and settlement transfers for a trip.
    pub fn split_trip(&self, user_id: Uuid, trip_id: Uuid) -> ResultEngine<SplitSummary> {
        let user = self.user_by_id(user_id)?.clone();
        Ok(self.trip_checked(trip_id, &user)?.split())
    }
}

fn month_of(moment: DateTime<Utc>) -> BudgetMonth {
    use chrono::Datelike;
    BudgetMonth {
        year: moment.year(),
        month: moment.month(),
    }
}
