//! Trip settlement engine.
//!
//! Pure functions that turn a trip's participant list and expense history
//! into per-person balances and a short list of pairwise transfers that
//! settles them. No I/O, no shared state: identical inputs always produce
//! identical outputs, so the server recomputes on demand instead of caching.

use serde::{Deserialize, Serialize};

use crate::{Money, trips::Expense};

/// A balance below this is considered settled during matching.
///
/// With integer-paise arithmetic the only drift left is the uneven-division
/// remainder, so one paisa is enough.
pub const SETTLE_EPSILON: Money = Money::new(1);

/// A single pairwise payment: `from` pays `to`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub amount: Money,
}

/// A participant's net position. Positive = is owed money, negative = owes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub participant: String,
    pub amount: Money,
}

/// Net positions for a trip, in participant-list order.
///
/// Payers that are no longer (or never were) listed participants are
/// appended after the listed ones.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet(pub Vec<Balance>);

impl BalanceSheet {
    /// Balance for `participant`; unknown names read as zero.
    #[must_use]
    pub fn get(&self, participant: &str) -> Money {
        self.0
            .iter()
            .find(|b| b.participant == participant)
            .map(|b| b.amount)
            .unwrap_or(Money::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Balance> {
        self.0.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything the "Calculate Split" view needs for one trip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSummary {
    pub total: Money,
    pub per_head: Money,
    pub balances: BalanceSheet,
    pub transfers: Vec<Transfer>,
}

/// Computes each participant's net balance from the trip's expense history.
///
/// Every expense is credited in full to its payer and debited as an even
/// share against every listed participant (the payer included, so the payer
/// nets `amount - share`). The share is taken from the summed total, so the
/// uneven-division remainder is spread across the final balances rather than
/// corrected per expense.
///
/// Degenerate inputs never fail: an empty participant list yields an empty
/// sheet regardless of expenses, no expenses yields all-zero balances, and
/// sums that would exceed the `Money` range saturate instead of wrapping.
///
/// A `paid_by` that is not a listed participant is a data-integrity warning,
/// not an error: the payer is still credited (appended after the listed
/// participants) but takes no share of the debit. Trip history must stay
/// computable even if a participant was renamed or removed after the fact.
#[must_use]
pub fn compute_balances(participants: &[String], expenses: &[Expense]) -> BalanceSheet {
    if participants.is_empty() {
        return BalanceSheet::default();
    }

    let mut listed: Vec<Balance> = participants
        .iter()
        .map(|p| Balance {
            participant: p.clone(),
            amount: Money::ZERO,
        })
        .collect();
    let mut unlisted: Vec<Balance> = Vec::new();
    let mut total = Money::ZERO;

    for expense in expenses {
        total = total.checked_add(expense.amount).unwrap_or(Money::MAX);
        if let Some(balance) = listed
            .iter_mut()
            .find(|b| b.participant == expense.paid_by)
        {
            balance.amount = balance.amount.checked_add(expense.amount).unwrap_or(Money::MAX);
        } else if let Some(balance) = unlisted
            .iter_mut()
            .find(|b| b.participant == expense.paid_by)
        {
            balance.amount = balance.amount.checked_add(expense.amount).unwrap_or(Money::MAX);
        } else {
            tracing::warn!(
                payer = %expense.paid_by,
                "expense payer is not a trip participant"
            );
            unlisted.push(Balance {
                participant: expense.paid_by.clone(),
                amount: expense.amount,
            });
        }
    }

    let share = total.split_even(participants.len());
    for balance in &mut listed {
        balance.amount = balance.amount.checked_sub(share).unwrap_or(Money::MIN);
    }

    listed.extend(unlisted);
    BalanceSheet(listed)
}

/// Computes a minimal transfer list that settles a balance sheet.
///
/// Greedy largest-to-largest matching: creditors and debtors are each
/// sorted descending by amount (stable, so ties keep balance-sheet order)
/// and matched front-to-front, transferring the smaller of the two
/// remainders each step. A side advances once its remainder drops to
/// [`SETTLE_EPSILON`] or below; residual drift from uneven division is left
/// unsettled and is bounded by the participant count times one paisa.
///
/// An already-settled sheet (or an empty one) yields no transfers. Never
/// fails.
#[must_use]
pub fn settle(balances: &BalanceSheet) -> Vec<Transfer> {
    struct Side {
        participant: String,
        remaining: Money,
    }

    let mut creditors: Vec<Side> = balances
        .iter()
        .filter(|b| b.amount.is_positive())
        .map(|b| Side {
            participant: b.participant.clone(),
            remaining: b.amount,
        })
        .collect();
    let mut debtors: Vec<Side> = balances
        .iter()
        .filter(|b| b.amount.is_negative())
        .map(|b| Side {
            participant: b.participant.clone(),
            remaining: -b.amount,
        })
        .collect();

    // Stable descending sort; equal amounts keep participant-list order.
    creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
    debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

    let mut transfers = Vec::new();
    let mut creditor_cursor = 0;
    let mut debtor_cursor = 0;

    while creditor_cursor < creditors.len() && debtor_cursor < debtors.len() {
        let creditor = &creditors[creditor_cursor];
        let debtor = &debtors[debtor_cursor];

        let amount = creditor.remaining.min(debtor.remaining);
        if !amount.is_zero() {
            transfers.push(Transfer {
                from: debtor.participant.clone(),
                to: creditor.participant.clone(),
                amount,
            });
        }

        creditors[creditor_cursor].remaining -= amount;
        debtors[debtor_cursor].remaining -= amount;

        if creditors[creditor_cursor].remaining <= SETTLE_EPSILON {
            creditor_cursor += 1;
        }
        if debtors[debtor_cursor].remaining <= SETTLE_EPSILON {
            debtor_cursor += 1;
        }
    }

    transfers
}

/// Computes the full split view for a trip: totals, balances and transfers.
#[must_use]
pub fn split_summary(participants: &[String], expenses: &[Expense]) -> SplitSummary {
    let total = expenses.iter().fold(Money::ZERO, |acc, e| {
        acc.checked_add(e.amount).unwrap_or(Money::MAX)
    });
    let per_head = total.split_even(participants.len());
    let balances = compute_balances(participants, expenses);
    let transfers = settle(&balances);

    SplitSummary {
        total,
        per_head,
        balances,
        transfers,
    }
}
