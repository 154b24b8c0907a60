//! Point-in-time accounting for a single loan.
//!
//! Every function here is pure: the same loan, payments and `now` always
//! give the same result, and no clock is ever read internally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::interest::{simple_interest, PenaltyConfig, PenaltyEngine};
use crate::records::{Loan, Payment};
use crate::types::{LoanStatus, RecordStatus};

/// derived financial state of a loan, never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LoanTotals {
    pub principal: Money,
    pub simple_interest: Money,
    pub overdue_penalty: Money,
    pub total_due: Money,
    pub total_paid: Money,
    /// negative when overpaid
    pub balance: Money,
}

/// accounting engine bound to a penalty configuration
#[derive(Debug, Clone, Default)]
pub struct AccountingEngine {
    penalty: PenaltyEngine,
}

impl AccountingEngine {
    pub fn new(penalty_config: PenaltyConfig) -> Self {
        Self {
            penalty: PenaltyEngine::new(penalty_config),
        }
    }

    /// totals for `loan` as of `now`
    ///
    /// Payments are summed as given; callers pass the loan's own payments.
    /// Penalties accrue only while the stored flag is active.
    pub fn compute_totals<'a, I>(&self, loan: &Loan, payments: I, now: DateTime<Utc>) -> LoanTotals
    where
        I: IntoIterator<Item = &'a Payment>,
    {
        let principal = loan.principal;
        let simple_interest = simple_interest(principal, loan.interest_rate);

        let overdue_penalty = if loan.status == RecordStatus::Active && now > loan.due_date {
            self.penalty
                .calculate_penalty(principal, loan.due_date, now)
                .penalty_amount
        } else {
            Money::ZERO
        };

        let total_due = principal + simple_interest + overdue_penalty;
        let total_paid: Money = payments.into_iter().map(|p| p.amount).sum();

        LoanTotals {
            principal,
            simple_interest,
            overdue_penalty,
            total_due,
            total_paid,
            balance: total_due - total_paid,
        }
    }

    pub fn derive_status(&self, loan: &Loan, total_paid: Money, now: DateTime<Utc>) -> LoanStatus {
        derive_status(loan, total_paid, now)
    }
}

/// totals with the default 5% weekly penalty
pub fn compute_totals<'a, I>(loan: &Loan, payments: I, now: DateTime<Utc>) -> LoanTotals
where
    I: IntoIterator<Item = &'a Payment>,
{
    AccountingEngine::default().compute_totals(loan, payments, now)
}

/// lifecycle status of `loan` on the day of `now`
///
/// `total_paid` is accepted but does not influence the result: a loan
/// becomes `Paid` only through its stored flag, never through payments.
pub fn derive_status(loan: &Loan, _total_paid: Money, now: DateTime<Utc>) -> LoanStatus {
    if loan.status == RecordStatus::Paid {
        return LoanStatus::Paid;
    }

    let today = now.date_naive();
    if today < loan.issue_date.date_naive() {
        return LoanStatus::Upcoming;
    }

    let diff_days = (today - loan.due_date.date_naive()).num_days();
    match diff_days {
        d if d > 0 => LoanStatus::Overdue,
        0 => LoanStatus::DueToday,
        _ => LoanStatus::Active,
    }
}
