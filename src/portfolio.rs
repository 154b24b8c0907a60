//! Roll-ups across many loans for dashboards and reports.

use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::accounting::{AccountingEngine, LoanTotals};
use crate::config::LedgerConfig;
use crate::decimal::Money;
use crate::records::{Borrower, Loan, Payment};
use crate::types::{BorrowerId, LoanId, LoanStatus};

/// portfolio-wide totals as of a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PortfolioSummary {
    /// principal of active-flagged loans
    pub total_principal: Money,
    /// flat interest of active-flagged loans
    pub total_interest: Money,
    /// positive balances of overdue loans
    pub total_overdue: Money,
    /// principal of every loan ever issued
    pub total_lent: Money,
    /// interest plus penalties over every loan
    pub total_profit: Money,
    /// every payment in the system, orphans included
    pub total_collected: Money,
    /// unclamped balances of active-flagged loans
    pub total_outstanding: Money,
    pub active_loans: usize,
    pub due_soon: Vec<DueLoan>,
}

/// active loan falling due inside the look-ahead window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DueLoan {
    pub loan_id: LoanId,
    pub borrower_id: BorrowerId,
    pub due_date: DateTime<Utc>,
    pub balance: Money,
    pub status: LoanStatus,
}

/// what a borrower still owes across their active loans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerDebt {
    pub borrower_id: BorrowerId,
    pub name: String,
    pub active_loans: usize,
    /// sum of unclamped balances
    pub total_debt: Money,
}

/// per-loan totals and status
#[derive(Debug, Clone, PartialEq)]
pub struct LoanDetail<'a> {
    pub loan: &'a Loan,
    pub totals: LoanTotals,
    pub status: LoanStatus,
}

/// aggregator over in-memory loans and payments
///
/// Never fails: payments whose loan is missing are left out of per-loan
/// totals, and nothing is validated.
#[derive(Debug, Clone)]
pub struct Portfolio {
    engine: AccountingEngine,
    due_soon_window_days: u32,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self::new(&LedgerConfig::default())
    }
}

impl Portfolio {
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            engine: AccountingEngine::new(config.penalty.clone()),
            due_soon_window_days: config.due_soon_window_days,
        }
    }

    /// totals and derived status for every loan, in input order
    pub fn loan_details<'a>(
        &self,
        loans: &'a [Loan],
        payments: &[Payment],
        now: DateTime<Utc>,
    ) -> Vec<LoanDetail<'a>> {
        let by_loan = group_payments(loans, payments);

        loans
            .iter()
            .map(|loan| {
                let own = by_loan.get(&loan.id).map(Vec::as_slice).unwrap_or(&[]);
                let totals = self.engine.compute_totals(loan, own.iter().copied(), now);
                let status = self.engine.derive_status(loan, totals.total_paid, now);
                LoanDetail { loan, totals, status }
            })
            .collect()
    }

    pub fn summarize(&self, loans: &[Loan], payments: &[Payment], now: DateTime<Utc>) -> PortfolioSummary {
        let details = self.loan_details(loans, payments, now);
        let mut summary = PortfolioSummary::default();

        for detail in &details {
            let totals = &detail.totals;

            summary.total_lent += detail.loan.principal;
            summary.total_profit += totals.simple_interest + totals.overdue_penalty;

            if detail.loan.is_active() {
                summary.active_loans += 1;
                summary.total_principal += totals.principal;
                summary.total_interest += totals.simple_interest;
                summary.total_outstanding += totals.balance;
            }

            if detail.status == LoanStatus::Overdue {
                summary.total_overdue += totals.balance.max(Money::ZERO);
            }
        }

        summary.total_collected = payments.iter().map(|p| p.amount).sum();
        summary.due_soon = due_within(&details, now, self.due_soon_window_days);

        summary
    }

    /// active loans due between today and `window_days` from today, soonest first
    pub fn due_soon(
        &self,
        loans: &[Loan],
        payments: &[Payment],
        now: DateTime<Utc>,
        window_days: u32,
    ) -> Vec<DueLoan> {
        let details = self.loan_details(loans, payments, now);
        due_within(&details, now, window_days)
    }

    /// outstanding debt per borrower, sorted by name
    pub fn borrower_debts(
        &self,
        borrowers: &[Borrower],
        loans: &[Loan],
        payments: &[Payment],
        now: DateTime<Utc>,
    ) -> Vec<BorrowerDebt> {
        let details = self.loan_details(loans, payments, now);

        let mut debts: Vec<BorrowerDebt> = borrowers
            .iter()
            .map(|borrower| {
                let active = details
                    .iter()
                    .filter(|d| d.loan.borrower_id == borrower.id && d.loan.is_active());

                let (active_loans, total_debt) = active.fold((0, Money::ZERO), |(count, debt), d| {
                    (count + 1, debt + d.totals.balance)
                });

                BorrowerDebt {
                    borrower_id: borrower.id,
                    name: borrower.name.clone(),
                    active_loans,
                    total_debt,
                }
            })
            .collect();

        debts.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        debts
    }
}

/// summary using the default configuration
pub fn summarize(loans: &[Loan], payments: &[Payment], now: DateTime<Utc>) -> PortfolioSummary {
    Portfolio::default().summarize(loans, payments, now)
}

fn group_payments<'p>(loans: &[Loan], payments: &'p [Payment]) -> HashMap<LoanId, Vec<&'p Payment>> {
    let mut by_loan: HashMap<LoanId, Vec<&Payment>> =
        loans.iter().map(|loan| (loan.id, Vec::new())).collect();

    let mut orphans = 0usize;
    for payment in payments {
        match by_loan.get_mut(&payment.loan_id) {
            Some(group) => group.push(payment),
            None => orphans += 1,
        }
    }

    if orphans > 0 {
        log::debug!("skipped {} payment(s) with no matching loan", orphans);
    }

    by_loan
}

fn due_within(details: &[LoanDetail<'_>], now: DateTime<Utc>, window_days: u32) -> Vec<DueLoan> {
    let today = now.date_naive();
    let horizon = today
        .checked_add_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MAX);

    let mut due: Vec<DueLoan> = details
        .iter()
        .filter(|d| d.loan.is_active())
        .filter(|d| {
            let due_day = d.loan.due_date.date_naive();
            due_day >= today && due_day <= horizon
        })
        .map(|d| DueLoan {
            loan_id: d.loan.id,
            borrower_id: d.loan.borrower_id,
            due_date: d.loan.due_date,
            balance: d.totals.balance,
            status: d.status,
        })
        .collect();

    due.sort_by_key(|d| d.due_date);
    due
}
