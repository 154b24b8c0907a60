use std::collections::HashMap;

use hourglass_rs::SafeTimeProvider;

use crate::accounting::{AccountingEngine, LoanTotals};
use crate::config::LedgerConfig;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{EventStore, LedgerEvent};
use crate::portfolio::{BorrowerDebt, DueLoan, Portfolio, PortfolioSummary};
use crate::records::{Borrower, Loan, LoanBuilder, Payment};
use crate::repository::Repository;
use crate::serialization::{LoanOverview, LoanView};
use crate::sync::{LedgerSnapshot, SnapshotSink};
use crate::types::{BorrowerId, LoanId, LoanStatus, PaymentId, RecordStatus};

/// the lender's book: records, accounting and events in one place
///
/// Nothing is cached. Every read pulls records from the repository and
/// recomputes totals and status for the time the provider reports.
pub struct LoanBook<R: Repository> {
    repo: R,
    config: LedgerConfig,
    engine: AccountingEngine,
    portfolio: Portfolio,
    pub events: EventStore,
}

impl<R: Repository> LoanBook<R> {
    pub fn new(repo: R, config: LedgerConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            engine: AccountingEngine::new(config.penalty.clone()),
            portfolio: Portfolio::new(&config),
            repo,
            config,
            events: EventStore::new(),
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// format an amount with the configured currency
    pub fn format_amount(&self, amount: Money) -> String {
        self.config.currency.format(amount)
    }

    // borrowers

    pub fn add_borrower(
        &mut self,
        name: impl Into<String>,
        phone: impl Into<String>,
        notes: Option<String>,
        time_provider: &SafeTimeProvider,
    ) -> Result<Borrower> {
        let now = time_provider.now();
        let borrower = Borrower::new(name, phone, notes, now);
        self.repo.create_borrower(borrower.clone())?;

        log::info!("added borrower {} ({})", borrower.name, borrower.id);
        self.events.emit(LedgerEvent::BorrowerAdded {
            borrower_id: borrower.id,
            name: borrower.name.clone(),
            timestamp: now,
        });

        Ok(borrower)
    }

    pub fn update_borrower(&mut self, borrower: Borrower, time_provider: &SafeTimeProvider) -> Result<()> {
        let borrower_id = borrower.id;
        self.repo.update_borrower(borrower)?;

        self.events.emit(LedgerEvent::BorrowerUpdated {
            borrower_id,
            timestamp: time_provider.now(),
        });
        Ok(())
    }

    /// delete a borrower that has no loans on record
    pub fn remove_borrower(&mut self, id: BorrowerId, time_provider: &SafeTimeProvider) -> Result<()> {
        if let Err(e) = self.repo.delete_borrower(id) {
            log::warn!("refused to remove borrower {}: {}", id, e);
            return Err(e);
        }

        log::info!("removed borrower {}", id);
        self.events.emit(LedgerEvent::BorrowerRemoved {
            borrower_id: id,
            timestamp: time_provider.now(),
        });
        Ok(())
    }

    // loans

    pub fn issue_loan(&mut self, builder: LoanBuilder, time_provider: &SafeTimeProvider) -> Result<Loan> {
        let now = time_provider.now();
        let loan = builder.build(&self.config.tenors, now)?;
        self.repo.create_loan(loan.clone())?;

        log::info!(
            "issued loan {} of {} to {} due {}",
            loan.id,
            loan.principal,
            loan.borrower_id,
            loan.due_date.date_naive()
        );
        self.events.emit(LedgerEvent::LoanIssued {
            loan_id: loan.id,
            borrower_id: loan.borrower_id,
            principal: loan.principal,
            due_date: loan.due_date,
            timestamp: now,
        });

        Ok(loan)
    }

    /// save an edited loan, see [`LoanBuilder::from_loan`]
    pub fn update_loan(&mut self, builder: LoanBuilder, time_provider: &SafeTimeProvider) -> Result<Loan> {
        let now = time_provider.now();
        let loan = builder.build(&self.config.tenors, now)?;
        self.repo.update_loan(loan.clone())?;

        log::info!("updated loan {}", loan.id);
        self.events.emit(LedgerEvent::LoanUpdated {
            loan_id: loan.id,
            timestamp: now,
        });

        Ok(loan)
    }

    /// flag a loan as fully paid; this is the only way a loan becomes `Paid`
    pub fn mark_paid(&mut self, id: LoanId, time_provider: &SafeTimeProvider) -> Result<Loan> {
        let now = time_provider.now();
        let mut loan = self.load_loan(id)?;
        if loan.is_paid() {
            return Err(LedgerError::LoanAlreadyPaid { id });
        }

        let totals = self.totals_for(&loan, time_provider)?;
        if totals.balance.is_positive() {
            log::warn!("loan {} marked paid with {} still outstanding", id, totals.balance);
        }

        loan.status = RecordStatus::Paid;
        self.repo.update_loan(loan.clone())?;

        log::info!("loan {} marked paid", id);
        self.events.emit(LedgerEvent::LoanMarkedPaid {
            loan_id: id,
            outstanding_balance: totals.balance,
            timestamp: now,
        });

        Ok(loan)
    }

    /// delete a loan together with its payments
    pub fn delete_loan(&mut self, id: LoanId, time_provider: &SafeTimeProvider) -> Result<usize> {
        let payments_removed = self.repo.delete_loan(id)?;

        log::info!("deleted loan {} and {} payment(s)", id, payments_removed);
        self.events.emit(LedgerEvent::LoanDeleted {
            loan_id: id,
            payments_removed,
            timestamp: time_provider.now(),
        });

        Ok(payments_removed)
    }

    // payments

    pub fn record_payment(
        &mut self,
        loan_id: LoanId,
        amount: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<Payment> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidPaymentAmount { amount });
        }

        let loan = self.load_loan(loan_id)?;
        if loan.is_paid() {
            return Err(LedgerError::LoanAlreadyPaid { id: loan_id });
        }

        let now = time_provider.now();
        let payment = Payment::new(loan_id, amount, now, now);
        self.repo.create_payment(payment.clone())?;

        let totals = self.totals_for(&loan, time_provider)?;
        log::info!("recorded payment of {} on loan {}, balance {}", amount, loan_id, totals.balance);
        self.events.emit(LedgerEvent::PaymentRecorded {
            payment_id: payment.id,
            loan_id,
            amount,
            new_balance: totals.balance,
            timestamp: now,
        });

        Ok(payment)
    }

    /// record a payment for whatever balance is left, if any
    pub fn pay_full_balance(
        &mut self,
        loan_id: LoanId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Option<Payment>> {
        let loan = self.load_loan(loan_id)?;
        let totals = self.totals_for(&loan, time_provider)?;

        if !totals.balance.is_positive() {
            log::debug!("loan {} has no balance to settle", loan_id);
            return Ok(None);
        }

        self.record_payment(loan_id, totals.balance, time_provider).map(Some)
    }

    pub fn delete_payment(&mut self, id: PaymentId, time_provider: &SafeTimeProvider) -> Result<()> {
        let payment = self
            .repo
            .get_payment(id)?
            .ok_or(LedgerError::PaymentNotFound { id })?;

        self.repo.delete_payment(id)?;

        self.events.emit(LedgerEvent::PaymentDeleted {
            payment_id: id,
            loan_id: payment.loan_id,
            timestamp: time_provider.now(),
        });
        Ok(())
    }

    // reads

    pub fn loan_overview(&self, id: LoanId, time_provider: &SafeTimeProvider) -> Result<LoanOverview> {
        let now = time_provider.now();
        let loan = self.load_loan(id)?;
        let payments = self.repo.payments_for_loan(id)?;
        let borrower = self.repo.get_borrower(loan.borrower_id)?;

        let loans = [loan];
        let details = self.portfolio.loan_details(&loans, &payments, now);
        let view = LoanView::from_detail(&details[0], borrower.as_ref());

        log::debug!(
            "loan {} as of {}: due {}, paid {}, status {}",
            id,
            now,
            view.totals.total_due,
            view.totals.total_paid,
            view.status
        );

        Ok(LoanOverview { view, payments })
    }

    /// every loan, newest issue date first, optionally only one status
    pub fn loan_views(
        &self,
        filter: Option<LoanStatus>,
        time_provider: &SafeTimeProvider,
    ) -> Result<Vec<LoanView>> {
        let now = time_provider.now();
        let loans = self.repo.list_loans()?;
        let payments = self.repo.list_payments()?;
        let borrowers: HashMap<BorrowerId, Borrower> = self
            .repo
            .list_borrowers()?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        let mut views: Vec<LoanView> = self
            .portfolio
            .loan_details(&loans, &payments, now)
            .iter()
            .filter(|d| filter.map_or(true, |status| d.status == status))
            .map(|d| LoanView::from_detail(d, borrowers.get(&d.loan.borrower_id)))
            .collect();

        views.sort_by(|a, b| b.issue_date.cmp(&a.issue_date));
        Ok(views)
    }

    pub fn summary(&self, time_provider: &SafeTimeProvider) -> Result<PortfolioSummary> {
        let loans = self.repo.list_loans()?;
        let payments = self.repo.list_payments()?;
        Ok(self.portfolio.summarize(&loans, &payments, time_provider.now()))
    }

    /// summary against the system clock
    pub fn summary_now(&self) -> Result<PortfolioSummary> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.summary(&time)
    }

    pub fn due_soon(&self, time_provider: &SafeTimeProvider) -> Result<Vec<DueLoan>> {
        let loans = self.repo.list_loans()?;
        let payments = self.repo.list_payments()?;
        Ok(self.portfolio.due_soon(
            &loans,
            &payments,
            time_provider.now(),
            self.config.due_soon_window_days,
        ))
    }

    pub fn borrower_debts(&self, time_provider: &SafeTimeProvider) -> Result<Vec<BorrowerDebt>> {
        let borrowers = self.repo.list_borrowers()?;
        let loans = self.repo.list_loans()?;
        let payments = self.repo.list_payments()?;
        Ok(self
            .portfolio
            .borrower_debts(&borrowers, &loans, &payments, time_provider.now()))
    }

    // backup

    pub fn snapshot(&self) -> Result<LedgerSnapshot> {
        self.repo.snapshot()
    }

    /// push a full snapshot to `sink`; failures are returned untouched
    pub fn sync(&mut self, sink: &dyn SnapshotSink, time_provider: &SafeTimeProvider) -> Result<()> {
        let snapshot = self.snapshot()?;

        if let Err(e) = sink.sync_snapshot(&snapshot) {
            log::warn!("snapshot sync failed: {}", e);
            return Err(e);
        }

        self.events.emit(LedgerEvent::SnapshotSynced {
            borrowers: snapshot.borrowers.len(),
            loans: snapshot.loans.len(),
            payments: snapshot.payments.len(),
            timestamp: time_provider.now(),
        });
        Ok(())
    }

    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        self.events.take_events()
    }

    fn load_loan(&self, id: LoanId) -> Result<Loan> {
        self.repo.get_loan(id)?.ok_or(LedgerError::LoanNotFound { id })
    }

    fn totals_for(&self, loan: &Loan, time_provider: &SafeTimeProvider) -> Result<LoanTotals> {
        let payments = self.repo.payments_for_loan(loan.id)?;
        Ok(self.engine.compute_totals(loan, &payments, time_provider.now()))
    }
}
