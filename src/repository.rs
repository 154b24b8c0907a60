//! Record storage consumed by the loan book.

use std::collections::{HashMap, HashSet};

use crate::errors::{LedgerError, Result};
use crate::records::{Borrower, Loan, Payment};
use crate::sync::LedgerSnapshot;
use crate::types::{BorrowerId, LoanId, PaymentId};

/// durable store of borrowers, loans and payments keyed by id
///
/// `delete_loan` must remove the loan and every payment that references it
/// as one unit: on error nothing is removed.
pub trait Repository {
    fn list_borrowers(&self) -> Result<Vec<Borrower>>;
    fn list_loans(&self) -> Result<Vec<Loan>>;
    fn list_payments(&self) -> Result<Vec<Payment>>;
    fn payments_for_loan(&self, loan_id: LoanId) -> Result<Vec<Payment>>;

    fn get_borrower(&self, id: BorrowerId) -> Result<Option<Borrower>>;
    fn get_loan(&self, id: LoanId) -> Result<Option<Loan>>;
    fn get_payment(&self, id: PaymentId) -> Result<Option<Payment>>;

    fn create_borrower(&mut self, borrower: Borrower) -> Result<()>;
    fn update_borrower(&mut self, borrower: Borrower) -> Result<()>;
    /// refuses while any loan references the borrower
    fn delete_borrower(&mut self, id: BorrowerId) -> Result<()>;

    fn create_loan(&mut self, loan: Loan) -> Result<()>;
    fn update_loan(&mut self, loan: Loan) -> Result<()>;
    /// returns the number of payments removed with the loan
    fn delete_loan(&mut self, id: LoanId) -> Result<usize>;

    fn create_payment(&mut self, payment: Payment) -> Result<()>;
    fn delete_payment(&mut self, id: PaymentId) -> Result<()>;

    /// copy of every record, for backups
    fn snapshot(&self) -> Result<LedgerSnapshot> {
        Ok(LedgerSnapshot {
            loans: self.list_loans()?,
            borrowers: self.list_borrowers()?,
            payments: self.list_payments()?,
        })
    }
}

/// in-memory repository with a loan -> payments index
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    borrowers: HashMap<BorrowerId, Borrower>,
    loans: HashMap<LoanId, Loan>,
    payments: HashMap<PaymentId, Payment>,
    payments_by_loan: HashMap<LoanId, HashSet<PaymentId>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// load a backup as-is
    ///
    /// Dangling references are kept so nothing in the backup is lost;
    /// duplicate ids are rejected.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self> {
        let mut repo = Self::new();

        for borrower in snapshot.borrowers {
            if repo.borrowers.contains_key(&borrower.id) {
                return Err(LedgerError::DuplicateId { id: borrower.id });
            }
            repo.borrowers.insert(borrower.id, borrower);
        }

        for loan in snapshot.loans {
            if repo.loans.contains_key(&loan.id) {
                return Err(LedgerError::DuplicateId { id: loan.id });
            }
            repo.loans.insert(loan.id, loan);
        }

        let mut orphans = 0usize;
        for payment in snapshot.payments {
            if repo.payments.contains_key(&payment.id) {
                return Err(LedgerError::DuplicateId { id: payment.id });
            }
            if !repo.loans.contains_key(&payment.loan_id) {
                orphans += 1;
            }
            repo.index_payment(&payment);
            repo.payments.insert(payment.id, payment);
        }

        if orphans > 0 {
            log::warn!("snapshot contains {} payment(s) for unknown loans", orphans);
        }

        Ok(repo)
    }

    fn index_payment(&mut self, payment: &Payment) {
        self.payments_by_loan
            .entry(payment.loan_id)
            .or_default()
            .insert(payment.id);
    }

    fn ensure_borrower(&self, id: BorrowerId) -> Result<()> {
        if self.borrowers.contains_key(&id) {
            Ok(())
        } else {
            Err(LedgerError::BorrowerNotFound { id })
        }
    }
}

fn sorted_by_creation<T, F>(mut records: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> (chrono::DateTime<chrono::Utc>, uuid::Uuid),
{
    records.sort_by_key(key);
    records
}

impl Repository for InMemoryRepository {
    fn list_borrowers(&self) -> Result<Vec<Borrower>> {
        let all: Vec<Borrower> = self.borrowers.values().cloned().collect();
        Ok(sorted_by_creation(all, |b: &Borrower| (b.created_at, b.id)))
    }

    fn list_loans(&self) -> Result<Vec<Loan>> {
        let all: Vec<Loan> = self.loans.values().cloned().collect();
        Ok(sorted_by_creation(all, |l: &Loan| (l.created_at, l.id)))
    }

    fn list_payments(&self) -> Result<Vec<Payment>> {
        let all: Vec<Payment> = self.payments.values().cloned().collect();
        Ok(sorted_by_creation(all, |p: &Payment| (p.created_at, p.id)))
    }

    fn payments_for_loan(&self, loan_id: LoanId) -> Result<Vec<Payment>> {
        let all: Vec<Payment> = self
            .payments_by_loan
            .get(&loan_id)
            .map(|ids| ids.iter().filter_map(|id| self.payments.get(id)).cloned().collect())
            .unwrap_or_default();
        Ok(sorted_by_creation(all, |p: &Payment| (p.created_at, p.id)))
    }

    fn get_borrower(&self, id: BorrowerId) -> Result<Option<Borrower>> {
        Ok(self.borrowers.get(&id).cloned())
    }

    fn get_loan(&self, id: LoanId) -> Result<Option<Loan>> {
        Ok(self.loans.get(&id).cloned())
    }

    fn get_payment(&self, id: PaymentId) -> Result<Option<Payment>> {
        Ok(self.payments.get(&id).cloned())
    }

    fn create_borrower(&mut self, borrower: Borrower) -> Result<()> {
        if self.borrowers.contains_key(&borrower.id) {
            return Err(LedgerError::DuplicateId { id: borrower.id });
        }
        self.borrowers.insert(borrower.id, borrower);
        Ok(())
    }

    fn update_borrower(&mut self, borrower: Borrower) -> Result<()> {
        self.ensure_borrower(borrower.id)?;
        self.borrowers.insert(borrower.id, borrower);
        Ok(())
    }

    fn delete_borrower(&mut self, id: BorrowerId) -> Result<()> {
        self.ensure_borrower(id)?;

        let loan_count = self.loans.values().filter(|l| l.borrower_id == id).count();
        if loan_count > 0 {
            return Err(LedgerError::BorrowerHasLoans { id, loan_count });
        }

        self.borrowers.remove(&id);
        Ok(())
    }

    fn create_loan(&mut self, loan: Loan) -> Result<()> {
        if self.loans.contains_key(&loan.id) {
            return Err(LedgerError::DuplicateId { id: loan.id });
        }
        self.ensure_borrower(loan.borrower_id)?;
        self.loans.insert(loan.id, loan);
        Ok(())
    }

    fn update_loan(&mut self, loan: Loan) -> Result<()> {
        if !self.loans.contains_key(&loan.id) {
            return Err(LedgerError::LoanNotFound { id: loan.id });
        }
        self.ensure_borrower(loan.borrower_id)?;
        self.loans.insert(loan.id, loan);
        Ok(())
    }

    fn delete_loan(&mut self, id: LoanId) -> Result<usize> {
        if !self.loans.contains_key(&id) {
            return Err(LedgerError::LoanNotFound { id });
        }

        // every check is done, nothing below can fail
        let payment_ids = self.payments_by_loan.remove(&id).unwrap_or_default();
        for payment_id in &payment_ids {
            self.payments.remove(payment_id);
        }
        self.loans.remove(&id);

        Ok(payment_ids.len())
    }

    fn create_payment(&mut self, payment: Payment) -> Result<()> {
        if self.payments.contains_key(&payment.id) {
            return Err(LedgerError::DuplicateId { id: payment.id });
        }
        if !self.loans.contains_key(&payment.loan_id) {
            return Err(LedgerError::LoanNotFound { id: payment.loan_id });
        }
        self.index_payment(&payment);
        self.payments.insert(payment.id, payment);
        Ok(())
    }

    fn delete_payment(&mut self, id: PaymentId) -> Result<()> {
        let payment = self
            .payments
            .remove(&id)
            .ok_or(LedgerError::PaymentNotFound { id })?;

        if let Some(ids) = self.payments_by_loan.get_mut(&payment.loan_id) {
            ids.remove(&id);
            if ids.is_empty() {
                self.payments_by_loan.remove(&payment.loan_id);
            }
        }
        Ok(())
    }
}
