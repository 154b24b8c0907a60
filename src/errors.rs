use thiserror::Error;

use crate::decimal::Money;
use crate::types::{BorrowerId, LoanId, PaymentId};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("borrower not found: {id}")]
    BorrowerNotFound {
        id: BorrowerId,
    },

    #[error("loan not found: {id}")]
    LoanNotFound {
        id: LoanId,
    },

    #[error("payment not found: {id}")]
    PaymentNotFound {
        id: PaymentId,
    },

    #[error("record already exists: {id}")]
    DuplicateId {
        id: uuid::Uuid,
    },

    #[error("borrower {id} still has {loan_count} loan(s)")]
    BorrowerHasLoans {
        id: BorrowerId,
        loan_count: usize,
    },

    #[error("invalid loan terms: {message}")]
    InvalidLoanTerms {
        message: String,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("loan already marked paid: {id}")]
    LoanAlreadyPaid {
        id: LoanId,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot sync failed: {message}")]
    SyncFailed {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
