use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{BorrowerId, LoanId, PaymentId};

/// all events that can be emitted by the loan book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerEvent {
    // borrower events
    BorrowerAdded {
        borrower_id: BorrowerId,
        name: String,
        timestamp: DateTime<Utc>,
    },
    BorrowerUpdated {
        borrower_id: BorrowerId,
        timestamp: DateTime<Utc>,
    },
    BorrowerRemoved {
        borrower_id: BorrowerId,
        timestamp: DateTime<Utc>,
    },

    // loan events
    LoanIssued {
        loan_id: LoanId,
        borrower_id: BorrowerId,
        principal: Money,
        due_date: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    },
    LoanUpdated {
        loan_id: LoanId,
        timestamp: DateTime<Utc>,
    },
    LoanMarkedPaid {
        loan_id: LoanId,
        /// balance at the moment it was marked, may be non-zero
        outstanding_balance: Money,
        timestamp: DateTime<Utc>,
    },
    LoanDeleted {
        loan_id: LoanId,
        payments_removed: usize,
        timestamp: DateTime<Utc>,
    },

    // payment events
    PaymentRecorded {
        payment_id: PaymentId,
        loan_id: LoanId,
        amount: Money,
        new_balance: Money,
        timestamp: DateTime<Utc>,
    },
    PaymentDeleted {
        payment_id: PaymentId,
        loan_id: LoanId,
        timestamp: DateTime<Utc>,
    },

    // backup events
    SnapshotSynced {
        borrowers: usize,
        loans: usize,
        payments: usize,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<LedgerEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_take_drains_store() {
        let mut store = EventStore::new();
        store.emit(LedgerEvent::LoanUpdated {
            loan_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        });
        store.emit(LedgerEvent::BorrowerRemoved {
            borrower_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        });

        assert_eq!(store.events().len(), 2);
        let taken = store.take_events();
        assert_eq!(taken.len(), 2);
        assert!(store.events().is_empty());
    }
}
