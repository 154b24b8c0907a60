//! Serializable views of loans for dashboards, lists and exports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::accounting::LoanTotals;
use crate::decimal::{Money, Rate};
use crate::portfolio::LoanDetail;
use crate::records::{Borrower, Payment};
use crate::types::{BorrowerId, LoanId, LoanStatus, TenorType};

/// placeholder shown when a loan's borrower record is missing
pub const UNKNOWN_BORROWER: &str = "Unknown";

/// one row per loan, as shown in lists and written by exporters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanView {
    pub loan_id: LoanId,
    pub borrower_id: BorrowerId,
    pub borrower_name: String,
    pub principal: Money,
    pub interest_rate: Rate,
    pub tenor_type: TenorType,
    pub issue_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub totals: LoanTotals,
    pub status: LoanStatus,
}

impl LoanView {
    pub fn from_detail(detail: &LoanDetail<'_>, borrower: Option<&Borrower>) -> Self {
        let loan = detail.loan;

        LoanView {
            loan_id: loan.id,
            borrower_id: loan.borrower_id,
            borrower_name: borrower
                .map(|b| b.name.clone())
                .unwrap_or_else(|| UNKNOWN_BORROWER.to_string()),
            principal: loan.principal,
            interest_rate: loan.interest_rate,
            tenor_type: loan.tenor_type,
            issue_date: loan.issue_date,
            due_date: loan.due_date,
            totals: detail.totals,
            status: detail.status,
        }
    }
}

/// a single loan with its payment history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanOverview {
    pub view: LoanView,
    /// oldest first
    pub payments: Vec<Payment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TenorTable;
    use crate::portfolio::Portfolio;
    use crate::records::Loan;
    use chrono::TimeZone;
    use uuid::Uuid;

    #[test]
    fn test_view_from_detail() {
        let now = Utc.with_ymd_and_hms(2024, 1, 8, 12, 0, 0).unwrap();
        let borrower = Borrower::new("Bwalya", "0966000000", Some("market stall".to_string()), now);
        let loan = Loan::builder()
            .borrower(borrower.id)
            .principal(Money::from_major(1_000))
            .issue_date(chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .build(&TenorTable::default(), now)
            .unwrap();
        let loans = vec![loan];

        let details = Portfolio::default().loan_details(&loans, &[], now);
        let view = LoanView::from_detail(&details[0], Some(&borrower));

        assert_eq!(view.borrower_name, "Bwalya");
        assert_eq!(view.status, LoanStatus::DueToday);
        assert_eq!(view.totals.total_due, Money::from_major(1_150));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "DueToday");
        assert_eq!(json["tenor_type"], "1_week");
    }

    #[test]
    fn test_missing_borrower_placeholder() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let loan = Loan::builder()
            .borrower(Uuid::new_v4())
            .principal(Money::from_major(10))
            .build(&TenorTable::default(), now)
            .unwrap();
        let loans = vec![loan];

        let details = Portfolio::default().loan_details(&loans, &[], now);
        let view = LoanView::from_detail(&details[0], None);
        assert_eq!(view.borrower_name, UNKNOWN_BORROWER);
    }
}
