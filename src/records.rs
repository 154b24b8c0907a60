use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{TenorTable, TenorTerms};
use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::types::{BorrowerId, LoanId, PaymentId, RecordStatus, TenorType};

/// person money is lent to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Borrower {
    pub id: BorrowerId,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Borrower {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        notes: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            phone: phone.into(),
            notes,
            created_at,
        }
    }
}

/// a loan issued to a single borrower
///
/// `due_date` is always `issue_date` plus the tenor's day count. `status`
/// is the stored two-state flag; the display lifecycle is derived on read
/// by [`crate::accounting::derive_status`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: LoanId,
    pub borrower_id: BorrowerId,
    pub principal: Money,
    /// written as a percentage (15 for 15%)
    #[serde(with = "crate::decimal::rate_as_percentage")]
    pub interest_rate: Rate,
    pub issue_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub tenor_type: TenorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_tenor_days: Option<u32>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

impl Loan {
    pub fn builder() -> LoanBuilder {
        LoanBuilder::new()
    }

    /// whole days between issue and due date
    pub fn tenor_days(&self) -> i64 {
        (self.due_date - self.issue_date).num_days()
    }

    pub fn is_active(&self) -> bool {
        self.status == RecordStatus::Active
    }

    pub fn is_paid(&self) -> bool {
        self.status == RecordStatus::Paid
    }
}

/// money received against a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub loan_id: LoanId,
    pub amount: Money,
    pub payment_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(
        loan_id: LoanId,
        amount: Money,
        payment_date: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            loan_id,
            amount,
            payment_date,
            created_at,
        }
    }
}

/// builder for new or edited loans
///
/// This is the input layer: it validates what the accounting engine takes
/// on trust and resolves the tenor into a rate and a due date.
#[derive(Debug, Clone)]
pub struct LoanBuilder {
    id: Option<LoanId>,
    borrower_id: Option<BorrowerId>,
    principal: Option<Money>,
    tenor_type: TenorType,
    custom_terms: Option<TenorTerms>,
    issue_date: Option<NaiveDate>,
    status: RecordStatus,
    created_at: Option<DateTime<Utc>>,
}

impl LoanBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            borrower_id: None,
            principal: None,
            tenor_type: TenorType::OneWeek,
            custom_terms: None,
            issue_date: None,
            status: RecordStatus::Active,
            created_at: None,
        }
    }

    /// start from an existing loan, keeping its identity and stored status
    pub fn from_loan(loan: &Loan) -> Self {
        let custom_terms = loan
            .custom_tenor_days
            .filter(|_| loan.tenor_type.is_custom())
            .map(|days| TenorTerms::new(loan.interest_rate, days));

        Self {
            id: Some(loan.id),
            borrower_id: Some(loan.borrower_id),
            principal: Some(loan.principal),
            tenor_type: loan.tenor_type,
            custom_terms,
            issue_date: Some(loan.issue_date.date_naive()),
            status: loan.status,
            created_at: Some(loan.created_at),
        }
    }

    pub fn borrower(mut self, borrower_id: BorrowerId) -> Self {
        self.borrower_id = Some(borrower_id);
        self
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    /// one of the fixed tenors
    pub fn tenor(mut self, tenor_type: TenorType) -> Self {
        self.tenor_type = tenor_type;
        self
    }

    /// custom tenor with its own flat rate and day count
    pub fn custom_tenor(mut self, interest_rate: Rate, days: u32) -> Self {
        self.tenor_type = TenorType::Custom;
        self.custom_terms = Some(TenorTerms::new(interest_rate, days));
        self
    }

    pub fn issue_date(mut self, date: NaiveDate) -> Self {
        self.issue_date = Some(date);
        self
    }

    /// validate and build; `now` supplies defaults for issue and creation dates
    pub fn build(self, tenors: &TenorTable, now: DateTime<Utc>) -> Result<Loan> {
        let borrower_id = self.borrower_id.ok_or_else(|| LedgerError::InvalidLoanTerms {
            message: "borrower is required".to_string(),
        })?;

        let principal = self.principal.ok_or_else(|| LedgerError::InvalidLoanTerms {
            message: "principal is required".to_string(),
        })?;
        if !principal.is_positive() {
            return Err(LedgerError::InvalidLoanTerms {
                message: format!("principal must be positive, got {}", principal),
            });
        }

        let terms = tenors
            .resolve(self.tenor_type, self.custom_terms)
            .ok_or_else(|| LedgerError::InvalidLoanTerms {
                message: "custom tenor requires a rate and day count".to_string(),
            })?;
        if terms.days == 0 {
            return Err(LedgerError::InvalidLoanTerms {
                message: "tenor must be at least one day".to_string(),
            });
        }
        if terms.interest_rate.is_negative() {
            return Err(LedgerError::InvalidLoanTerms {
                message: format!("interest rate must not be negative, got {}", terms.interest_rate),
            });
        }

        let issue_day = self.issue_date.unwrap_or_else(|| now.date_naive());
        let issue_date = issue_day.and_time(chrono::NaiveTime::MIN).and_utc();
        let due_date = issue_date
            .checked_add_signed(Duration::days(i64::from(terms.days)))
            .ok_or_else(|| LedgerError::InvalidLoanTerms {
                message: format!("tenor too long: {} days", terms.days),
            })?;

        Ok(Loan {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            borrower_id,
            principal,
            interest_rate: terms.interest_rate,
            issue_date,
            due_date,
            tenor_type: self.tenor_type,
            custom_tenor_days: self.tenor_type.is_custom().then_some(terms.days),
            status: self.status,
            created_at: self.created_at.unwrap_or(now),
        })
    }
}

impl Default for LoanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_fixed_tenor_loan() {
        let borrower = Uuid::new_v4();
        let loan = Loan::builder()
            .borrower(borrower)
            .principal(Money::from_major(1_000))
            .tenor(TenorType::TwoWeeks)
            .build(&TenorTable::default(), now())
            .unwrap();

        assert_eq!(loan.borrower_id, borrower);
        assert_eq!(loan.interest_rate, Rate::from_percentage(20));
        assert_eq!(loan.issue_date, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(loan.due_date, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
        assert_eq!(loan.tenor_days(), 14);
        assert_eq!(loan.custom_tenor_days, None);
        assert_eq!(loan.created_at, now());
        assert!(loan.is_active());
    }

    #[test]
    fn test_custom_tenor_loan() {
        let loan = Loan::builder()
            .borrower(Uuid::new_v4())
            .principal(Money::from_major(500))
            .custom_tenor(Rate::from_percentage_decimal(dec!(12.5)), 10)
            .issue_date(NaiveDate::from_ymd_opt(2024, 2, 25).unwrap())
            .build(&TenorTable::default(), now())
            .unwrap();

        assert_eq!(loan.tenor_type, TenorType::Custom);
        assert_eq!(loan.custom_tenor_days, Some(10));
        assert_eq!(loan.due_date.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
        assert_eq!(loan.interest_rate.as_percentage(), dec!(12.5));
    }

    #[test]
    fn test_rejects_bad_terms() {
        let tenors = TenorTable::default();

        let missing_borrower = Loan::builder().principal(Money::from_major(10)).build(&tenors, now());
        assert!(matches!(missing_borrower, Err(LedgerError::InvalidLoanTerms { .. })));

        let zero_principal = Loan::builder()
            .borrower(Uuid::new_v4())
            .principal(Money::ZERO)
            .build(&tenors, now());
        assert!(matches!(zero_principal, Err(LedgerError::InvalidLoanTerms { .. })));

        let zero_days = Loan::builder()
            .borrower(Uuid::new_v4())
            .principal(Money::from_major(10))
            .custom_tenor(Rate::from_percentage(10), 0)
            .build(&tenors, now());
        assert!(matches!(zero_days, Err(LedgerError::InvalidLoanTerms { .. })));

        let custom_without_terms = Loan::builder()
            .borrower(Uuid::new_v4())
            .principal(Money::from_major(10))
            .tenor(TenorType::Custom)
            .build(&tenors, now());
        assert!(matches!(custom_without_terms, Err(LedgerError::InvalidLoanTerms { .. })));
    }

    #[test]
    fn test_rejects_tenor_past_calendar_end() {
        let result = Loan::builder()
            .borrower(Uuid::new_v4())
            .principal(Money::from_major(100))
            .custom_tenor(Rate::from_percentage(10), u32::MAX)
            .build(&TenorTable::default(), now());

        assert!(matches!(result, Err(LedgerError::InvalidLoanTerms { .. })));
    }

    #[test]
    fn test_edit_recomputes_due_date() {
        let tenors = TenorTable::default();
        let original = Loan::builder()
            .borrower(Uuid::new_v4())
            .principal(Money::from_major(1_000))
            .build(&tenors, now())
            .unwrap();

        let later = now() + Duration::days(3);
        let edited = LoanBuilder::from_loan(&original)
            .tenor(TenorType::FourWeeks)
            .build(&tenors, later)
            .unwrap();

        assert_eq!(edited.id, original.id);
        assert_eq!(edited.created_at, original.created_at);
        assert_eq!(edited.interest_rate, Rate::from_percentage(30));
        assert_eq!(edited.tenor_days(), 28);
    }

    #[test]
    fn test_loan_wire_format() {
        let loan = Loan::builder()
            .borrower(Uuid::new_v4())
            .principal(Money::from_major(1_000))
            .build(&TenorTable::default(), now())
            .unwrap();

        let json = serde_json::to_value(&loan).unwrap();
        assert_eq!(json["tenorType"], "1_week");
        assert_eq!(json["status"], "active");
        assert!(json.get("customTenorDays").is_none());

        assert_eq!(json["interestRate"], 15.0);

        let back: Loan = serde_json::from_value(json).unwrap();
        assert_eq!(back, loan);
    }

    #[test]
    fn test_reads_percentage_rate_records() {
        let json = r#"{
            "id": "6f1c2f4e-8d1a-4a44-9d6e-0a7c1f0b9e11",
            "borrowerId": "0b5e8a52-2a43-4f7e-b1c4-5a0e9f3d2c77",
            "principal": 1000,
            "interestRate": 15,
            "issueDate": "2024-01-01T00:00:00Z",
            "dueDate": "2024-01-08T00:00:00Z",
            "tenorType": "1_week",
            "status": "active",
            "createdAt": "2024-01-01T00:00:00Z"
        }"#;

        let loan: Loan = serde_json::from_str(json).unwrap();
        assert_eq!(loan.interest_rate, Rate::from_percentage(15));
        assert_eq!(
            crate::interest::simple_interest(loan.principal, loan.interest_rate),
            Money::from_major(150)
        );
    }
}
