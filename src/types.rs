use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for a borrower
pub type BorrowerId = Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a payment
pub type PaymentId = Uuid;

/// loan tenor, each fixed tenor carries its own flat rate and term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenorType {
    #[serde(rename = "1_week")]
    OneWeek,
    #[serde(rename = "2_weeks")]
    TwoWeeks,
    #[serde(rename = "3_weeks")]
    ThreeWeeks,
    #[serde(rename = "4_weeks")]
    FourWeeks,
    /// caller-supplied rate and day count
    #[serde(rename = "custom")]
    Custom,
}

impl TenorType {
    /// the tenors backed by the lookup table
    pub const FIXED: [TenorType; 4] = [
        TenorType::OneWeek,
        TenorType::TwoWeeks,
        TenorType::ThreeWeeks,
        TenorType::FourWeeks,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TenorType::OneWeek => "1 Week",
            TenorType::TwoWeeks => "2 Weeks",
            TenorType::ThreeWeeks => "3 Weeks",
            TenorType::FourWeeks => "4 Weeks",
            TenorType::Custom => "Custom",
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, TenorType::Custom)
    }
}

/// stored loan flag; `Paid` is terminal and only set by explicit action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Active,
    Paid,
}

/// lifecycle status derived from the stored flag, the loan dates and "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    /// issued, not yet due
    Active,
    /// issue date still in the future
    Upcoming,
    DueToday,
    Overdue,
    /// explicitly marked paid
    Paid,
}

impl LoanStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Active => "Active",
            LoanStatus::Upcoming => "Upcoming",
            LoanStatus::DueToday => "Due Today",
            LoanStatus::Overdue => "Overdue",
            LoanStatus::Paid => "Paid",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
