pub mod accounting;
pub mod book;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod portfolio;
pub mod records;
pub mod repository;
pub mod serialization;
pub mod sync;
pub mod types;

// re-export key types
pub use accounting::{compute_totals, derive_status, AccountingEngine, LoanTotals};
pub use book::LoanBook;
pub use config::{CurrencyFormat, LedgerConfig, TenorTable, TenorTerms};
pub use decimal::{Money, Rate};
pub use errors::{LedgerError, Result};
pub use events::{EventStore, LedgerEvent};
pub use interest::{simple_interest, PenaltyCalculation, PenaltyConfig, PenaltyEngine};
pub use portfolio::{summarize, BorrowerDebt, DueLoan, LoanDetail, Portfolio, PortfolioSummary};
pub use records::{Borrower, Loan, LoanBuilder, Payment};
pub use repository::{InMemoryRepository, Repository};
pub use serialization::{LoanOverview, LoanView};
pub use sync::{JsonFileSink, LedgerSnapshot, SnapshotSink};
pub use types::{BorrowerId, LoanId, LoanStatus, PaymentId, RecordStatus, TenorType};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
