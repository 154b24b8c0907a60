/// backup - write the ledger to disk and restore it
use lending_ledger::{
    InMemoryRepository, JsonFileSink, LedgerConfig, LedgerEvent, Loan, LoanBook, Money,
    SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let time = SafeTimeProvider::new(TimeSource::System);
    let mut book = LoanBook::new(InMemoryRepository::new(), LedgerConfig::default())?;

    let borrower = book.add_borrower("Namwinga", "0955444555", None, &time)?;
    let loan = book.issue_loan(
        Loan::builder().borrower(borrower.id).principal(Money::from_major(600)),
        &time,
    )?;
    book.record_payment(loan.id, Money::from_major(200), &time)?;

    let path = std::env::temp_dir().join("lending_ledger_backup.json");
    let sink = JsonFileSink::new(&path);
    book.sync(&sink, &time)?;

    for event in book.take_events() {
        if let LedgerEvent::SnapshotSynced { borrowers, loans, payments, .. } = event {
            println!("backed up {} borrower(s), {} loan(s), {} payment(s)", borrowers, loans, payments);
        }
    }

    // restore into a fresh book
    let restored = LoanBook::new(
        InMemoryRepository::from_snapshot(sink.load()?)?,
        LedgerConfig::default(),
    )?;
    let view = restored.loan_overview(loan.id, &time)?.view;
    println!("restored {} with balance {}", view.borrower_name, restored.format_amount(view.totals.balance));

    std::fs::remove_file(sink.path())?;
    Ok(())
}
