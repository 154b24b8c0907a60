/// quick start - lend, collect, check the balance
use lending_ledger::{InMemoryRepository, LedgerConfig, Loan, LoanBook, Money, SafeTimeProvider, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let time = SafeTimeProvider::new(TimeSource::System);
    let mut book = LoanBook::new(InMemoryRepository::new(), LedgerConfig::default())?;

    // lend 1,000 for one week at the table rate
    let borrower = book.add_borrower("Mutinta", "0977000111", None, &time)?;
    let loan = book.issue_loan(
        Loan::builder().borrower(borrower.id).principal(Money::from_major(1_000)),
        &time,
    )?;

    // collect part of it
    book.record_payment(loan.id, Money::from_major(400), &time)?;

    let overview = book.loan_overview(loan.id, &time)?;
    println!("{}", serde_json::to_string_pretty(&overview.view)?);
    println!("balance: {}", book.format_amount(overview.view.totals.balance));

    Ok(())
}
