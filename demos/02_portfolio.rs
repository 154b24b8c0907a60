/// portfolio - dashboard totals, due-soon list and per-borrower debt
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use lending_ledger::{
    InMemoryRepository, LedgerConfig, Loan, LoanBook, LoanStatus, Money, Rate, SafeTimeProvider,
    TenorType, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== portfolio example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();
    let mut book = LoanBook::new(InMemoryRepository::new(), LedgerConfig::default())?;

    let bupe = book.add_borrower("Bupe", "0977100200", Some("vegetable stand".to_string()), &time)?;
    let kasonde = book.add_borrower("Kasonde", "0966300400", None, &time)?;

    // a loan issued last month, already late
    book.issue_loan(
        Loan::builder()
            .borrower(bupe.id)
            .principal(Money::from_major(1_500))
            .tenor(TenorType::TwoWeeks)
            .issue_date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()),
        &time,
    )?;

    let weekly = book.issue_loan(
        Loan::builder()
            .borrower(kasonde.id)
            .principal(Money::from_major(800))
            .tenor(TenorType::OneWeek),
        &time,
    )?;

    book.issue_loan(
        Loan::builder()
            .borrower(kasonde.id)
            .principal(Money::from_major(2_000))
            .custom_tenor(Rate::from_percentage(35), 45),
        &time,
    )?;

    controller.advance(Duration::days(3));
    book.record_payment(weekly.id, Money::from_major(300), &time)?;

    let summary = book.summary(&time)?;
    println!("as of {}", time.now().format("%Y-%m-%d"));
    println!("  active loans:      {}", summary.active_loans);
    println!("  principal out:     {}", book.format_amount(summary.total_principal));
    println!("  interest expected: {}", book.format_amount(summary.total_interest));
    println!("  overdue:           {}", book.format_amount(summary.total_overdue));
    println!("  collected:         {}", book.format_amount(summary.total_collected));
    println!("  total profit:      {}", book.format_amount(summary.total_profit));

    println!("\ndue soon:");
    for due in &summary.due_soon {
        println!(
            "  {} {} ({})",
            due.due_date.format("%Y-%m-%d"),
            book.format_amount(due.balance),
            due.status
        );
    }

    println!("\noverdue loans:");
    for view in book.loan_views(Some(LoanStatus::Overdue), &time)? {
        println!("  {} owes {}", view.borrower_name, book.format_amount(view.totals.balance));
    }

    println!("\nby borrower:");
    for debt in book.borrower_debts(&time)? {
        println!(
            "  {:<10} {} loan(s), {}",
            debt.name,
            debt.active_loans,
            book.format_amount(debt.total_debt)
        );
    }

    Ok(())
}
