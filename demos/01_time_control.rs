/// time control - watch a loan go overdue under a controlled clock
use chrono::{Duration, TimeZone, Utc};
use lending_ledger::{
    InMemoryRepository, LedgerConfig, Loan, LoanBook, Money, SafeTimeProvider, TenorType, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== time control example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();
    let mut book = LoanBook::new(InMemoryRepository::new(), LedgerConfig::default())?;

    let borrower = book.add_borrower("Kabwe", "0966222333", None, &time)?;
    let loan = book.issue_loan(
        Loan::builder()
            .borrower(borrower.id)
            .principal(Money::from_major(1_000))
            .tenor(TenorType::OneWeek),
        &time,
    )?;
    println!("issued on {}, due {}", loan.issue_date.format("%Y-%m-%d"), loan.due_date.format("%Y-%m-%d"));

    // day 0, due day, a day late, then each full week late
    let mut elapsed = 0;
    for day in [0, 7, 8, 14, 21] {
        controller.advance(Duration::days(day - elapsed));
        elapsed = day;

        let view = book.loan_overview(loan.id, &time)?.view;
        println!(
            "{}: {:<9} penalty {}  due {}",
            time.now().format("%Y-%m-%d"),
            view.status.to_string(),
            view.totals.overdue_penalty,
            book.format_amount(view.totals.total_due)
        );
    }

    // settle what is owed and close the loan
    if let Some(payment) = book.pay_full_balance(loan.id, &time)? {
        println!("\nsettled {}", book.format_amount(payment.amount));
    }
    book.mark_paid(loan.id, &time)?;

    controller.advance(Duration::days(30));
    let view = book.loan_overview(loan.id, &time)?.view;
    println!("a month later: {} with penalty {}", view.status, view.totals.overdue_penalty);

    Ok(())
}
