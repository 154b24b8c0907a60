use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use lending_ledger::{
    compute_totals, derive_status, InMemoryRepository, JsonFileSink, LedgerConfig, LedgerError,
    LedgerEvent, LedgerSnapshot, Loan, LoanBook, LoanStatus, Money, Payment, RecordStatus,
    Repository, SafeTimeProvider, TenorTable, TenorType, TimeSource,
};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn one_week_loan() -> Loan {
    Loan::builder()
        .borrower(Uuid::new_v4())
        .principal(Money::from_major(1_000))
        .tenor(TenorType::OneWeek)
        .issue_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .build(&TenorTable::default(), at(2024, 1, 1))
        .unwrap()
}

#[test]
fn test_due_today_without_payments() {
    let loan = one_week_loan();
    assert_eq!(loan.interest_rate.as_percentage(), dec!(15));
    assert_eq!(loan.due_date, at(2024, 1, 8));

    let now = at(2024, 1, 8);
    let totals = compute_totals(&loan, &Vec::<Payment>::new(), now);

    assert_eq!(totals.simple_interest, Money::from_major(150));
    assert_eq!(totals.overdue_penalty, Money::ZERO);
    assert_eq!(totals.total_due, Money::from_major(1_150));
    assert_eq!(derive_status(&loan, totals.total_paid, now), LoanStatus::DueToday);
}

#[test]
fn test_eight_days_overdue() {
    let loan = one_week_loan();
    let now = at(2024, 1, 16);
    let totals = compute_totals(&loan, &Vec::<Payment>::new(), now);

    assert_eq!(totals.overdue_penalty, Money::from_major(50));
    assert_eq!(totals.total_due, Money::from_major(1_200));
    assert_eq!(derive_status(&loan, totals.total_paid, now), LoanStatus::Overdue);
}

#[test]
fn test_payment_does_not_resolve_status() {
    let loan = one_week_loan();
    let payments = vec![Payment::new(loan.id, Money::from_major(1_150), at(2024, 1, 5), at(2024, 1, 5))];
    let now = at(2024, 1, 16);
    let totals = compute_totals(&loan, &payments, now);

    assert_eq!(totals.total_paid, Money::from_major(1_150));
    assert_eq!(totals.balance, Money::from_major(50));
    assert_eq!(derive_status(&loan, totals.total_paid, now), LoanStatus::Overdue);
}

#[test]
fn test_marked_paid_freezes_penalty() {
    let mut loan = one_week_loan();
    loan.status = RecordStatus::Paid;

    for now in [at(2024, 1, 16), at(2024, 6, 1), at(2030, 1, 1)] {
        let totals = compute_totals(&loan, &Vec::<Payment>::new(), now);
        assert_eq!(totals.overdue_penalty, Money::ZERO);
        assert_eq!(totals.balance, Money::from_major(1_150));
        assert_eq!(derive_status(&loan, totals.total_paid, now), LoanStatus::Paid);
    }
}

#[test]
fn test_book_walkthrough() {
    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()));
    let control = time.test_control().unwrap();
    let mut book = LoanBook::new(InMemoryRepository::new(), LedgerConfig::default()).unwrap();

    let borrower = book.add_borrower("Chipo", "0955111222", None, &time).unwrap();
    let weekly = book
        .issue_loan(
            Loan::builder().borrower(borrower.id).principal(Money::from_major(1_000)),
            &time,
        )
        .unwrap();
    let monthly = book
        .issue_loan(
            Loan::builder()
                .borrower(borrower.id)
                .principal(Money::from_major(2_000))
                .tenor(TenorType::FourWeeks),
            &time,
        )
        .unwrap();

    control.advance(Duration::days(15));
    book.record_payment(weekly.id, Money::from_major(1_150), &time).unwrap();

    let summary = book.summary(&time).unwrap();
    assert_eq!(summary.active_loans, 2);
    assert_eq!(summary.total_lent, Money::from_major(3_000));
    // 150 + 50 penalty, 600
    assert_eq!(summary.total_profit, Money::from_major(800));
    assert_eq!(summary.total_overdue, Money::from_major(50));
    assert_eq!(summary.total_collected, Money::from_major(1_150));
    assert!(summary.due_soon.is_empty());

    book.mark_paid(weekly.id, &time).unwrap();
    let summary = book.summary(&time).unwrap();
    assert_eq!(summary.active_loans, 1);
    assert_eq!(summary.total_outstanding, Money::from_major(2_600));
    assert_eq!(summary.total_overdue, Money::ZERO);

    control.advance(Duration::days(7));
    let due = book.due_soon(&time).unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].loan_id, monthly.id);

    let paid = book.loan_views(Some(LoanStatus::Paid), &time).unwrap();
    assert_eq!(paid.len(), 1);
    assert_eq!(paid[0].loan_id, weekly.id);
}

#[test]
fn test_deleting_loan_removes_its_payments() {
    let time = SafeTimeProvider::new(TimeSource::Test(at(2024, 2, 1)));
    let mut book = LoanBook::new(InMemoryRepository::new(), LedgerConfig::default()).unwrap();

    let borrower = book.add_borrower("Mwansa", "", None, &time).unwrap();
    let loan = book
        .issue_loan(Loan::builder().borrower(borrower.id).principal(Money::from_major(500)), &time)
        .unwrap();
    for amount in [100, 200, 50] {
        book.record_payment(loan.id, Money::from_major(amount), &time).unwrap();
    }
    book.take_events();

    assert_eq!(book.delete_loan(loan.id, &time).unwrap(), 3);
    assert!(book.repository().list_payments().unwrap().is_empty());
    assert!(matches!(
        book.loan_overview(loan.id, &time),
        Err(LedgerError::LoanNotFound { .. })
    ));
    assert!(matches!(
        book.take_events().as_slice(),
        [LedgerEvent::LoanDeleted { payments_removed: 3, .. }]
    ));
}

#[test]
fn test_backup_restores_same_accounting() {
    let time = SafeTimeProvider::new(TimeSource::Test(at(2024, 3, 1)));
    let mut book = LoanBook::new(InMemoryRepository::new(), LedgerConfig::default()).unwrap();

    let borrower = book.add_borrower("Inonge", "", Some("tailor".to_string()), &time).unwrap();
    let loan = book
        .issue_loan(
            Loan::builder()
                .borrower(borrower.id)
                .principal(Money::from_major(750))
                .custom_tenor(lending_ledger::Rate::from_percentage(12), 10),
            &time,
        )
        .unwrap();
    book.record_payment(loan.id, Money::from_major(300), &time).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let sink = JsonFileSink::new(dir.path().join("ledger.json"));
    book.sync(&sink, &time).unwrap();

    let restored: LedgerSnapshot = sink.load().unwrap();
    let restored = LoanBook::new(
        InMemoryRepository::from_snapshot(restored).unwrap(),
        LedgerConfig::default(),
    )
    .unwrap();

    let before = book.loan_overview(loan.id, &time).unwrap();
    let after = restored.loan_overview(loan.id, &time).unwrap();
    assert_eq!(before, after);
    assert_eq!(after.view.totals.total_due, Money::from_major(840));
    assert_eq!(after.view.tenor_type, TenorType::Custom);
}

#[test]
fn test_config_from_json_overrides() {
    let config = LedgerConfig::from_json(
        r#"{ "due_soon_window_days": 3, "currency": { "code": "USD", "max_fraction_digits": 2 } }"#,
    )
    .unwrap();
    assert_eq!(config.due_soon_window_days, 3);
    assert_eq!(config.currency.format(Money::from_major(1_150)), "USD 1,150");
    assert_eq!(config.tenors, TenorTable::default());
}
