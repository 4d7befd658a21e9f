mod common;

use chrono::{Duration, Local};
use circulation::domain::fee::FeeStatus;
use circulation::domain::loan::{BorrowRecord, LoanState};
use circulation::domain::patron::PatronId;
use circulation::domain::ports::LibraryStore;
use common::{engine_with_store, seed_book, seed_loan_due_days_ago};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_invalid_patron_is_a_zero_quote() {
    let (engine, _) = engine_with_store();
    let quote = engine.late_fee("12x456", 1).await.unwrap();
    assert_eq!(quote.status, FeeStatus::InvalidPatron);
    assert_eq!(quote.fee_amount, Decimal::ZERO);
    assert_eq!(quote.days_overdue, 0);
}

#[tokio::test]
async fn test_no_active_record_is_a_zero_quote() {
    let (engine, _) = engine_with_store();
    seed_book(&engine, "Dune", "9780441172719", 1).await;
    let quote = engine.late_fee("100001", 1).await.unwrap();
    assert_eq!(quote.status, FeeStatus::NoActiveBorrow);
    assert_eq!(quote.fee_amount, Decimal::ZERO);
}

#[tokio::test]
async fn test_due_today_is_ok_with_zero_fee() {
    let (engine, store) = engine_with_store();
    seed_book(&engine, "Dune", "9780441172719", 1).await;
    seed_loan_due_days_ago(&store, "100001", 1, 0).await;

    let quote = engine.late_fee("100001", 1).await.unwrap();
    assert_eq!(quote.status, FeeStatus::Ok);
    assert_eq!(quote.fee_amount, Decimal::ZERO);
}

#[tokio::test]
async fn test_not_yet_due_is_ok() {
    let (engine, store) = engine_with_store();
    seed_book(&engine, "Dune", "9780441172719", 1).await;
    seed_loan_due_days_ago(&store, "100001", 1, -7).await;

    let quote = engine.late_fee("100001", 1).await.unwrap();
    assert_eq!(quote.status, FeeStatus::Ok);
    assert_eq!(quote.days_overdue, 0);
}

#[tokio::test]
async fn test_one_day_overdue_is_fifty_cents() {
    let (engine, store) = engine_with_store();
    seed_book(&engine, "Dune", "9780441172719", 1).await;
    seed_loan_due_days_ago(&store, "100001", 1, 1).await;

    let quote = engine.late_fee("100001", 1).await.unwrap();
    assert_eq!(quote.status, FeeStatus::Overdue);
    assert_eq!(quote.days_overdue, 1);
    assert_eq!(quote.fee_amount, dec!(0.50));
}

#[tokio::test]
async fn test_three_days_overdue_is_one_fifty() {
    let (engine, store) = engine_with_store();
    seed_book(&engine, "Dune", "9780441172719", 1).await;
    seed_loan_due_days_ago(&store, "100001", 1, 3).await;

    let quote = engine.late_fee("100001", 1).await.unwrap();
    assert_eq!(quote.days_overdue, 3);
    assert_eq!(quote.fee_amount, dec!(1.50));
}

#[tokio::test]
async fn test_fee_has_no_cap() {
    let (engine, store) = engine_with_store();
    seed_book(&engine, "Dune", "9780441172719", 1).await;
    seed_loan_due_days_ago(&store, "100001", 1, 365).await;

    let quote = engine.late_fee("100001", 1).await.unwrap();
    assert_eq!(quote.fee_amount, dec!(182.50));
}

#[tokio::test]
async fn test_loan_without_due_date_quotes_no_due_date() {
    let (engine, store) = engine_with_store();
    seed_book(&engine, "Dune", "9780441172719", 1).await;
    store
        .insert_borrow_record(BorrowRecord {
            patron_id: PatronId::parse("100001").unwrap(),
            book_id: 1,
            borrowed_at: Local::now().naive_local() - Duration::days(20),
            due_at: None,
            state: LoanState::Active,
        })
        .await
        .unwrap();

    let quote = engine.late_fee("100001", 1).await.unwrap();
    assert_eq!(quote.status, FeeStatus::NoDueDate);
    assert_eq!(quote.fee_amount, Decimal::ZERO);
}

#[tokio::test]
async fn test_fee_matches_the_requested_book_only() {
    let (engine, store) = engine_with_store();
    seed_book(&engine, "Dune", "9780441172719", 1).await;
    seed_book(&engine, "Dune Messiah", "9780441172696", 1).await;
    seed_loan_due_days_ago(&store, "100001", 2, 4).await;

    let quote = engine.late_fee("100001", 1).await.unwrap();
    assert_eq!(quote.status, FeeStatus::NoActiveBorrow);

    let quote = engine.late_fee("100001", 2).await.unwrap();
    assert_eq!(quote.fee_amount, dec!(2.00));
}
