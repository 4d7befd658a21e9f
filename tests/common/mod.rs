#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Local};
use circulation::application::engine::LendingEngine;
use circulation::domain::loan::{BorrowRecord, LOAN_PERIOD_DAYS, LoanState};
use circulation::domain::patron::PatronId;
use circulation::domain::ports::{ChargeResponse, LibraryStore, PaymentGateway, RefundResponse};
use circulation::error::{LibraryError, Result};
use circulation::infrastructure::in_memory::InMemoryLibraryStore;
use rust_decimal::Decimal;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Engine wired to an in-memory store, plus a handle onto the same store so
/// tests can inspect and seed state directly.
pub fn engine_with_store() -> (LendingEngine, InMemoryLibraryStore) {
    let store = InMemoryLibraryStore::new();
    (LendingEngine::new(Box::new(store.clone())), store)
}

pub async fn seed_book(engine: &LendingEngine, title: &str, isbn: &str, copies: u32) {
    engine
        .add_book(title, "Frank Herbert", isbn, copies)
        .await
        .unwrap();
}

/// Seeds an active loan whose due date is `days_overdue` days in the past
/// (zero means due today).
pub async fn seed_loan_due_days_ago(
    store: &InMemoryLibraryStore,
    patron: &str,
    book_id: u32,
    days_overdue: i64,
) {
    let due_at = Local::now().naive_local() - Duration::days(days_overdue);
    let record = BorrowRecord {
        patron_id: PatronId::parse(patron).unwrap(),
        book_id,
        borrowed_at: due_at - Duration::days(LOAN_PERIOD_DAYS),
        due_at: Some(due_at),
        state: LoanState::Active,
    };
    assert!(store.insert_borrow_record(record).await.unwrap());
}

#[derive(Clone, Copy, PartialEq)]
pub enum GatewayMode {
    Approve,
    Decline,
    TransportError,
}

/// A scripted gateway that records every call, so tests can prove the engine
/// never contacted it.
pub struct MockGateway {
    pub mode: GatewayMode,
    pub charges: AtomicUsize,
    pub refunds: AtomicUsize,
    pub charged_amounts: Mutex<Vec<Decimal>>,
}

impl MockGateway {
    pub fn new(mode: GatewayMode) -> Self {
        Self {
            mode,
            charges: AtomicUsize::new(0),
            refunds: AtomicUsize::new(0),
            charged_amounts: Mutex::new(Vec::new()),
        }
    }

    pub fn charge_count(&self) -> usize {
        self.charges.load(Ordering::SeqCst)
    }

    pub fn refund_count(&self) -> usize {
        self.refunds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn charge(&self, amount: Decimal) -> Result<ChargeResponse> {
        self.charges.fetch_add(1, Ordering::SeqCst);
        self.charged_amounts.lock().unwrap().push(amount);
        match self.mode {
            GatewayMode::Approve => Ok(ChargeResponse {
                success: true,
                transaction_id: Some("tx123".to_string()),
            }),
            GatewayMode::Decline => Ok(ChargeResponse {
                success: false,
                transaction_id: None,
            }),
            GatewayMode::TransportError => {
                Err(LibraryError::Gateway("network error".to_string()))
            }
        }
    }

    async fn refund(&self, _transaction_id: &str, _amount: Decimal) -> Result<RefundResponse> {
        self.refunds.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            GatewayMode::Approve => Ok(RefundResponse {
                success: true,
                refund_id: Some("rf123".to_string()),
            }),
            GatewayMode::Decline => Ok(RefundResponse {
                success: false,
                refund_id: None,
            }),
            GatewayMode::TransportError => {
                Err(LibraryError::Gateway("network error".to_string()))
            }
        }
    }
}
