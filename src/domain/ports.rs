use crate::domain::book::{Book, Isbn, NewBook};
use crate::domain::loan::{BorrowRecord, LoanSummary};
use crate::domain::patron::PatronId;
use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The narrow read/write surface the engine consumes from the data store.
///
/// Write operations report `Ok(false)` when the row-level change did not
/// happen (missing row, bound violated); the error channel is reserved for
/// transport or encoding faults of the backing store.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    async fn book_by_id(&self, book_id: u32) -> Result<Option<Book>>;
    async fn book_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>>;
    /// All catalog rows in insertion order.
    async fn all_books(&self) -> Result<Vec<Book>>;
    async fn active_borrow_count(&self, patron_id: &PatronId) -> Result<u32>;
    /// The patron's active loans joined with catalog data, overdue flag
    /// precomputed at read time.
    async fn borrowed_books(&self, patron_id: &PatronId) -> Result<Vec<LoanSummary>>;
    /// Inserts a catalog row; the store assigns the id.
    async fn insert_book(&self, new: NewBook) -> Result<bool>;
    async fn insert_borrow_record(&self, record: BorrowRecord) -> Result<bool>;
    /// Applies `delta` to `available_copies`, refusing any move outside
    /// `0..=total_copies`.
    async fn adjust_availability(&self, book_id: u32, delta: i32) -> Result<bool>;
    /// Marks the most recent active record for (patron, book) as returned.
    async fn mark_returned(
        &self,
        patron_id: &PatronId,
        book_id: u32,
        returned_at: NaiveDateTime,
    ) -> Result<bool>;
}

pub type LibraryStoreBox = Box<dyn LibraryStore>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeResponse {
    pub success: bool,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundResponse {
    pub success: bool,
    pub refund_id: Option<String>,
}

/// External settlement capability.
///
/// A returned `success = false` is a decline/rejection by the gateway's own
/// rules; `Err` is a transport-class failure (the "gateway raised" case).
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, amount: Decimal) -> Result<ChargeResponse>;
    async fn refund(&self, transaction_id: &str, amount: Decimal) -> Result<RefundResponse>;
}

pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
