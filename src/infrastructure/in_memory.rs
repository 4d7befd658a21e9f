use crate::domain::book::{Book, Isbn, NewBook};
use crate::domain::loan::{BorrowRecord, LoanState, LoanSummary};
use crate::domain::patron::PatronId;
use crate::domain::ports::LibraryStore;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    books: Vec<Book>,
    loans: Vec<BorrowRecord>,
    next_book_id: u32,
}

/// A thread-safe in-memory library store.
///
/// `Clone` shares the underlying state, so a test can hold a handle onto the
/// same store it boxed into the engine. Books keep insertion order; ids are
/// assigned sequentially starting at 1.
#[derive(Default, Clone)]
pub struct InMemoryLibraryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryLibraryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn summarize(record: &BorrowRecord, books: &[Book], today: chrono::NaiveDate) -> LoanSummary {
    let book = books.iter().find(|b| b.id == record.book_id);
    LoanSummary {
        book_id: record.book_id,
        title: book.map(|b| b.title.clone()).unwrap_or_default(),
        author: book.map(|b| b.author.clone()).unwrap_or_default(),
        borrowed_at: Some(record.borrowed_at),
        due_at: record.due_at,
        // A loan with no due date is never flagged overdue.
        is_overdue: record.due_at.is_some_and(|due| due.date() < today),
    }
}

#[async_trait]
impl LibraryStore for InMemoryLibraryStore {
    async fn book_by_id(&self, book_id: u32) -> Result<Option<Book>> {
        let state = self.state.read().await;
        Ok(state.books.iter().find(|b| b.id == book_id).cloned())
    }

    async fn book_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>> {
        let state = self.state.read().await;
        Ok(state.books.iter().find(|b| &b.isbn == isbn).cloned())
    }

    async fn all_books(&self) -> Result<Vec<Book>> {
        let state = self.state.read().await;
        Ok(state.books.clone())
    }

    async fn active_borrow_count(&self, patron_id: &PatronId) -> Result<u32> {
        let state = self.state.read().await;
        let count = state
            .loans
            .iter()
            .filter(|l| l.is_active() && &l.patron_id == patron_id)
            .count();
        Ok(count as u32)
    }

    async fn borrowed_books(&self, patron_id: &PatronId) -> Result<Vec<LoanSummary>> {
        let state = self.state.read().await;
        let today = Local::now().date_naive();
        Ok(state
            .loans
            .iter()
            .filter(|l| l.is_active() && &l.patron_id == patron_id)
            .map(|l| summarize(l, &state.books, today))
            .collect())
    }

    async fn insert_book(&self, new: NewBook) -> Result<bool> {
        let mut state = self.state.write().await;
        state.next_book_id += 1;
        let id = state.next_book_id;
        state.books.push(Book::from_new(id, new));
        Ok(true)
    }

    async fn insert_borrow_record(&self, record: BorrowRecord) -> Result<bool> {
        let mut state = self.state.write().await;
        state.loans.push(record);
        Ok(true)
    }

    async fn adjust_availability(&self, book_id: u32, delta: i32) -> Result<bool> {
        let mut state = self.state.write().await;
        let Some(book) = state.books.iter_mut().find(|b| b.id == book_id) else {
            return Ok(false);
        };
        let adjusted = book.available_copies as i64 + delta as i64;
        if adjusted < 0 || adjusted > book.total_copies as i64 {
            return Ok(false);
        }
        book.available_copies = adjusted as u32;
        Ok(true)
    }

    async fn mark_returned(
        &self,
        patron_id: &PatronId,
        book_id: u32,
        returned_at: NaiveDateTime,
    ) -> Result<bool> {
        let mut state = self.state.write().await;
        let latest = state
            .loans
            .iter_mut()
            .filter(|l| l.is_active() && &l.patron_id == patron_id && l.book_id == book_id)
            .max_by_key(|l| l.borrowed_at);
        match latest {
            Some(record) => {
                record.state = LoanState::Returned(returned_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
