use crate::domain::book::{Book, Isbn, NewBook};
use crate::domain::loan::{BorrowRecord, LoanState, LoanSummary};
use crate::domain::patron::PatronId;
use crate::domain::ports::LibraryStore;
use crate::error::{LibraryError, Result};
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for catalog rows, keyed by big-endian book id.
pub const CF_BOOKS: &str = "books";
/// Column Family for borrow records, keyed by a big-endian insertion sequence.
pub const CF_LOANS: &str = "loans";
/// Column Family for id/sequence counters.
pub const CF_META: &str = "meta";

const KEY_NEXT_BOOK_ID: &[u8] = b"next_book_id";
const KEY_NEXT_LOAN_SEQ: &[u8] = b"next_loan_seq";

/// A persistent library store backed by RocksDB.
///
/// Values are `serde_json`; keys are big-endian integers so iteration yields
/// insertion order. Writes are read-modify-write without a store-level
/// transaction, matching the single-process CLI usage.
///
/// `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDbLibraryStore {
    db: Arc<DB>,
}

impl RocksDbLibraryStore {
    /// Opens or creates a RocksDB instance at `path`, ensuring all three
    /// column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = vec![
            ColumnFamilyDescriptor::new(CF_BOOKS, Options::default()),
            ColumnFamilyDescriptor::new(CF_LOANS, Options::default()),
            ColumnFamilyDescriptor::new(CF_META, Options::default()),
        ];
        let db = DB::open_cf_descriptors(&opts, path, cfs)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| LibraryError::Store(format!("{name} column family not found")))
    }

    fn next_counter(&self, key: &[u8]) -> Result<u64> {
        let cf = self.cf(CF_META)?;
        let next = match self.db.get_cf(cf, key)? {
            Some(bytes) => {
                let arr: [u8; 8] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| LibraryError::Store("corrupt counter value".to_string()))?;
                u64::from_be_bytes(arr) + 1
            }
            None => 1,
        };
        self.db.put_cf(cf, key, next.to_be_bytes())?;
        Ok(next)
    }

    fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes)
            .map_err(|e| LibraryError::Store(format!("deserialization error: {e}")))
    }

    fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value)
            .map_err(|e| LibraryError::Store(format!("serialization error: {e}")))
    }

    fn books(&self) -> Result<Vec<Book>> {
        let cf = self.cf(CF_BOOKS)?;
        let mut books = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            books.push(Self::decode(&value)?);
        }
        Ok(books)
    }

    fn loans(&self) -> Result<Vec<(u64, BorrowRecord)>> {
        let cf = self.cf(CF_LOANS)?;
        let mut loans = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (key, value) = item?;
            let arr: [u8; 8] = key
                .as_ref()
                .try_into()
                .map_err(|_| LibraryError::Store("corrupt loan key".to_string()))?;
            loans.push((u64::from_be_bytes(arr), Self::decode(&value)?));
        }
        Ok(loans)
    }

    fn put_book(&self, book: &Book) -> Result<()> {
        let cf = self.cf(CF_BOOKS)?;
        self.db
            .put_cf(cf, book.id.to_be_bytes(), Self::encode(book)?)?;
        Ok(())
    }
}

#[async_trait]
impl LibraryStore for RocksDbLibraryStore {
    async fn book_by_id(&self, book_id: u32) -> Result<Option<Book>> {
        let cf = self.cf(CF_BOOKS)?;
        match self.db.get_cf(cf, book_id.to_be_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn book_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>> {
        Ok(self.books()?.into_iter().find(|b| &b.isbn == isbn))
    }

    async fn all_books(&self) -> Result<Vec<Book>> {
        self.books()
    }

    async fn active_borrow_count(&self, patron_id: &PatronId) -> Result<u32> {
        let count = self
            .loans()?
            .iter()
            .filter(|(_, l)| l.is_active() && &l.patron_id == patron_id)
            .count();
        Ok(count as u32)
    }

    async fn borrowed_books(&self, patron_id: &PatronId) -> Result<Vec<LoanSummary>> {
        let books = self.books()?;
        let today = Local::now().date_naive();
        Ok(self
            .loans()?
            .into_iter()
            .filter(|(_, l)| l.is_active() && &l.patron_id == patron_id)
            .map(|(_, l)| {
                let book = books.iter().find(|b| b.id == l.book_id);
                LoanSummary {
                    book_id: l.book_id,
                    title: book.map(|b| b.title.clone()).unwrap_or_default(),
                    author: book.map(|b| b.author.clone()).unwrap_or_default(),
                    borrowed_at: Some(l.borrowed_at),
                    due_at: l.due_at,
                    is_overdue: l.due_at.is_some_and(|due| due.date() < today),
                }
            })
            .collect())
    }

    async fn insert_book(&self, new: NewBook) -> Result<bool> {
        let id = self.next_counter(KEY_NEXT_BOOK_ID)? as u32;
        self.put_book(&Book::from_new(id, new))?;
        Ok(true)
    }

    async fn insert_borrow_record(&self, record: BorrowRecord) -> Result<bool> {
        let seq = self.next_counter(KEY_NEXT_LOAN_SEQ)?;
        let cf = self.cf(CF_LOANS)?;
        self.db
            .put_cf(cf, seq.to_be_bytes(), Self::encode(&record)?)?;
        Ok(true)
    }

    async fn adjust_availability(&self, book_id: u32, delta: i32) -> Result<bool> {
        let Some(mut book) = self.book_by_id(book_id).await? else {
            return Ok(false);
        };
        let adjusted = book.available_copies as i64 + delta as i64;
        if adjusted < 0 || adjusted > book.total_copies as i64 {
            return Ok(false);
        }
        book.available_copies = adjusted as u32;
        self.put_book(&book)?;
        Ok(true)
    }

    async fn mark_returned(
        &self,
        patron_id: &PatronId,
        book_id: u32,
        returned_at: NaiveDateTime,
    ) -> Result<bool> {
        let latest = self
            .loans()?
            .into_iter()
            .filter(|(_, l)| l.is_active() && &l.patron_id == patron_id && l.book_id == book_id)
            .max_by_key(|(_, l)| l.borrowed_at);
        let Some((seq, mut record)) = latest else {
            return Ok(false);
        };
        record.state = LoanState::Returned(returned_at);
        let cf = self.cf(CF_LOANS)?;
        self.db
            .put_cf(cf, seq.to_be_bytes(), Self::encode(&record)?)?;
        Ok(true)
    }
}
