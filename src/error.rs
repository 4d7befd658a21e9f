use thiserror::Error;

/// Errors surfaced by the lending policy engine.
///
/// Every variant's `Display` form is the human-readable message handed back
/// to the caller, so a `(false, message)` outcome is just `Err(e).to_string()`.
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("{0}")]
    Validation(String),
    #[error("Book not found.")]
    BookNotFound,
    #[error("This book is currently not available.")]
    BookUnavailable,
    #[error("You have reached the maximum borrowing limit of {0} books.")]
    BorrowLimitReached(u32),
    #[error("No active borrow record found for this patron/book.")]
    NoActiveBorrow,
    #[error("{0}")]
    Store(String),
    #[error("{0}")]
    Gateway(String),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    Rocks(#[from] rocksdb::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LibraryError>;
