use crate::domain::book::{Book, NewBook, SearchField};
use crate::domain::fee::{FeeQuote, FeeStatus, PaymentOutcome, REFUND_CEILING, RefundOutcome};
use crate::domain::loan::{BorrowRecord, LOAN_PERIOD_DAYS, LoanState, MAX_ACTIVE_LOANS};
use crate::domain::patron::{LoanEntry, PatronId, PatronReport, ReportStatus};
use crate::domain::ports::{LibraryStoreBox, PaymentGateway};
use crate::error::{LibraryError, Result};
use chrono::{Duration, Local};
use rust_decimal::Decimal;

/// The lending policy engine.
///
/// Each operation is a straight-line sequence: input validation, a handful of
/// store calls, result interpretation. Success messages come back as
/// `Ok(String)`; every failure's `Display` is the message for the caller.
/// The payment operations additionally take a gateway per call and never let
/// a gateway failure escape as an error.
pub struct LendingEngine {
    store: LibraryStoreBox,
}

impl LendingEngine {
    pub fn new(store: LibraryStoreBox) -> Self {
        Self { store }
    }

    /// Admits a book into the catalog. Validation order: title, author,
    /// ISBN, copies, then the duplicate-ISBN check against the store.
    pub async fn add_book(
        &self,
        title: &str,
        author: &str,
        isbn: &str,
        total_copies: u32,
    ) -> Result<String> {
        let new = NewBook::parse(title, author, isbn, total_copies)?;

        if self.store.book_by_isbn(&new.isbn).await?.is_some() {
            return Err(LibraryError::Validation(
                "A book with this ISBN already exists.".to_string(),
            ));
        }

        let title = new.title.clone();
        if !self.store.insert_book(new).await? {
            return Err(LibraryError::Store(
                "Database error occurred while adding the book.".to_string(),
            ));
        }

        Ok(format!(
            "Book \"{title}\" has been successfully added to the catalog."
        ))
    }

    /// Lends a copy of `book_id` to the patron: availability check, active-loan
    /// limit (5, inclusive), then the record insert and availability decrement.
    pub async fn borrow_book(&self, patron_id: &str, book_id: u32) -> Result<String> {
        let patron = PatronId::parse(patron_id)?;

        let book = self
            .store
            .book_by_id(book_id)
            .await?
            .ok_or(LibraryError::BookNotFound)?;
        if book.available_copies == 0 {
            return Err(LibraryError::BookUnavailable);
        }

        let active = self.store.active_borrow_count(&patron).await?;
        if active >= MAX_ACTIVE_LOANS {
            return Err(LibraryError::BorrowLimitReached(MAX_ACTIVE_LOANS));
        }

        let borrowed_at = Local::now().naive_local();
        let due_at = borrowed_at + Duration::days(LOAN_PERIOD_DAYS);
        let record = BorrowRecord {
            patron_id: patron,
            book_id,
            borrowed_at,
            due_at: Some(due_at),
            state: LoanState::Active,
        };

        if !self.store.insert_borrow_record(record).await? {
            return Err(LibraryError::Store(
                "Database error occurred while creating borrow record.".to_string(),
            ));
        }
        // The record insert is not rolled back if the decrement fails.
        if !self.store.adjust_availability(book_id, -1).await? {
            return Err(LibraryError::Store(
                "Database error occurred while updating book availability.".to_string(),
            ));
        }

        Ok(format!(
            "Successfully borrowed \"{}\". Due date: {}.",
            book.title,
            due_at.format("%Y-%m-%d")
        ))
    }

    /// Closes the most recent active loan for (patron, book) and restores a
    /// copy to the shelf.
    pub async fn return_book(&self, patron_id: &str, book_id: u32) -> Result<String> {
        let patron = PatronId::parse(patron_id)?;

        let returned_at = Local::now().naive_local();
        if !self
            .store
            .mark_returned(&patron, book_id, returned_at)
            .await?
        {
            return Err(LibraryError::NoActiveBorrow);
        }

        if !self.store.adjust_availability(book_id, 1).await? {
            return Err(LibraryError::Store(
                "Database error updating availability.".to_string(),
            ));
        }

        Ok("Book returned successfully.".to_string())
    }

    /// Quotes the late fee for the patron's active loan of `book_id`.
    /// Invalid inputs and missing records come back as zero quotes with the
    /// corresponding status, never as errors.
    pub async fn late_fee(&self, patron_id: &str, book_id: u32) -> Result<FeeQuote> {
        let Ok(patron) = PatronId::parse(patron_id) else {
            return Ok(FeeQuote::zero(FeeStatus::InvalidPatron));
        };

        let loans = self.store.borrowed_books(&patron).await?;
        let Some(loan) = loans.iter().find(|l| l.book_id == book_id) else {
            return Ok(FeeQuote::zero(FeeStatus::NoActiveBorrow));
        };
        let Some(due_at) = loan.due_at else {
            return Ok(FeeQuote::zero(FeeStatus::NoDueDate));
        };

        let today = Local::now().date_naive();
        let days_overdue = (today - due_at.date()).num_days();
        if days_overdue <= 0 {
            Ok(FeeQuote::zero(FeeStatus::Ok))
        } else {
            Ok(FeeQuote::overdue(days_overdue))
        }
    }

    /// Full catalog in insertion order, as rendered on the catalog page.
    pub async fn catalog(&self) -> Result<Vec<Book>> {
        self.store.all_books().await
    }

    /// Case-insensitive substring search over one catalog field, in the
    /// store's insertion order. A blank term never touches the store.
    pub async fn search(&self, term: &str, field: &str) -> Result<Vec<Book>> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let field = SearchField::from_name(field);
        let books = self.store.all_books().await?;
        Ok(books
            .into_iter()
            .filter(|book| field.value_of(book).to_lowercase().contains(&needle))
            .collect())
    }

    /// Status report for a patron: `None` for a malformed patron id (no store
    /// call), a populated report otherwise, even with zero active loans.
    pub async fn patron_report(&self, patron_id: &str) -> Result<Option<PatronReport>> {
        let Ok(patron) = PatronId::parse(patron_id) else {
            return Ok(None);
        };

        let loans = self.store.borrowed_books(&patron).await?;
        let currently_borrowed: Vec<LoanEntry> = loans
            .into_iter()
            .map(|loan| LoanEntry {
                book_id: loan.book_id,
                title: loan.title,
                author: loan.author,
                borrow_date: loan.borrowed_at.map(|ts| ts.date()),
                due_date: loan.due_at.map(|ts| ts.date()),
                is_overdue: loan.is_overdue,
            })
            .collect();

        let total_active = currently_borrowed.len();
        let overdue_count = currently_borrowed.iter().filter(|e| e.is_overdue).count();
        let status = if total_active > 0 {
            ReportStatus::Ok
        } else {
            ReportStatus::NoActiveBorrows
        };

        Ok(Some(PatronReport {
            patron_id: patron,
            currently_borrowed,
            total_active,
            overdue_count,
            status,
        }))
    }

    /// Settles the patron's current late fee through the gateway. The gateway
    /// is only contacted for a positive fee on a valid patron; its failures
    /// are folded into the outcome, never propagated.
    pub async fn pay_late_fee(
        &self,
        patron_id: &str,
        book_id: u32,
        gateway: &dyn PaymentGateway,
    ) -> Result<PaymentOutcome> {
        let quote = self.late_fee(patron_id, book_id).await?;
        if quote.status == FeeStatus::InvalidPatron {
            return Ok(PaymentOutcome::rejected("Invalid patron ID"));
        }
        if quote.fee_amount <= Decimal::ZERO {
            return Ok(PaymentOutcome::rejected("No fees due"));
        }

        match gateway.charge(quote.fee_amount).await {
            Ok(res) if res.success => Ok(PaymentOutcome::accepted(
                res.transaction_id.unwrap_or_default(),
            )),
            Ok(_) => Ok(PaymentOutcome::rejected("Payment declined")),
            Err(e) => Ok(PaymentOutcome::rejected(format!(
                "Payment gateway error: {e}"
            ))),
        }
    }

    /// Requests a refund of a prior late-fee charge. Amounts are capped by a
    /// fixed ceiling, independent of the original charge.
    pub async fn refund_late_fee(
        &self,
        transaction_id: &str,
        amount: Decimal,
        gateway: &dyn PaymentGateway,
    ) -> Result<RefundOutcome> {
        if transaction_id.trim().is_empty() {
            return Ok(RefundOutcome::rejected("Invalid transaction ID"));
        }
        if amount <= Decimal::ZERO || amount > REFUND_CEILING {
            return Ok(RefundOutcome::rejected("Invalid refund amount"));
        }

        match gateway.refund(transaction_id, amount).await {
            Ok(res) if res.success => Ok(RefundOutcome::accepted(res.refund_id.unwrap_or_default())),
            Ok(_) => Ok(RefundOutcome::rejected("Refund rejected")),
            Err(e) => Ok(RefundOutcome::rejected(format!("Gateway error: {e}"))),
        }
    }
}
