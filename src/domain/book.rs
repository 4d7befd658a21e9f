use crate::error::{LibraryError, Result};
use serde::{Deserialize, Serialize};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_AUTHOR_LEN: usize = 100;

/// A 13-digit ISBN.
///
/// Wrapper around `String` so the digit-string invariant is checked once,
/// at the edge, instead of in every policy function that touches it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Isbn(String);

impl Isbn {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.len() == 13 && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(LibraryError::Validation(
                "ISBN must be exactly 13 digits.".to_string(),
            ))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Isbn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Isbn {
    type Error = LibraryError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

/// A validated catalog entry that has not been assigned an id yet.
///
/// `parse` applies the admission checks in order, first failure wins, with
/// the exact messages the presentation layer flashes back to the librarian.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: Isbn,
    pub total_copies: u32,
}

impl NewBook {
    pub fn parse(title: &str, author: &str, isbn: &str, total_copies: u32) -> Result<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LibraryError::Validation("Title is required.".to_string()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(LibraryError::Validation(
                "Title must be less than 200 characters.".to_string(),
            ));
        }

        let author = author.trim();
        if author.is_empty() {
            return Err(LibraryError::Validation("Author is required.".to_string()));
        }
        if author.chars().count() > MAX_AUTHOR_LEN {
            return Err(LibraryError::Validation(
                "Author must be less than 100 characters.".to_string(),
            ));
        }

        let isbn = Isbn::parse(isbn)?;

        if total_copies == 0 {
            return Err(LibraryError::Validation(
                "Total copies must be a positive integer.".to_string(),
            ));
        }

        Ok(Self {
            title: title.to_string(),
            author: author.to_string(),
            isbn,
            total_copies,
        })
    }
}

/// A catalog row as stored. `available_copies` stays within
/// `0..=total_copies`; the store's availability adjustment guards the bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: u32,
    pub title: String,
    pub author: String,
    pub isbn: Isbn,
    pub total_copies: u32,
    pub available_copies: u32,
}

impl Book {
    /// Materializes a new catalog entry: every copy starts available.
    pub fn from_new(id: u32, new: NewBook) -> Self {
        Self {
            id,
            title: new.title,
            author: new.author,
            isbn: new.isbn,
            total_copies: new.total_copies,
            available_copies: new.total_copies,
        }
    }
}

/// The searchable catalog fields. Anything unrecognized falls back to title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
    Isbn,
}

impl SearchField {
    pub fn from_name(name: &str) -> Self {
        match name {
            "author" => Self::Author,
            "isbn" => Self::Isbn,
            _ => Self::Title,
        }
    }

    pub fn value_of<'a>(&self, book: &'a Book) -> &'a str {
        match self {
            Self::Title => &book.title,
            Self::Author => &book.author,
            Self::Isbn => book.isbn.as_str(),
        }
    }
}
