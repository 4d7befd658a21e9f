use crate::error::{LibraryError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Add,
    Borrow,
    Return,
    Fee,
    Search,
    Report,
    Pay,
    Refund,
}

/// One circulation command, as a row of the batch CSV.
///
/// Columns not used by an op stay empty:
///
/// ```text
/// op, patron, book, title, author, isbn, copies, term, field, tx, amount
/// ```
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Command {
    pub op: OpKind,
    #[serde(default)]
    pub patron: Option<String>,
    #[serde(default)]
    pub book: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub copies: Option<u32>,
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub tx: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
}

/// Reads circulation commands from a CSV source.
///
/// Wraps `csv::Reader` with whitespace trimming and flexible record lengths,
/// yielding a lazy iterator so large batches stream without being held in
/// memory.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LibraryError::from))
    }
}
