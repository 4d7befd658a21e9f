use crate::domain::book::Book;
use crate::error::Result;
use std::io::Write;

/// Writes the final catalog snapshot as CSV:
/// `id,title,author,isbn,total_copies,available_copies`.
pub struct CatalogWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CatalogWriter<W> {
    pub fn new(target: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(target),
        }
    }

    pub fn write_books(&mut self, books: Vec<Book>) -> Result<()> {
        for book in books {
            self.writer.serialize(book)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
