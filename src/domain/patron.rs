use crate::error::{LibraryError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A library member identifier: exactly 6 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatronId(String);

impl PatronId {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.len() == 6 && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(LibraryError::Validation(
                "Invalid patron ID. Must be exactly 6 digits.".to_string(),
            ))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PatronId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for PatronId {
    type Error = LibraryError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "No active borrows")]
    NoActiveBorrows,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => f.write_str("OK"),
            Self::NoActiveBorrows => f.write_str("No active borrows"),
        }
    }
}

/// One line of a patron's status report. Dates serialize as `YYYY-MM-DD`
/// or null when the underlying record carries none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanEntry {
    pub book_id: u32,
    pub title: String,
    pub author: String,
    pub borrow_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub is_overdue: bool,
}

/// Snapshot of a patron's active loans. The overdue tally comes from the
/// store's precomputed flags, not a fresh date comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatronReport {
    pub patron_id: PatronId,
    pub currently_borrowed: Vec<LoanEntry>,
    pub total_active: usize,
    pub overdue_count: usize,
    pub status: ReportStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patron_id_accepts_6_digits() {
        assert_eq!(PatronId::parse("100001").unwrap().as_str(), "100001");
    }

    #[test]
    fn test_patron_id_rejects_bad_formats() {
        for raw in ["", "12345", "1234567", "12a456", "12 456"] {
            let err = PatronId::parse(raw).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Invalid patron ID. Must be exactly 6 digits.",
                "raw: {raw:?}"
            );
        }
    }

    #[test]
    fn test_report_status_serializes_as_display_strings() {
        assert_eq!(
            serde_json::to_value(ReportStatus::Ok).unwrap(),
            serde_json::json!("OK")
        );
        assert_eq!(
            serde_json::to_value(ReportStatus::NoActiveBorrows).unwrap(),
            serde_json::json!("No active borrows")
        );
    }

    #[test]
    fn test_loan_entry_dates_serialize_iso_or_null() {
        let entry = LoanEntry {
            book_id: 1,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            borrow_date: NaiveDate::from_ymd_opt(2026, 8, 1),
            due_date: None,
            is_overdue: false,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["borrow_date"], serde_json::json!("2026-08-01"));
        assert_eq!(value["due_date"], serde_json::Value::Null);
    }
}
