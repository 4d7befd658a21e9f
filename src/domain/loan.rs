use crate::domain::patron::PatronId;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Standard loan period: due date is the borrow date plus 14 days.
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Maximum simultaneous active loans per patron (inclusive bound).
pub const MAX_ACTIVE_LOANS: u32 = 5;

/// Whether a loan is still out or has come back.
///
/// Row-state variant instead of a nullable return timestamp, so "active"
/// lookups are total over the type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LoanState {
    Active,
    Returned(NaiveDateTime),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowRecord {
    pub patron_id: PatronId,
    pub book_id: u32,
    pub borrowed_at: NaiveDateTime,
    /// Deserializes leniently: ISO-8601 datetime, bare `YYYY-MM-DD`, or
    /// (for anything unparseable) nothing at all.
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub due_at: Option<NaiveDateTime>,
    pub state: LoanState,
}

impl BorrowRecord {
    /// Opens a loan starting at `borrowed_at` with the standard due date.
    pub fn open(patron_id: PatronId, book_id: u32, borrowed_at: NaiveDateTime) -> Self {
        Self {
            patron_id,
            book_id,
            borrowed_at,
            due_at: Some(borrowed_at + Duration::days(LOAN_PERIOD_DAYS)),
            state: LoanState::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == LoanState::Active
    }
}

/// Read-model row for a patron's active loan, joined with catalog data.
/// `is_overdue` is computed by the store at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub book_id: u32,
    pub title: String,
    pub author: String,
    pub borrowed_at: Option<NaiveDateTime>,
    pub due_at: Option<NaiveDateTime>,
    pub is_overdue: bool,
}

/// Best-effort timestamp parse for due dates coming in as strings.
pub fn parse_lenient_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    None
}

fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_lenient_datetime))
}
