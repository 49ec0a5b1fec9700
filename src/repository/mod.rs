//! Repository layer for SQLite persistence.
//!
//! Each repository owns the schema of its own tables and opens a fresh
//! connection per call; the database file is shared.

mod fahrplan;
mod options;
mod search_log;

pub use fahrplan::{FahrplanRepository, FahrplanUpdate, PublishOutcome, StatusCounts, SyncOutcome};
pub use options::{OptionsRepository, OPTION_EXCLUSION_WORDS, OPTION_LINE_MAPPING};
pub use search_log::{SearchLogRepository, SearchStats, TermCount};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("record not found: {0}")]
    NotFound(i64),
}

pub(crate) fn connect(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(conn)
}

/// Parse a datetime string from the database, defaulting to Unix epoch on error.
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Parse a `YYYY-MM-DD` date column, defaulting to the epoch date on error.
pub(crate) fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or(NaiveDate::default())
}
