//! Key/value options storage.
//!
//! Holds the two admin-edited free-text settings: the tag exclusion words and
//! the line-number mapping. Parsing happens at use time, so the raw text is
//! always preserved exactly as entered.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use std::path::{Path, PathBuf};

use super::{connect, Result};

pub const OPTION_EXCLUSION_WORDS: &str = "exclusion_words";
pub const OPTION_LINE_MAPPING: &str = "line_mapping";

pub struct OptionsRepository {
    db_path: PathBuf,
}

impl OptionsRepository {
    pub fn new(db_path: &Path) -> Result<Self> {
        let repo = Self {
            db_path: db_path.to_path_buf(),
        };
        repo.init_schema()?;
        Ok(repo)
    }

    fn connect(&self) -> Result<rusqlite::Connection> {
        connect(&self.db_path)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS options (
                name TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Option<String>> {
        let conn = self.connect()?;
        let value = conn
            .query_row(
                "SELECT value FROM options WHERE name = ?",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO options (name, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![name, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// The raw exclusion-word text, empty if never configured.
    pub fn exclusion_words(&self) -> Result<String> {
        Ok(self.get(OPTION_EXCLUSION_WORDS)?.unwrap_or_default())
    }

    /// The raw line-mapping text, empty if never configured.
    pub fn line_mapping(&self) -> Result<String> {
        Ok(self.get(OPTION_LINE_MAPPING)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn set_and_get_roundtrip() {
        let dir = tempdir().unwrap();
        let repo = OptionsRepository::new(&dir.path().join("test.db")).unwrap();

        assert_eq!(repo.get(OPTION_LINE_MAPPING).unwrap(), None);
        assert_eq!(repo.line_mapping().unwrap(), "");

        repo.set(OPTION_LINE_MAPPING, "100:5000").unwrap();
        assert_eq!(repo.line_mapping().unwrap(), "100:5000");

        // Overwrite
        repo.set(OPTION_LINE_MAPPING, "100:5000\nX2:SB2").unwrap();
        assert_eq!(repo.line_mapping().unwrap(), "100:5000\nX2:SB2");
    }
}
