//! Search logging and statistics.
//!
//! Every frontend search is logged with its result count; the stats query
//! surfaces the most popular terms and the terms that found nothing (the
//! latter are candidates for new mapping entries or tag tuning).

use chrono::Utc;
use rusqlite::params;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::{connect, Result};

pub struct SearchLogRepository {
    db_path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchStats {
    pub total_searches: u64,
    pub top_terms: Vec<TermCount>,
    pub zero_hit_terms: Vec<TermCount>,
}

impl SearchLogRepository {
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
            "CREATE TABLE IF NOT EXISTS search_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                search_term TEXT NOT NULL,
                region TEXT NOT NULL DEFAULT '',
                result_count INTEGER NOT NULL,
                searched_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_search_log_term ON search_log(search_term);",
        )?;
        Ok(())
    }

    pub fn log(&self, term: &str, region: &str, result_count: u64) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO search_log (search_term, region, result_count, searched_at) \
             VALUES (?, ?, ?, ?)",
            params![term, region, result_count as i64, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn stats(&self, limit: usize) -> Result<SearchStats> {
        let conn = self.connect()?;
        let total: i64 = conn.query_row("SELECT COUNT(*) FROM search_log", [], |row| row.get(0))?;

        let mut stmt = conn.prepare(
            "SELECT search_term, COUNT(*) AS n FROM search_log \
             GROUP BY search_term ORDER BY n DESC LIMIT ?",
        )?;
        let top_terms = stmt
            .query_map(params![limit as i64], |row| {
                Ok(TermCount {
                    term: row.get(0)?,
                    count: row.get::<_, i64>(1)? as u64,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(
            "SELECT search_term, COUNT(*) AS n FROM search_log WHERE result_count = 0 \
             GROUP BY search_term ORDER BY n DESC LIMIT ?",
        )?;
        let zero_hit_terms = stmt
            .query_map(params![limit as i64], |row| {
                Ok(TermCount {
                    term: row.get(0)?,
                    count: row.get::<_, i64>(1)? as u64,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(SearchStats {
            total_searches: total as u64,
            top_terms,
            zero_hit_terms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn logs_and_aggregates() {
        let dir = tempdir().unwrap();
        let repo = SearchLogRepository::new(&dir.path().join("test.db")).unwrap();

        repo.log("villach", "kaernten", 3).unwrap();
        repo.log("villach", "", 2).unwrap();
        repo.log("nirgendwo", "", 0).unwrap();

        let stats = repo.stats(10).unwrap();
        assert_eq!(stats.total_searches, 3);
        assert_eq!(stats.top_terms[0].term, "villach");
        assert_eq!(stats.top_terms[0].count, 2);
        assert_eq!(stats.zero_hit_terms.len(), 1);
        assert_eq!(stats.zero_hit_terms[0].term, "nirgendwo");
    }
}
