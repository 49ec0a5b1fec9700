//! Schedule repository: staging-table CRUD, filesystem sync and the
//! staging-to-live publish step.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, OptionalExtension, Row, ToSql};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{connect, parse_date, parse_datetime, DbError, Result};
use crate::models::{Fahrplan, PdfStatus};

/// SQLite-backed schedule repository.
///
/// Scans import into the staging table `fahrplaene`; the public search reads
/// `fahrplaene_live`, which is only touched by `publish`.
pub struct FahrplanRepository {
    db_path: PathBuf,
}

/// Partial update for admin edits; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct FahrplanUpdate {
    pub titel: Option<String>,
    pub linie_alt: Option<String>,
    pub linie_neu: Option<String>,
    pub kurzbeschreibung: Option<String>,
    pub gueltig_von: Option<NaiveDate>,
    pub gueltig_bis: Option<NaiveDate>,
    pub region: Option<String>,
    pub tags: Option<String>,
}

/// Result of a filesystem sync pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncOutcome {
    pub checked: u64,
    pub marked_missing: u64,
    pub restored: u64,
}

/// Result of publishing staging to live.
#[derive(Debug, Clone, Serialize)]
pub struct PublishOutcome {
    pub published: u64,
    pub backed_up: u64,
}

/// Record counts for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StatusCounts {
    pub total: u64,
    pub ok: u64,
    pub missing: u64,
    pub import: u64,
    pub live: u64,
}

const FAHRPLAN_COLUMNS: &str = "id, titel, linie_alt, linie_neu, kurzbeschreibung, gueltig_von, \
     gueltig_bis, pdf_pfad, dateiname, jahr, region, tags, pdf_status, created_at, updated_at";

impl FahrplanRepository {
    /// Create a new repository, initializing the schema if needed.
    pub fn new(db_path: &Path) -> Result<Self> {
        let repo = Self {
            db_path: db_path.to_path_buf(),
        };
        repo.init_schema()?;
        Ok(repo)
    }

    pub(crate) fn connect(&self) -> Result<rusqlite::Connection> {
        connect(&self.db_path)
    }

    /// Initialize the staging and live tables.
    pub fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS fahrplaene (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                titel TEXT NOT NULL,
                linie_alt TEXT NOT NULL DEFAULT '',
                linie_neu TEXT NOT NULL DEFAULT '',
                kurzbeschreibung TEXT NOT NULL DEFAULT '',
                gueltig_von TEXT NOT NULL,
                gueltig_bis TEXT NOT NULL,
                pdf_pfad TEXT NOT NULL,
                dateiname TEXT NOT NULL,
                jahr TEXT NOT NULL,
                region TEXT NOT NULL DEFAULT '',
                tags TEXT,
                pdf_status TEXT NOT NULL DEFAULT 'OK',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS fahrplaene_live (
                id INTEGER PRIMARY KEY,
                titel TEXT NOT NULL,
                linie_alt TEXT NOT NULL DEFAULT '',
                linie_neu TEXT NOT NULL DEFAULT '',
                kurzbeschreibung TEXT NOT NULL DEFAULT '',
                gueltig_von TEXT NOT NULL,
                gueltig_bis TEXT NOT NULL,
                pdf_pfad TEXT NOT NULL,
                dateiname TEXT NOT NULL,
                jahr TEXT NOT NULL,
                region TEXT NOT NULL DEFAULT '',
                tags TEXT,
                pdf_status TEXT NOT NULL DEFAULT 'OK',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_fahrplaene_identity
                ON fahrplaene(dateiname, jahr, region);
            CREATE INDEX IF NOT EXISTS idx_fahrplaene_region
                ON fahrplaene(region);
            CREATE INDEX IF NOT EXISTS idx_fahrplaene_status
                ON fahrplaene(pdf_status);
            CREATE INDEX IF NOT EXISTS idx_live_region
                ON fahrplaene_live(region);
            CREATE INDEX IF NOT EXISTS idx_live_linie_neu
                ON fahrplaene_live(linie_neu);
            "#,
        )?;
        Ok(())
    }

    /// Insert a new schedule. The UNIQUE index on (dateiname, jahr, region)
    /// rejects duplicates that race past the advisory `exists` check.
    pub fn insert(&self, fahrplan: &Fahrplan) -> Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO fahrplaene (titel, linie_alt, linie_neu, kurzbeschreibung, gueltig_von, \
             gueltig_bis, pdf_pfad, dateiname, jahr, region, tags, pdf_status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                fahrplan.titel,
                fahrplan.linie_alt,
                fahrplan.linie_neu,
                fahrplan.kurzbeschreibung,
                fahrplan.gueltig_von.to_string(),
                fahrplan.gueltig_bis.to_string(),
                fahrplan.pdf_pfad,
                fahrplan.dateiname,
                fahrplan.jahr,
                fahrplan.region,
                fahrplan.tags,
                fahrplan.pdf_status.as_str(),
                fahrplan.created_at.to_rfc3339(),
                fahrplan.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a schedule by ID.
    pub fn get(&self, id: i64) -> Result<Option<Fahrplan>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM fahrplaene WHERE id = ?",
            FAHRPLAN_COLUMNS
        ))?;
        let fahrplan = stmt.query_row(params![id], row_to_fahrplan).optional()?;
        Ok(fahrplan)
    }

    /// All staging records, ordered deterministically.
    pub fn get_all(&self) -> Result<Vec<Fahrplan>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM fahrplaene ORDER BY jahr, region, dateiname",
            FAHRPLAN_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], row_to_fahrplan)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Advisory duplicate check by catalog identity.
    pub fn exists(&self, dateiname: &str, jahr: &str, region: &str) -> Result<bool> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM fahrplaene WHERE dateiname = ? AND jahr = ? AND region = ?",
            params![dateiname, jahr, region],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Apply an admin edit. Only the provided fields change.
    pub fn update(&self, id: i64, update: &FahrplanUpdate) -> Result<Fahrplan> {
        let von = update.gueltig_von.map(|d| d.to_string());
        let bis = update.gueltig_bis.map(|d| d.to_string());
        let now = Utc::now().to_rfc3339();

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<&dyn ToSql> = Vec::new();

        if let Some(ref v) = update.titel {
            sets.push("titel = ?");
            values.push(v);
        }
        if let Some(ref v) = update.linie_alt {
            sets.push("linie_alt = ?");
            values.push(v);
        }
        if let Some(ref v) = update.linie_neu {
            sets.push("linie_neu = ?");
            values.push(v);
        }
        if let Some(ref v) = update.kurzbeschreibung {
            sets.push("kurzbeschreibung = ?");
            values.push(v);
        }
        if let Some(ref v) = von {
            sets.push("gueltig_von = ?");
            values.push(v);
        }
        if let Some(ref v) = bis {
            sets.push("gueltig_bis = ?");
            values.push(v);
        }
        if let Some(ref v) = update.region {
            sets.push("region = ?");
            values.push(v);
        }
        if let Some(ref v) = update.tags {
            sets.push("tags = ?");
            values.push(v);
        }
        sets.push("updated_at = ?");
        values.push(&now);
        values.push(&id);

        let sql = format!("UPDATE fahrplaene SET {} WHERE id = ?", sets.join(", "));
        let conn = self.connect()?;
        let changed = conn.execute(&sql, &values[..])?;
        if changed == 0 {
            return Err(DbError::NotFound(id));
        }
        drop(conn);

        self.get(id)?.ok_or(DbError::NotFound(id))
    }

    /// Replace the tags column (used by re-analysis).
    pub fn set_tags(&self, id: i64, tags: Option<&str>) -> Result<()> {
        let conn = self.connect()?;
        let changed = conn.execute(
            "UPDATE fahrplaene SET tags = ?, updated_at = ? WHERE id = ?",
            params![tags, Utc::now().to_rfc3339(), id],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(id));
        }
        Ok(())
    }

    /// Mark a record's PDF status.
    pub fn set_status(&self, id: i64, status: PdfStatus) -> Result<()> {
        let conn = self.connect()?;
        let changed = conn.execute(
            "UPDATE fahrplaene SET pdf_status = ?, updated_at = ? WHERE id = ?",
            params![status.as_str(), Utc::now().to_rfc3339(), id],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(id));
        }
        Ok(())
    }

    /// Delete one schedule.
    pub fn delete(&self, id: i64) -> Result<()> {
        let conn = self.connect()?;
        let changed = conn.execute("DELETE FROM fahrplaene WHERE id = ?", params![id])?;
        if changed == 0 {
            return Err(DbError::NotFound(id));
        }
        Ok(())
    }

    /// Delete every record whose PDF went missing. Returns the count.
    pub fn delete_missing(&self) -> Result<u64> {
        let conn = self.connect()?;
        let deleted = conn.execute(
            "DELETE FROM fahrplaene WHERE pdf_status = ?",
            params![PdfStatus::Missing.as_str()],
        )?;
        Ok(deleted as u64)
    }

    /// Empty the staging table. Returns the count of deleted records.
    pub fn clear(&self) -> Result<u64> {
        let conn = self.connect()?;
        let deleted = conn.execute("DELETE FROM fahrplaene", [])?;
        Ok(deleted as u64)
    }

    /// Drop and recreate all schedule tables.
    pub fn recreate(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(
            "DROP TABLE IF EXISTS fahrplaene;
             DROP TABLE IF EXISTS fahrplaene_live;
             DROP TABLE IF EXISTS fahrplaene_backup;",
        )?;
        drop(conn);
        self.init_schema()
    }

    /// Refresh `pdf_status` against the filesystem.
    pub fn sync(&self, base_dir: &Path) -> Result<SyncOutcome> {
        let mut outcome = SyncOutcome::default();
        for fahrplan in self.get_all()? {
            outcome.checked += 1;
            let present = base_dir.join(&fahrplan.pdf_pfad).is_file();
            match (present, fahrplan.pdf_status) {
                (false, PdfStatus::Ok) | (false, PdfStatus::Import) => {
                    self.set_status(fahrplan.id, PdfStatus::Missing)?;
                    outcome.marked_missing += 1;
                }
                (true, PdfStatus::Missing) => {
                    self.set_status(fahrplan.id, PdfStatus::Ok)?;
                    outcome.restored += 1;
                }
                _ => {}
            }
        }
        info!(
            checked = outcome.checked,
            missing = outcome.marked_missing,
            restored = outcome.restored,
            "filesystem sync complete"
        );
        Ok(outcome)
    }

    /// Copy staging to live atomically, backing up the previous live table
    /// first. The copy and the backup happen in one transaction.
    pub fn publish(&self) -> Result<PublishOutcome> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        tx.execute_batch("DROP TABLE IF EXISTS fahrplaene_backup;")?;
        tx.execute_batch("CREATE TABLE fahrplaene_backup AS SELECT * FROM fahrplaene_live;")?;
        let backed_up: i64 =
            tx.query_row("SELECT COUNT(*) FROM fahrplaene_backup", [], |row| row.get(0))?;
        tx.execute("DELETE FROM fahrplaene_live", [])?;
        let published = tx.execute("INSERT INTO fahrplaene_live SELECT * FROM fahrplaene", [])?;
        tx.commit()?;

        info!(published, backed_up, "published staging to live");
        Ok(PublishOutcome {
            published: published as u64,
            backed_up: backed_up as u64,
        })
    }

    /// Search the live table. The free-text query substring-matches title,
    /// tags, filename and description; `line_terms` (the query plus its
    /// mapping expansions) match the comma-separated line designation fields
    /// token-exactly, so an expanded `100` does not also sweep up line `5100`.
    pub fn search(
        &self,
        region: Option<&str>,
        query: &str,
        line_terms: &[String],
        limit: usize,
    ) -> Result<Vec<Fahrplan>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let text_pattern = format!("%{}%", query);
        // Designation columns hold ", "-joined tokens; normalize the commas
        // and wrap so `%,100,%` hits the token 100 but not 5100.
        let token_patterns: Vec<String> = line_terms
            .iter()
            .map(|t| format!("%,{},%", t.replace(' ', "")))
            .collect();
        let limit = limit as i64;

        let mut clauses: Vec<&str> =
            vec!["(titel LIKE ? OR tags LIKE ? OR dateiname LIKE ? OR kurzbeschreibung LIKE ?)"];
        let mut values: Vec<&dyn ToSql> = Vec::new();
        for _ in 0..4 {
            values.push(&text_pattern);
        }
        for pattern in &token_patterns {
            clauses.push(
                "(',' || REPLACE(linie_neu, ' ', '') || ',' LIKE ? \
                 OR ',' || REPLACE(linie_alt, ' ', '') || ',' LIKE ?)",
            );
            values.push(pattern);
            values.push(pattern);
        }

        let mut sql = format!(
            "SELECT {} FROM fahrplaene_live WHERE ({})",
            FAHRPLAN_COLUMNS,
            clauses.join(" OR ")
        );
        if let Some(ref r) = region {
            sql.push_str(" AND region = ?");
            values.push(r);
        }
        sql.push_str(" ORDER BY linie_neu, titel LIMIT ?");
        values.push(&limit);

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(&values[..], row_to_fahrplan)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Prefix suggestions over live titles and line numbers.
    pub fn autocomplete(&self, term: &str, limit: usize) -> Result<Vec<String>> {
        let pattern = format!("{}%", term);
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT titel AS s FROM fahrplaene_live WHERE titel LIKE ?1
             UNION
             SELECT linie_neu FROM fahrplaene_live WHERE linie_neu LIKE ?1
             UNION
             SELECT linie_alt FROM fahrplaene_live WHERE linie_alt LIKE ?1
             ORDER BY s LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![pattern, limit as i64], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(rows.into_iter().filter(|s| !s.is_empty()).collect())
    }

    /// Record counts across staging and live.
    pub fn counts(&self) -> Result<StatusCounts> {
        let conn = self.connect()?;
        let count_status = |status: PdfStatus| -> Result<u64> {
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM fahrplaene WHERE pdf_status = ?",
                params![status.as_str()],
                |row| row.get(0),
            )?;
            Ok(n as u64)
        };
        let total: i64 = conn.query_row("SELECT COUNT(*) FROM fahrplaene", [], |row| row.get(0))?;
        let live: i64 =
            conn.query_row("SELECT COUNT(*) FROM fahrplaene_live", [], |row| row.get(0))?;
        Ok(StatusCounts {
            total: total as u64,
            ok: count_status(PdfStatus::Ok)?,
            missing: count_status(PdfStatus::Missing)?,
            import: count_status(PdfStatus::Import)?,
            live: live as u64,
        })
    }
}

fn row_to_fahrplan(row: &Row) -> rusqlite::Result<Fahrplan> {
    let status: String = row.get("pdf_status")?;
    let von: String = row.get("gueltig_von")?;
    let bis: String = row.get("gueltig_bis")?;
    let created: String = row.get("created_at")?;
    let updated: String = row.get("updated_at")?;
    Ok(Fahrplan {
        id: row.get("id")?,
        titel: row.get("titel")?,
        linie_alt: row.get("linie_alt")?,
        linie_neu: row.get("linie_neu")?,
        kurzbeschreibung: row.get("kurzbeschreibung")?,
        gueltig_von: parse_date(&von),
        gueltig_bis: parse_date(&bis),
        pdf_pfad: row.get("pdf_pfad")?,
        dateiname: row.get("dateiname")?,
        jahr: row.get("jahr")?,
        region: row.get("region")?,
        tags: row.get("tags")?,
        pdf_status: PdfStatus::from_str(&status).unwrap_or(PdfStatus::Missing),
        created_at: parse_datetime(&created),
        updated_at: parse_datetime(&updated),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn repo() -> (FahrplanRepository, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let repo = FahrplanRepository::new(&dir.path().join("test.db")).unwrap();
        (repo, dir)
    }

    fn sample(dateiname: &str, region: &str) -> Fahrplan {
        Fahrplan::new(
            "Villach \u{2014} Klagenfurt".to_string(),
            "5000".to_string(),
            "100".to_string(),
            NaiveDate::from_ymd_opt(2024, 12, 14).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 13).unwrap(),
            format!("2025/{}/{}", region, dateiname),
            dateiname.to_string(),
            "2025".to_string(),
            region.to_string(),
            Some("villach, klagenfurt".to_string()),
        )
    }

    #[test]
    fn insert_get_roundtrip() {
        let (repo, _dir) = repo();
        let id = repo.insert(&sample("100-villach-klagenfurt.pdf", "kaernten")).unwrap();
        let loaded = repo.get(id).unwrap().unwrap();
        assert_eq!(loaded.linie_neu, "100");
        assert_eq!(loaded.linie_alt, "5000");
        assert_eq!(loaded.gueltig_von, NaiveDate::from_ymd_opt(2024, 12, 14).unwrap());
        assert_eq!(loaded.pdf_status, PdfStatus::Ok);
    }

    #[test]
    fn exists_by_identity() {
        let (repo, _dir) = repo();
        repo.insert(&sample("100-villach.pdf", "kaernten")).unwrap();
        assert!(repo.exists("100-villach.pdf", "2025", "kaernten").unwrap());
        assert!(!repo.exists("100-villach.pdf", "2026", "kaernten").unwrap());
        assert!(!repo.exists("100-villach.pdf", "2025", "").unwrap());
    }

    #[test]
    fn duplicate_identity_is_rejected_by_the_database() {
        let (repo, _dir) = repo();
        repo.insert(&sample("100-villach.pdf", "kaernten")).unwrap();
        assert!(repo.insert(&sample("100-villach.pdf", "kaernten")).is_err());
    }

    #[test]
    fn partial_update_touches_only_given_fields() {
        let (repo, _dir) = repo();
        let id = repo.insert(&sample("100-villach.pdf", "kaernten")).unwrap();
        let updated = repo
            .update(
                id,
                &FahrplanUpdate {
                    kurzbeschreibung: Some("Schnellbus".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.kurzbeschreibung, "Schnellbus");
        assert_eq!(updated.linie_neu, "100");
    }

    #[test]
    fn update_missing_record_is_not_found() {
        let (repo, _dir) = repo();
        let result = repo.update(42, &FahrplanUpdate::default());
        assert!(matches!(result, Err(DbError::NotFound(42))));
    }

    #[test]
    fn delete_and_clear() {
        let (repo, _dir) = repo();
        let id = repo.insert(&sample("100-villach.pdf", "kaernten")).unwrap();
        repo.insert(&sample("200-graz.pdf", "steiermark")).unwrap();
        repo.delete(id).unwrap();
        assert!(repo.get(id).unwrap().is_none());
        assert_eq!(repo.clear().unwrap(), 1);
        assert!(repo.get_all().unwrap().is_empty());
    }

    #[test]
    fn delete_missing_only_removes_missing_records() {
        let (repo, _dir) = repo();
        let id = repo.insert(&sample("100-villach.pdf", "kaernten")).unwrap();
        repo.insert(&sample("200-graz.pdf", "steiermark")).unwrap();
        repo.set_status(id, PdfStatus::Missing).unwrap();
        assert_eq!(repo.delete_missing().unwrap(), 1);
        assert_eq!(repo.get_all().unwrap().len(), 1);
    }

    #[test]
    fn sync_marks_missing_and_restores() {
        let (repo, dir) = repo();
        let base = dir.path().join("pdfs");
        let pdf = base.join("2025/kaernten/100-villach.pdf");
        std::fs::create_dir_all(pdf.parent().unwrap()).unwrap();
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();

        let mut f = sample("100-villach.pdf", "kaernten");
        f.pdf_pfad = "2025/kaernten/100-villach.pdf".to_string();
        let id = repo.insert(&f).unwrap();

        let outcome = repo.sync(&base).unwrap();
        assert_eq!(outcome.marked_missing, 0);

        std::fs::remove_file(&pdf).unwrap();
        let outcome = repo.sync(&base).unwrap();
        assert_eq!(outcome.marked_missing, 1);
        assert_eq!(repo.get(id).unwrap().unwrap().pdf_status, PdfStatus::Missing);

        std::fs::write(&pdf, b"%PDF-1.4").unwrap();
        let outcome = repo.sync(&base).unwrap();
        assert_eq!(outcome.restored, 1);
        assert_eq!(repo.get(id).unwrap().unwrap().pdf_status, PdfStatus::Ok);
    }

    #[test]
    fn publish_copies_staging_to_live_with_backup() {
        let (repo, _dir) = repo();
        repo.insert(&sample("100-villach.pdf", "kaernten")).unwrap();
        let outcome = repo.publish().unwrap();
        assert_eq!(outcome.published, 1);
        assert_eq!(outcome.backed_up, 0);

        repo.insert(&sample("200-graz.pdf", "steiermark")).unwrap();
        let outcome = repo.publish().unwrap();
        assert_eq!(outcome.published, 2);
        assert_eq!(outcome.backed_up, 1);
        assert_eq!(repo.counts().unwrap().live, 2);
    }

    #[test]
    fn search_hits_live_table_only_after_publish() {
        let (repo, _dir) = repo();
        repo.insert(&sample("100-villach-klagenfurt.pdf", "kaernten")).unwrap();

        let line_terms = vec!["villach".to_string()];
        assert!(repo.search(None, "villach", &line_terms, 10).unwrap().is_empty());

        repo.publish().unwrap();
        let hits = repo.search(None, "villach", &line_terms, 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].linie_neu, "100");

        // Region filter
        assert!(repo.search(Some("steiermark"), "villach", &line_terms, 10).unwrap().is_empty());
        assert_eq!(repo.search(Some("kaernten"), "villach", &line_terms, 10).unwrap().len(), 1);
    }

    #[test]
    fn expanded_line_terms_match_tokens_not_substrings() {
        let (repo, _dir) = repo();
        repo.insert(&sample("100-villach.pdf", "kaernten")).unwrap();
        let mut other = sample("210-graz.pdf", "steiermark");
        other.titel = "Graz \u{2014} Leoben".to_string();
        other.linie_neu = "210".to_string();
        other.linie_alt = "5100".to_string();
        other.tags = Some("graz, leoben".to_string());
        repo.insert(&other).unwrap();
        repo.publish().unwrap();

        // "5000" expands to line 100; that must not also hit linie_alt 5100
        let line_terms = vec!["5000".to_string(), "100".to_string()];
        let hits = repo.search(None, "5000", &line_terms, 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].linie_neu, "100");
    }

    #[test]
    fn multi_designation_fields_match_per_token() {
        let (repo, _dir) = repo();
        let mut multi = sample("multi.pdf", "kaernten");
        multi.linie_neu = "100, 200".to_string();
        multi.linie_alt = String::new();
        repo.insert(&multi).unwrap();
        repo.publish().unwrap();

        let hits = repo.search(None, "200", &["200".to_string()], 10).unwrap();
        assert_eq!(hits.len(), 1);
        // A prefix of a token is not a token
        assert!(repo.search(None, "20", &["20".to_string()], 10).unwrap().is_empty());
    }

    #[test]
    fn autocomplete_suggests_titles_and_lines() {
        let (repo, _dir) = repo();
        repo.insert(&sample("100-villach-klagenfurt.pdf", "kaernten")).unwrap();
        repo.publish().unwrap();

        let suggestions = repo.autocomplete("Vill", 10).unwrap();
        assert!(suggestions.iter().any(|s| s.starts_with("Villach")));
        let suggestions = repo.autocomplete("10", 10).unwrap();
        assert!(suggestions.contains(&"100".to_string()));
    }

    #[test]
    fn recreate_drops_everything() {
        let (repo, _dir) = repo();
        repo.insert(&sample("100-villach.pdf", "kaernten")).unwrap();
        repo.publish().unwrap();
        repo.recreate().unwrap();
        let counts = repo.counts().unwrap();
        assert_eq!(counts.total, 0);
        assert_eq!(counts.live, 0);
    }
}
