//! Chunked directory scan.
//!
//! A scan session snapshots the folder's file list once, then chunk requests
//! slice that snapshot. Slicing a stable snapshot instead of re-walking the
//! directory per chunk means a directory that changes mid-scan can no longer
//! skip or duplicate files. Per-file failures are collected, never fatal; a
//! session aborts only once its accumulated error count passes the
//! configured budget.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{Fahrplan, PdfStatus, ScanFileError};
use crate::parser::{parse_filename, validity_for_folder, LineMapping, ParseError};
use crate::repository::{DbError, FahrplanRepository};
use crate::tags::{extract_tags, ExclusionList};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("folder not found: {0}")]
    FolderNotFound(PathBuf),

    #[error("invalid folder or path: {0}")]
    InvalidPath(String),

    #[error("unknown scan session: {0}")]
    SessionNotFound(Uuid),

    #[error("chunk index {index} out of range (total {total})")]
    ChunkOutOfRange { index: usize, total: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// One PDF in a scan snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ScanFile {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Path relative to the base directory, stored on the record.
    pub pdf_pfad: String,
    pub dateiname: String,
    /// Region subfolder, empty for PDFs directly under the year folder.
    pub region: String,
}

/// Server-held scan session: the snapshot plus the running error budget.
#[derive(Debug)]
pub struct ScanSession {
    pub id: Uuid,
    pub folder: String,
    pub files: Vec<ScanFile>,
    pub chunk_size: usize,
    pub error_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Sessions older than this are swept whenever a new scan starts, so an
/// abandoned client cannot pin its snapshot for the life of the process.
pub const SESSION_TTL_SECS: i64 = 3600;

impl ScanSession {
    pub fn total_chunks(&self) -> usize {
        self.files.len().div_ceil(self.chunk_size)
    }

    /// The slice of the snapshot covered by one chunk index.
    pub fn chunk_files(&self, index: usize) -> &[ScanFile] {
        let start = index * self.chunk_size;
        let end = (start + self.chunk_size).min(self.files.len());
        &self.files[start..end]
    }

    pub fn expired(&self, now: DateTime<Utc>) -> bool {
        (now - self.created_at).num_seconds() >= SESSION_TTL_SECS
    }
}

/// Result of processing one chunk.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChunkOutcome {
    pub chunk_index: usize,
    pub imported: u64,
    pub skipped: u64,
    pub errors: Vec<ScanFileError>,
    /// Imported count per region within this chunk.
    pub regions: BTreeMap<String, u64>,
    /// Set once the session's error budget is exhausted; the client should
    /// stop requesting further chunks.
    pub aborted: bool,
}

/// Everything a chunk needs, loaded immutably at the start of the operation.
pub struct ScanContext<'a> {
    pub repo: &'a FahrplanRepository,
    pub mapping: &'a LineMapping,
    pub exclusion: &'a ExclusionList,
    pub max_errors: usize,
}

/// Reject folder names that would escape the base directory.
fn validate_folder_name(folder: &str) -> Result<(), ScanError> {
    if folder.is_empty()
        || folder.contains('/')
        || folder.contains('\\')
        || folder.contains("..")
    {
        return Err(ScanError::InvalidPath(folder.to_string()));
    }
    Ok(())
}

fn is_pdf(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

/// Enumerate all PDFs of a year folder: direct children plus one level of
/// region subfolders, sorted by (region, filename) for a deterministic order.
pub fn enumerate_pdfs(base_dir: &Path, folder: &str) -> Result<Vec<ScanFile>, ScanError> {
    validate_folder_name(folder)?;
    let root = base_dir.join(folder);
    if !root.is_dir() {
        return Err(ScanError::FolderNotFound(root));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(&root)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        let path = entry.path();

        if path.is_file() && is_pdf(&name) {
            files.push(ScanFile {
                pdf_pfad: format!("{}/{}", folder, name),
                dateiname: name,
                region: String::new(),
                path,
            });
        } else if path.is_dir() {
            for sub in fs::read_dir(&path)? {
                let sub = sub?;
                let sub_name = sub.file_name().to_string_lossy().to_string();
                let sub_path = sub.path();
                if sub_path.is_file() && is_pdf(&sub_name) {
                    files.push(ScanFile {
                        pdf_pfad: format!("{}/{}/{}", folder, name, sub_name),
                        dateiname: sub_name,
                        region: name.clone(),
                        path: sub_path,
                    });
                }
            }
        }
    }

    files.sort_by(|a, b| (a.region.as_str(), a.dateiname.as_str()).cmp(&(b.region.as_str(), b.dateiname.as_str())));
    Ok(files)
}

/// Snapshot a folder into a new scan session.
pub fn start_session(base_dir: &Path, folder: &str, chunk_size: usize) -> Result<ScanSession, ScanError> {
    let files = enumerate_pdfs(base_dir, folder)?;
    let session = ScanSession {
        id: Uuid::new_v4(),
        folder: folder.to_string(),
        files,
        chunk_size: chunk_size.max(1),
        error_count: 0,
        created_at: Utc::now(),
    };
    info!(
        session = %session.id,
        folder,
        files = session.files.len(),
        chunks = session.total_chunks(),
        "scan session started"
    );
    Ok(session)
}

/// Process one chunk of a session.
///
/// Idempotent for an unchanged file set: already-imported files are counted
/// as skipped. A single file's failure is recorded and the chunk continues.
pub fn process_chunk(
    ctx: &ScanContext,
    session: &mut ScanSession,
    chunk_index: usize,
) -> Result<ChunkOutcome, ScanError> {
    let total = session.total_chunks();
    if chunk_index >= total {
        return Err(ScanError::ChunkOutOfRange {
            index: chunk_index,
            total,
        });
    }

    let outcome = process_files(
        ctx,
        &session.folder,
        session.chunk_files(chunk_index),
        chunk_index,
        session.error_count,
    )?;
    session.error_count += outcome.errors.len();
    Ok(outcome)
}

/// Process a detached slice of scan files.
///
/// The server copies the chunk out of its session before calling this, so no
/// session lock is held during PDF extraction and database work;
/// `prior_errors` carries the session's running error count into the budget
/// check and the caller adds `outcome.errors.len()` back afterwards.
pub fn process_files(
    ctx: &ScanContext,
    folder: &str,
    files: &[ScanFile],
    chunk_index: usize,
    prior_errors: usize,
) -> Result<ChunkOutcome, ScanError> {
    let mut outcome = ChunkOutcome {
        chunk_index,
        ..Default::default()
    };

    if prior_errors >= ctx.max_errors {
        outcome.aborted = true;
        return Ok(outcome);
    }

    for file in files {
        if ctx.repo.exists(&file.dateiname, folder, &file.region)? {
            outcome.skipped += 1;
            continue;
        }

        match import_file(ctx, folder, file, PdfStatus::Ok) {
            Ok(_) => {
                outcome.imported += 1;
                *outcome.regions.entry(file.region.clone()).or_insert(0) += 1;
            }
            Err(e) => {
                warn!(file = %file.dateiname, region = %file.region, error = %e, "file import failed");
                outcome.errors.push(ScanFileError::new(&file.dateiname, &file.region, e.to_string()));
                if prior_errors + outcome.errors.len() >= ctx.max_errors {
                    outcome.aborted = true;
                    break;
                }
            }
        }
    }

    Ok(outcome)
}

/// Why a single file could not be imported.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("already cataloged: {0}")]
    Duplicate(String),
}

fn import_file(
    ctx: &ScanContext,
    folder: &str,
    file: &ScanFile,
    status: PdfStatus,
) -> Result<Fahrplan, ImportError> {
    let parsed = parse_filename(&file.dateiname, ctx.mapping)?;
    let (gueltig_von, gueltig_bis) = validity_for_folder(folder);
    let tags = extract_tags(&file.path, ctx.exclusion);

    let mut fahrplan = Fahrplan::new(
        parsed.titel,
        parsed.linie_alt,
        parsed.linie_neu,
        gueltig_von,
        gueltig_bis,
        file.pdf_pfad.clone(),
        file.dateiname.clone(),
        folder.to_string(),
        file.region.clone(),
        tags,
    );
    fahrplan.pdf_status = status;
    fahrplan.id = ctx.repo.insert(&fahrplan)?;
    Ok(fahrplan)
}

/// Import a single PDF by its path relative to the base directory
/// (`<folder>/[<region>/]<file>.pdf`). The record is marked IMPORT to
/// distinguish it from scanned imports.
pub fn import_single(
    ctx: &ScanContext,
    base_dir: &Path,
    pdf_path: &str,
) -> Result<Fahrplan, ScanError> {
    let parts: Vec<&str> = pdf_path.split('/').filter(|p| !p.is_empty()).collect();
    let (folder, region, dateiname) = match parts.as_slice() {
        [folder, file] => (*folder, "", *file),
        [folder, region, file] => (*folder, *region, *file),
        _ => return Err(ScanError::InvalidPath(pdf_path.to_string())),
    };
    validate_folder_name(folder)?;
    if !region.is_empty() {
        validate_folder_name(region)?;
    }
    validate_folder_name(dateiname)?;
    if !is_pdf(dateiname) {
        return Err(ScanError::InvalidPath(pdf_path.to_string()));
    }

    let path = base_dir.join(folder).join(if region.is_empty() {
        PathBuf::from(dateiname)
    } else {
        PathBuf::from(region).join(dateiname)
    });
    if !path.is_file() {
        return Err(ScanError::FolderNotFound(path));
    }

    if ctx.repo.exists(dateiname, folder, region)? {
        return Err(ScanError::InvalidPath(format!(
            "already cataloged: {}",
            pdf_path
        )));
    }

    let file = ScanFile {
        path,
        pdf_pfad: pdf_path.trim_matches('/').to_string(),
        dateiname: dateiname.to_string(),
        region: region.to_string(),
    };
    import_file(ctx, folder, &file, PdfStatus::Import).map_err(|e| match e {
        ImportError::Db(db) => ScanError::Db(db),
        other => ScanError::InvalidPath(other.to_string()),
    })
}
