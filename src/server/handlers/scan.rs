//! Chunked-scan endpoints.
//!
//! The client drives the protocol: `info` snapshots the folder into a
//! session, `chunk` processes one slice at a time, `finish` drops the
//! session. Cancellation is simply the client not asking for the next chunk.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use super::types::{ok, ApiError, ApiResult};
use super::AppState;
use crate::parser::LineMapping;
use crate::scan::{self, ScanContext, ScanError};
use crate::tags::ExclusionList;

#[derive(Debug, Deserialize)]
pub struct ScanInfoRequest {
    pub folder: String,
    pub chunk_size: Option<usize>,
}

pub async fn scan_info(
    State(state): State<AppState>,
    Json(req): Json<ScanInfoRequest>,
) -> ApiResult {
    let chunk_size = req.chunk_size.unwrap_or(state.settings.chunk_size);
    let session = scan::start_session(&state.settings.pdf_base_dir, &req.folder, chunk_size)?;

    let info = json!({
        "session_id": session.id,
        "folder": session.folder,
        "total_files": session.files.len(),
        "chunk_size": session.chunk_size,
        "total_chunks": session.total_chunks(),
    });

    let mut sessions = state.sessions.write().await;
    // Abandoned sessions never see a finish request; sweep them here so the
    // map stays bounded.
    let now = Utc::now();
    sessions.retain(|_, s| !s.expired(now));
    sessions.insert(session.id, session);
    Ok(ok(info))
}

#[derive(Debug, Deserialize)]
pub struct ScanChunkRequest {
    pub session_id: Uuid,
    pub chunk_index: usize,
}

pub async fn scan_chunk(
    State(state): State<AppState>,
    Json(req): Json<ScanChunkRequest>,
) -> ApiResult {
    // Settings texts are re-read per chunk so an admin edit mid-scan applies
    // to subsequent chunks without restart.
    let mapping = LineMapping::parse(&state.options.line_mapping()?);
    let exclusion = ExclusionList::parse(&state.options.exclusion_words()?);

    // Copy the chunk out under a short read lock; PDF extraction and the
    // per-file database work must not block the rest of the API.
    let (folder, files, prior_errors) = {
        let sessions = state.sessions.read().await;
        let session = sessions
            .get(&req.session_id)
            .ok_or_else(|| ApiError::from(ScanError::SessionNotFound(req.session_id)))?;
        let total = session.total_chunks();
        if req.chunk_index >= total {
            return Err(ScanError::ChunkOutOfRange {
                index: req.chunk_index,
                total,
            }
            .into());
        }
        (
            session.folder.clone(),
            session.chunk_files(req.chunk_index).to_vec(),
            session.error_count,
        )
    };

    let repo = Arc::clone(&state.repo);
    let max_errors = state.settings.max_scan_errors;
    let chunk_index = req.chunk_index;
    let outcome = tokio::task::spawn_blocking(move || {
        let ctx = ScanContext {
            repo: &repo,
            mapping: &mapping,
            exclusion: &exclusion,
            max_errors,
        };
        scan::process_files(&ctx, &folder, &files, chunk_index, prior_errors)
    })
    .await
    .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))??;

    if !outcome.errors.is_empty() {
        if let Some(session) = state.sessions.write().await.get_mut(&req.session_id) {
            session.error_count += outcome.errors.len();
        }
    }
    Ok(ok(outcome))
}

#[derive(Debug, Deserialize)]
pub struct ScanFinishRequest {
    pub session_id: Uuid,
}

pub async fn scan_finish(
    State(state): State<AppState>,
    Json(req): Json<ScanFinishRequest>,
) -> ApiResult {
    let removed = state.sessions.write().await.remove(&req.session_id);
    Ok(ok(json!({ "closed": removed.is_some() })))
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub pdf_path: String,
}

/// Manual single-file import, outside any scan session.
pub async fn import_single(
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> ApiResult {
    let mapping = LineMapping::parse(&state.options.line_mapping()?);
    let exclusion = ExclusionList::parse(&state.options.exclusion_words()?);
    let ctx = ScanContext {
        repo: &state.repo,
        mapping: &mapping,
        exclusion: &exclusion,
        max_errors: state.settings.max_scan_errors,
    };
    let fahrplan = scan::import_single(&ctx, &state.settings.pdf_base_dir, &req.pdf_path)?;
    Ok(ok(fahrplan))
}
