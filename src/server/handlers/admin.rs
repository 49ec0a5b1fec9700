//! Maintenance endpoints: database lifecycle, filesystem sync, tag
//! re-analysis and the staging-to-live publish.

use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;

use super::types::{ok, ApiResult};
use super::AppState;
use crate::tags::{extract_tags, ExclusionList};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn status(State(state): State<AppState>) -> ApiResult {
    let counts = state.repo.counts()?;
    let sessions = state.sessions.read().await.len();
    Ok(ok(json!({
        "schedules": counts,
        "active_scan_sessions": sessions,
    })))
}

pub async fn recreate_db(State(state): State<AppState>) -> ApiResult {
    state.repo.recreate()?;
    Ok(ok(json!({ "recreated": true })))
}

pub async fn clear_db(State(state): State<AppState>) -> ApiResult {
    let deleted = state.repo.clear()?;
    Ok(ok(json!({ "deleted": deleted })))
}

pub async fn sync_table(State(state): State<AppState>) -> ApiResult {
    let outcome = state.repo.sync(&state.settings.pdf_base_dir)?;
    Ok(ok(outcome))
}

pub async fn delete_missing(State(state): State<AppState>) -> ApiResult {
    let deleted = state.repo.delete_missing()?;
    Ok(ok(json!({ "deleted": deleted })))
}

pub async fn publish(State(state): State<AppState>) -> ApiResult {
    Ok(ok(state.repo.publish()?))
}

/// Re-run tag extraction for every cataloged PDF.
pub async fn analyze_all_tags(State(state): State<AppState>) -> ApiResult {
    let exclusion = ExclusionList::parse(&state.options.exclusion_words()?);

    let mut analyzed = 0u64;
    let mut tagged = 0u64;
    let mut unreadable = 0u64;
    for fahrplan in state.repo.get_all()? {
        analyzed += 1;
        let path = state.settings.pdf_base_dir.join(&fahrplan.pdf_pfad);
        if !path.is_file() {
            unreadable += 1;
            continue;
        }
        match extract_tags(&path, &exclusion) {
            Some(tags) => {
                state.repo.set_tags(fahrplan.id, Some(&tags))?;
                tagged += 1;
            }
            None => {
                state.repo.set_tags(fahrplan.id, None)?;
                unreadable += 1;
            }
        }
    }

    Ok(ok(json!({
        "analyzed": analyzed,
        "tagged": tagged,
        "unreadable": unreadable,
    })))
}
