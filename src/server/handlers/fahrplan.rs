//! Schedule CRUD endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;

use super::types::{ok, ApiError, ApiResult};
use super::AppState;
use crate::repository::FahrplanUpdate;

pub async fn get_fahrplan(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult {
    let fahrplan = state
        .repo
        .get(id)?
        .ok_or_else(|| ApiError::not_found(format!("no schedule with id {}", id)))?;
    Ok(ok(fahrplan))
}

pub async fn update_fahrplan(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<FahrplanUpdate>,
) -> ApiResult {
    let updated = state.repo.update(id, &update)?;
    Ok(ok(updated))
}

pub async fn delete_fahrplan(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult {
    state.repo.delete(id)?;
    Ok(ok(json!({ "deleted": id })))
}

pub async fn list_fahrplaene(State(state): State<AppState>) -> ApiResult {
    Ok(ok(state.repo.get_all()?))
}
