//! Admin-edited settings texts: exclusion words and the line mapping.
//!
//! Saving reports how many entries actually parsed, so a typo-ridden paste is
//! visible immediately instead of silently shrinking the table.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use super::types::{ok, ApiResult};
use super::AppState;
use crate::parser::LineMapping;
use crate::repository::{OPTION_EXCLUSION_WORDS, OPTION_LINE_MAPPING};
use crate::tags::ExclusionList;

#[derive(Debug, Deserialize)]
pub struct ExclusionWordsRequest {
    pub exclusion_words: String,
}

pub async fn load_exclusion_words(State(state): State<AppState>) -> ApiResult {
    let text = state.options.exclusion_words()?;
    let parsed = ExclusionList::parse(&text);
    Ok(ok(json!({ "exclusion_words": text, "word_count": parsed.len() })))
}

pub async fn save_exclusion_words(
    State(state): State<AppState>,
    Json(req): Json<ExclusionWordsRequest>,
) -> ApiResult {
    state.options.set(OPTION_EXCLUSION_WORDS, &req.exclusion_words)?;
    let parsed = ExclusionList::parse(&req.exclusion_words);
    Ok(ok(json!({ "saved": true, "word_count": parsed.len() })))
}

#[derive(Debug, Deserialize)]
pub struct LineMappingRequest {
    pub line_mapping: String,
}

pub async fn load_line_mapping(State(state): State<AppState>) -> ApiResult {
    let text = state.options.line_mapping()?;
    let parsed = LineMapping::parse(&text);
    Ok(ok(json!({ "line_mapping": text, "entry_count": parsed.len() })))
}

pub async fn save_line_mapping(
    State(state): State<AppState>,
    Json(req): Json<LineMappingRequest>,
) -> ApiResult {
    state.options.set(OPTION_LINE_MAPPING, &req.line_mapping)?;
    let parsed = LineMapping::parse(&req.line_mapping);
    Ok(ok(json!({ "saved": true, "entry_count": parsed.len() })))
}
