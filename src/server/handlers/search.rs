//! Frontend search endpoints, read-only against the live table.

use axum::extract::{Query, State};
use serde::Deserialize;

use super::types::{ok, ApiResult};
use super::AppState;
use crate::parser::LineMapping;

/// Hard cap regardless of what the client asks for.
const MAX_RESULTS: usize = 500;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub region: Option<String>,
    pub limit: Option<usize>,
}

pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> ApiResult {
    let query = params.q.trim();
    if query.is_empty() {
        return Ok(ok(Vec::<crate::models::Fahrplan>::new()));
    }

    // A legacy or current line number also matches through the mapping table,
    // so searching "5000" finds the schedule cataloged as line 100. Expanded
    // terms match the designation fields token-exactly; only the raw query
    // substring-matches title, tags and filename.
    let mapping = LineMapping::parse(&state.options.line_mapping()?);
    let mut line_terms = vec![query.to_string()];
    if let Some(old) = mapping.lookup(query) {
        line_terms.push(old.to_string());
    }
    if let Some(new) = mapping.lookup_old(query) {
        line_terms.push(new.to_string());
    }

    let region = params.region.as_deref().filter(|r| !r.is_empty());
    let limit = params
        .limit
        .unwrap_or(state.settings.max_search_results)
        .min(MAX_RESULTS);
    let hits = state.repo.search(region, query, &line_terms, limit)?;

    if let Err(e) = state
        .search_log
        .log(query, region.unwrap_or(""), hits.len() as u64)
    {
        tracing::warn!(error = %e, "failed to log search");
    }

    Ok(ok(hits))
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteParams {
    pub term: String,
}

pub async fn autocomplete(
    State(state): State<AppState>,
    Query(params): Query<AutocompleteParams>,
) -> ApiResult {
    let term = params.term.trim();
    if term.is_empty() {
        return Ok(ok(Vec::<String>::new()));
    }
    Ok(ok(state.repo.autocomplete(term, 20)?))
}

pub async fn search_stats(State(state): State<AppState>) -> ApiResult {
    Ok(ok(state.search_log.stats(20)?))
}
