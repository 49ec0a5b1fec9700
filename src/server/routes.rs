//! Router configuration for the API server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/status", get(handlers::status))
        // Chunked scan protocol
        .route("/api/scan/info", post(handlers::scan_info))
        .route("/api/scan/chunk", post(handlers::scan_chunk))
        .route("/api/scan/finish", post(handlers::scan_finish))
        .route("/api/import", post(handlers::import_single))
        // Schedule CRUD
        .route("/api/fahrplan", get(handlers::list_fahrplaene))
        .route(
            "/api/fahrplan/:id",
            get(handlers::get_fahrplan)
                .put(handlers::update_fahrplan)
                .delete(handlers::delete_fahrplan),
        )
        // Database maintenance
        .route("/api/db/recreate", post(handlers::recreate_db))
        .route("/api/db/clear", post(handlers::clear_db))
        .route("/api/sync", post(handlers::sync_table))
        .route("/api/missing/delete", post(handlers::delete_missing))
        .route("/api/publish", post(handlers::publish))
        .route("/api/tags/analyze", post(handlers::analyze_all_tags))
        // Settings texts
        .route(
            "/api/settings/exclusion-words",
            get(handlers::load_exclusion_words).put(handlers::save_exclusion_words),
        )
        .route(
            "/api/settings/line-mapping",
            get(handlers::load_line_mapping).put(handlers::save_line_mapping),
        )
        // Frontend search
        .route("/api/search", get(handlers::search))
        .route("/api/search/stats", get(handlers::search_stats))
        .route("/api/autocomplete", get(handlers::autocomplete))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
