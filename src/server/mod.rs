//! HTTP JSON API for the schedule catalog.
//!
//! Serves the admin operations (scan, CRUD, maintenance, settings) and the
//! read-only frontend search against the live table.

mod handlers;
mod routes;

pub use routes::create_router;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Settings;
use crate::repository::{FahrplanRepository, OptionsRepository, SearchLogRepository};
use crate::scan::ScanSession;

/// Shared state for the API server.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<FahrplanRepository>,
    pub options: Arc<OptionsRepository>,
    pub search_log: Arc<SearchLogRepository>,
    /// Active scan sessions, keyed by session id. Dropped on restart.
    pub sessions: Arc<RwLock<HashMap<Uuid, ScanSession>>>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let db_path = settings.db_path();
        Ok(Self {
            repo: Arc::new(FahrplanRepository::new(&db_path)?),
            options: Arc::new(OptionsRepository::new(&db_path)?),
            search_log: Arc::new(SearchLogRepository::new(&db_path)?),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            settings: Arc::new(settings.clone()),
        })
    }
}

/// Start the API server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
