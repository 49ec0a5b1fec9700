//! JSON envelope shared by all API handlers.
//!
//! Every response is `{"success": true, "data": ...}` or
//! `{"success": false, "message": ...}` with a matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::repository::DbError;
use crate::scan::ScanError;

pub type ApiResult = Result<Response, ApiError>;

pub fn ok<T: Serialize>(data: T) -> Response {
    Json(json!({ "success": true, "data": data })).into_response()
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "success": false, "message": self.message })),
        )
            .into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(_) => Self::not_found(e.to_string()),
            DbError::Sqlite(_) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    }
}

impl From<ScanError> for ApiError {
    fn from(e: ScanError) -> Self {
        let status = match &e {
            ScanError::FolderNotFound(_) | ScanError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ScanError::InvalidPath(_) | ScanError::ChunkOutOfRange { .. } => {
                StatusCode::BAD_REQUEST
            }
            ScanError::Io(_) | ScanError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}
