//! Error types for the file cache
//!
//! Provides unified error handling using thiserror. A cache miss is never an
//! error: lookups return `Option`, and reaching capacity simply triggers
//! eviction.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache and its file-serving surface.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Empty key, negative configuration value or a path escaping the root
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Requested file does not exist on disk
    #[error("File not found: {0}")]
    NotFound(String),

    /// Reading a file failed for a reason other than absence
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the file cache.
pub type Result<T> = std::result::Result<T, CacheError>;
