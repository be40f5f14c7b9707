//! API Handlers
//!
//! HTTP request handlers for each file cache endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::cache::FileCache;
use crate::config::Config;
use crate::error::Result;
use crate::loader::FileLoader;
use crate::models::{ClearResponse, EvictResponse, HealthResponse, StatsResponse};

/// Application state shared across all handlers.
///
/// The loader holds the shared `FileCache`; the cache serializes access
/// internally, so handlers need no extra locking.
#[derive(Clone)]
pub struct AppState {
    /// Read-through file loader
    pub loader: FileLoader,
}

impl AppState {
    /// Creates a new AppState serving `root` through `cache`.
    pub fn new(root: impl Into<std::path::PathBuf>, cache: FileCache) -> Self {
        Self {
            loader: FileLoader::new(root, Arc::new(cache)),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        let cache = FileCache::from_config(&config.cache_config());
        Self::new(config.file_root.clone(), cache)
    }

    /// The shared file cache.
    pub fn cache(&self) -> &Arc<FileCache> {
        self.loader.cache()
    }
}

/// Handler for GET /files/*path
///
/// Serves a file's bytes, reading it from disk on a cache miss.
pub async fn get_file_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response> {
    let bytes = state.loader.load(&path).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        bytes,
    )
        .into_response())
}

/// Handler for DELETE /files/*path
///
/// Evicts one file from the cache. Evicting an uncached file succeeds with
/// `removed: false`.
pub async fn evict_file_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<EvictResponse>> {
    let removed = state.loader.evict(&path)?;

    Ok(Json(EvictResponse::new(
        path,
        removed.map(|bytes| bytes.len() as u64),
    )))
}

/// Handler for DELETE /cache
///
/// Drops every cached file.
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let dropped = state.cache().clear();

    Json(ClearResponse::new(dropped))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache();
    let stats = cache.stats();

    Json(StatsResponse::new(&stats, cache.max_payload_bytes()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
