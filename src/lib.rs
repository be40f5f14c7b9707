//! LFU File Cache - An in-memory cache of file contents
//!
//! Provides a generic LFU cache with sliding TTL expiration, a byte-budgeted
//! specialization for file payloads, and a small HTTP server that serves
//! files through it.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{FileCache, LfuCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use loader::FileLoader;
pub use tasks::spawn_cleanup_task;
