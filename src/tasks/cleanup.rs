//! Expiry Sweep Task
//!
//! Background task that periodically prunes expired file cache entries so
//! idle payloads release their bytes without waiting for a read.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::FileCache;

/// Spawns a background task that periodically prunes expired entries.
///
/// The task is owned by the caller, not the cache; abort the returned
/// handle on shutdown.
///
/// # Arguments
/// * `cache` - Shared file cache
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Example
/// ```ignore
/// let cache = Arc::new(FileCache::new(1000));
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), 1);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: Arc<FileCache>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.prune_expired();

            if removed > 0 {
                info!(
                    removed,
                    used_bytes = cache.used_size(),
                    "Expiry sweep released entries"
                );
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}
