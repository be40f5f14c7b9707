//! File Cache Module
//!
//! Size-aware LFU cache of file contents keyed by path. Fullness is measured
//! in payload bytes instead of entries, and every operation runs inside one
//! exclusive lock so the byte accounting is never observed half-updated.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::cache::{ByteBudget, CacheStats, Clock, LfuCache};
use crate::error::{CacheError, Result};

// == Cache Config ==
/// Construction-time parameters of a `FileCache`.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Nominal entry capacity; only used to derive the default byte budget
    pub capacity: usize,
    /// Byte budget, defaults to half the capacity when None
    pub max_payload_bytes: Option<u64>,
    /// Sliding TTL for entries put without one, zero for none
    pub default_ttl: Duration,
}

impl CacheConfig {
    /// Effective byte budget.
    pub fn max_payload_bytes(&self) -> u64 {
        self.max_payload_bytes.unwrap_or(self.capacity as u64 / 2)
    }
}

// == File Cache ==
/// Thread-safe LFU cache of file payloads bounded by total bytes.
///
/// The cache never reads files and never checks for staleness; callers hand
/// it bytes they already loaded (see `FileLoader`).
#[derive(Debug)]
pub struct FileCache {
    inner: Mutex<LfuCache<PathBuf, Bytes, ByteBudget>>,
    capacity: usize,
}

impl FileCache {
    // == Constructors ==
    /// Creates a cache with a byte budget of `capacity / 2` and no expiry.
    pub fn new(capacity: usize) -> Self {
        Self::with_ttl(capacity, capacity as u64 / 2, Duration::ZERO)
    }

    /// Creates a cache with an explicit byte budget and no expiry.
    pub fn with_max_payload(capacity: usize, max_payload_bytes: u64) -> Self {
        Self::with_ttl(capacity, max_payload_bytes, Duration::ZERO)
    }

    /// Creates a cache with an explicit byte budget and default TTL.
    ///
    /// # Arguments
    /// * `capacity` - Nominal entry capacity
    /// * `max_payload_bytes` - Total payload bytes kept before evicting
    /// * `default_ttl` - Sliding TTL for entries put without one, zero for none
    pub fn with_ttl(capacity: usize, max_payload_bytes: u64, default_ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(LfuCache::with_policy(
                ByteBudget::new(max_payload_bytes),
                default_ttl,
            )),
            capacity,
        }
    }

    /// Creates a cache from a `CacheConfig`.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_ttl(
            config.capacity,
            config.max_payload_bytes(),
            config.default_ttl,
        )
    }

    /// Replaces the time source.
    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        let inner = self.inner.into_inner().with_clock(clock);
        Self {
            inner: Mutex::new(inner),
            capacity: self.capacity,
        }
    }

    // == Get ==
    /// Returns the cached bytes for `path`, or None on a miss or expiry.
    pub fn get(&self, path: impl AsRef<Path>) -> Result<Option<Bytes>> {
        let path = validate_key(path.as_ref())?;
        Ok(self.inner.lock().get(path))
    }

    // == Put ==
    /// Caches `bytes` under `path`, evicting LFU entries while the total
    /// payload exceeds the byte budget.
    ///
    /// # Returns
    /// The number of entries evicted.
    pub fn put(
        &self,
        path: impl Into<PathBuf>,
        bytes: impl Into<Bytes>,
        ttl: Option<Duration>,
    ) -> Result<usize> {
        let path = path.into();
        validate_key(&path)?;
        let bytes = bytes.into();
        let len = bytes.len();

        let mut cache = self.inner.lock();
        let evicted = cache.put(path, bytes, ttl);

        if evicted > 0 {
            debug!(
                payload = len,
                evicted,
                used_bytes = cache.used_size(),
                "File cache over budget, evicted entries"
            );
        }

        Ok(evicted)
    }

    // == Remove ==
    /// Drops the entry for `path`. Removing an absent path returns None.
    pub fn remove(&self, path: impl AsRef<Path>) -> Result<Option<Bytes>> {
        let path = validate_key(path.as_ref())?;
        Ok(self.inner.lock().remove(path))
    }

    /// Returns true if `path` is cached and not expired.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.inner.lock().contains_key(path.as_ref())
    }

    // == Clear ==
    /// Drops every entry and resets the byte accounting, returning how many
    /// entries were dropped.
    pub fn clear(&self) -> usize {
        let mut cache = self.inner.lock();
        let dropped = cache.len();
        cache.clear();
        info!(dropped, "File cache cleared");
        dropped
    }

    /// Removes all expired entries, returning how many were dropped.
    pub fn prune_expired(&self) -> usize {
        self.inner.lock().prune_expired()
    }

    /// True when the held payload exceeds the byte budget.
    pub fn is_full(&self) -> bool {
        self.inner.lock().is_full()
    }

    /// Number of cached files.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Sum of the payload lengths currently held.
    pub fn used_size(&self) -> u64 {
        self.inner.lock().used_size()
    }

    pub fn max_payload_bytes(&self) -> u64 {
        self.inner.lock().policy().max_bytes()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Duration {
        self.inner.lock().default_ttl()
    }

    /// Snapshot of the cached paths that have not expired.
    pub fn keys(&self) -> Vec<PathBuf> {
        self.inner.lock().live_keys().cloned().collect()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    /// Recomputes the payload total from the stored entries.
    #[cfg(test)]
    pub(crate) fn held_bytes(&self) -> u64 {
        self.inner
            .lock()
            .iter()
            .map(|(_, bytes)| bytes.len() as u64)
            .sum()
    }
}

fn validate_key(path: &Path) -> Result<&Path> {
    if path.as_os_str().is_empty() {
        return Err(CacheError::InvalidArgument(
            "File key cannot be empty".to_string(),
        ));
    }
    Ok(path)
}
