//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with access tracking
//! and sliding TTL support.

use std::time::Duration;

/// Converts a TTL to whole milliseconds, rounding up.
///
/// Only `Duration::ZERO` maps to 0 (no expiry); any positive TTL becomes at
/// least 1 ms. Durations past `u64::MAX` ms saturate.
pub fn ttl_to_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_nanos().div_ceil(1_000_000)).unwrap_or(u64::MAX)
}

// == Cache Entry ==
/// Represents a single cache entry with value and access metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Last successful read, or creation time if never read (Unix milliseconds)
    pub last_access_at: u64,
    /// Access frequency; the insertion counts as the first access
    pub access_count: u64,
    /// Idle time after which the entry expires, 0 = no expiration
    pub ttl_ms: u64,
    /// Monotonic access stamp, orders entries by recency for eviction
    pub access_seq: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a fresh entry with an access count of 1.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `now_ms` - Insertion time in Unix milliseconds
    /// * `ttl_ms` - Sliding TTL in milliseconds, 0 disables expiry
    /// * `seq` - Logical access stamp for recency ordering
    pub fn new(value: V, now_ms: u64, ttl_ms: u64, seq: u64) -> Self {
        Self {
            value,
            created_at: now_ms,
            last_access_at: now_ms,
            access_count: 1,
            ttl_ms,
            access_seq: seq,
        }
    }

    // == Record Access ==
    /// Registers a successful read: bumps the frequency and restarts the
    /// TTL window.
    pub fn record_access(&mut self, now_ms: u64, seq: u64) {
        self.access_count = self.access_count.saturating_add(1);
        self.last_access_at = now_ms;
        self.access_seq = seq;
    }

    // == Is Expired ==
    /// Checks if the entry has been idle for at least its TTL.
    ///
    /// Expiry slides with access: the window is measured from
    /// `last_access_at`, not from `created_at`.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.ttl_ms > 0 && now_ms.saturating_sub(self.last_access_at) >= self.ttl_ms
    }

    // == Time To Live ==
    /// Returns remaining idle time in milliseconds, or None if no TTL is set.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> Option<u64> {
        if self.ttl_ms == 0 {
            return None;
        }
        let deadline = self.last_access_at.saturating_add(self.ttl_ms);
        Some(deadline.saturating_sub(now_ms))
    }
}
