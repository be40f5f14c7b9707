//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LFU eviction, sliding TTL
//! expiration and a pluggable capacity policy.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::{
    ttl_to_millis, CacheEntry, CacheStats, CapacityPolicy, Clock, EntryLimit, EvictionPolicy,
    LfuPolicy, SystemClock,
};

// == LFU Cache ==
/// Generic cache with LFU eviction and sliding TTL support.
///
/// Eviction runs after an insertion, never before, so the cache may exceed
/// its limit by one entry until the sweep completes. The sweep keeps
/// removing LFU victims until the capacity policy stops reporting full or
/// the map is empty.
#[derive(Debug)]
pub struct LfuCache<K, V, P = EntryLimit> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Fullness check and size accounting
    policy: P,
    /// Victim selection
    eviction: LfuPolicy,
    /// Performance statistics
    stats: CacheStats,
    /// TTL applied when `put` is called without one; zero disables expiry
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
    /// Next logical access stamp
    next_seq: u64,
}

impl<K, V> LfuCache<K, V, EntryLimit>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a cache bounded by entry count.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, 0 for unbounded
    /// * `default_ttl` - TTL for entries inserted without one, zero for none
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        Self::with_policy(EntryLimit::new(capacity), default_ttl)
    }

    /// Configured entry limit (0 = unbounded).
    pub fn capacity(&self) -> usize {
        self.policy.capacity()
    }
}

impl<K, V, P> LfuCache<K, V, P>
where
    K: Hash + Eq + Clone,
    V: Clone,
    P: CapacityPolicy<K, V>,
{
    /// Creates a cache whose fullness is decided by `policy`.
    pub fn with_policy(policy: P, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            policy,
            eviction: LfuPolicy::new(),
            stats: CacheStats::new(),
            default_ttl,
            clock: Arc::new(SystemClock),
            next_seq: 0,
        }
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // == Put ==
    /// Stores a value, replacing any previous entry for the key.
    ///
    /// A replaced entry leaves through `on_remove` before the new value is
    /// accounted, and the new entry starts over at frequency 1.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Sliding TTL (uses default_ttl if None, zero disables expiry)
    ///
    /// # Returns
    /// The number of entries evicted to bring the cache back under capacity.
    pub fn put(&mut self, key: K, value: V, ttl: Option<Duration>) -> usize {
        if let Some(old) = self.entries.remove(&key) {
            self.policy.on_remove(&key, &old.value);
        }

        let ttl_ms = ttl_to_millis(ttl.unwrap_or(self.default_ttl));
        let now = self.clock.now_ms();
        let seq = self.bump_seq();
        let entry = CacheEntry::new(value, now, ttl_ms, seq);

        self.policy.on_insert(&key, &entry.value);
        self.entries.insert(key, entry);

        self.evict_while_full()
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A hit bumps the entry's frequency and restarts its TTL window. An
    /// expired entry is removed on discovery and reported as a miss.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now_ms();

        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(now),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            if let Some((key, entry)) = self.entries.remove_entry(key) {
                self.policy.on_remove(&key, &entry.value);
                self.stats.record_expiration();
                debug!(
                    idle_ms = now.saturating_sub(entry.last_access_at),
                    "Entry expired on read"
                );
            }
            self.stats.record_miss();
            return None;
        }

        let seq = self.bump_seq();
        let entry = self.entries.get_mut(key)?;
        entry.record_access(now, seq);
        self.stats.record_hit();
        Some(entry.value.clone())
    }

    // == Remove ==
    /// Removes an entry unconditionally, expired or not.
    ///
    /// Removing an absent key is a no-op that returns None.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (key, entry) = self.entries.remove_entry(key)?;
        self.policy.on_remove(&key, &entry.value);
        Some(entry.value)
    }

    // == Contains Key ==
    /// Returns true if the key is present and not expired. Does not count as
    /// an access.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .map(|entry| !entry.is_expired(now))
            .unwrap_or(false)
    }

    // == Frequency ==
    /// Returns the access count of a live entry without touching it.
    /// Expired entries report None.
    pub fn frequency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.access_count)
    }

    // == Is Full ==
    /// Asks the capacity policy whether the cache is over its limit.
    pub fn is_full(&self) -> bool {
        self.policy.is_full(self.entries.len())
    }

    // == Prune Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn prune_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        self.remove_expired(now)
    }

    // == Clear ==
    /// Removes every entry, running `on_remove` for each, then resets the
    /// policy's accumulators.
    pub fn clear(&mut self) {
        for (key, entry) in self.entries.drain() {
            self.policy.on_remove(&key, &entry.value);
        }
        self.policy.on_clear();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.entries.len();
        stats.used_bytes = self.policy.used_size();
        stats
    }

    /// Iterates over stored pairs without counting as access. Expired
    /// entries not yet pruned are included, since they still hold their
    /// share of the capacity.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(key, entry)| (key, &entry.value))
    }

    /// Keys of the entries that are present and not expired.
    pub fn live_keys(&self) -> impl Iterator<Item = &K> {
        let now = self.clock.now_ms();
        self.entries
            .iter()
            .filter(move |(_, entry)| !entry.is_expired(now))
            .map(|(key, _)| key)
    }

    /// Bytes accounted by the capacity policy.
    pub fn used_size(&self) -> u64 {
        self.policy.used_size()
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Drops every entry expired at `now` through `on_remove`.
    fn remove_expired(&mut self, now: u64) -> usize {
        let expired_keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            if let Some(entry) = self.entries.remove(&key) {
                self.policy.on_remove(&key, &entry.value);
                self.stats.record_expiration();
            }
        }

        count
    }

    /// Brings the cache back under capacity. Expired entries go first, then
    /// LFU victims.
    fn evict_while_full(&mut self) -> usize {
        if self.is_full() {
            let now = self.clock.now_ms();
            let expired = self.remove_expired(now);
            if expired > 0 {
                debug!(expired, "Dropped expired entries before eviction");
            }
        }

        let mut evicted = 0;

        while !self.entries.is_empty() && self.is_full() {
            let Some(victim) = self.eviction.select_victim(&self.entries).cloned() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&victim) {
                self.policy.on_remove(&victim, &entry.value);
                self.stats.record_eviction();
                evicted += 1;
                debug!(
                    access_count = entry.access_count,
                    remaining = self.entries.len(),
                    "LFU eviction"
                );
            }
        }

        evicted
    }
}
