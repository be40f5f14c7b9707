//! LFU Eviction Module
//!
//! Implements Least Frequently Used victim selection for cache eviction.

use std::collections::HashMap;

use crate::cache::CacheEntry;

// == Eviction Policy ==
/// Chooses which entry leaves the cache when it is over capacity.
pub trait EvictionPolicy {
    /// Returns the key of the entry to evict, or None if `entries` is empty.
    fn select_victim<'a, K, V>(&self, entries: &'a HashMap<K, CacheEntry<V>>) -> Option<&'a K>;
}

// == LFU Policy ==
/// Least Frequently Used eviction.
///
/// The victim is the entry with the lowest `access_count`. Among equally
/// frequent entries, the least recently accessed one goes first. Recency is
/// read from `access_seq`, the store's monotonic access counter, so a wall
/// clock stepping backwards never makes a fresh insert look older.
/// Frequencies never decay, so a key that was hot once stays ahead of any
/// colder key for the lifetime of its entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct LfuPolicy;

impl LfuPolicy {
    // == Constructor ==
    pub fn new() -> Self {
        Self
    }
}

impl EvictionPolicy for LfuPolicy {
    fn select_victim<'a, K, V>(&self, entries: &'a HashMap<K, CacheEntry<V>>) -> Option<&'a K> {
        entries
            .iter()
            .min_by_key(|(_, entry)| (entry.access_count, entry.access_seq))
            .map(|(key, _)| key)
    }
}
