//! Capacity Policy Module
//!
//! Decides when a cache is full and keeps any size accounting in step with
//! insertions and removals. Every removal path of the store (explicit
//! remove, eviction, expiry, clear) funnels through `on_remove`.

// == Capacity Policy ==
/// Strategy injected into `LfuCache` at construction.
pub trait CapacityPolicy<K, V> {
    /// Whether the cache currently holding `entry_count` entries is over its
    /// limit and must evict.
    fn is_full(&self, entry_count: usize) -> bool;

    /// Called after `value` has been stored under `key`.
    fn on_insert(&mut self, _key: &K, _value: &V) {}

    /// Called exactly once for every entry leaving the cache.
    fn on_remove(&mut self, _key: &K, _value: &V) {}

    /// Called after a `clear`, once every entry went through `on_remove`.
    fn on_clear(&mut self) {}

    /// Bytes currently accounted for, if this policy tracks size.
    fn used_size(&self) -> u64 {
        0
    }
}

// == Entry Limit ==
/// Bounds the number of entries; a capacity of 0 means unbounded.
#[derive(Debug, Clone, Copy)]
pub struct EntryLimit {
    capacity: usize,
}

impl EntryLimit {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> CapacityPolicy<K, V> for EntryLimit {
    fn is_full(&self, entry_count: usize) -> bool {
        self.capacity > 0 && entry_count > self.capacity
    }
}

// == Byte Budget ==
/// Bounds the summed payload length of all entries.
///
/// Full only when `used_size` is strictly greater than the budget, so a
/// cache holding exactly `max_bytes` bytes keeps everything.
#[derive(Debug, Clone, Copy)]
pub struct ByteBudget {
    max_bytes: u64,
    used: u64,
}

impl ByteBudget {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes, used: 0 }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }
}

impl<K, V: AsRef<[u8]>> CapacityPolicy<K, V> for ByteBudget {
    fn is_full(&self, _entry_count: usize) -> bool {
        self.used > self.max_bytes
    }

    fn on_insert(&mut self, _key: &K, value: &V) {
        self.used += value.as_ref().len() as u64;
    }

    fn on_remove(&mut self, _key: &K, value: &V) {
        self.used = self.used.saturating_sub(value.as_ref().len() as u64);
    }

    fn on_clear(&mut self) {
        self.used = 0;
    }

    fn used_size(&self) -> u64 {
        self.used
    }
}
