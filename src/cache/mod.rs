//! Cache Module
//!
//! Provides an in-memory LFU cache with sliding TTL expiration, a pluggable
//! capacity policy, and a byte-budgeted file-content specialization.

mod capacity;
mod clock;
mod entry;
mod file;
mod lfu;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use capacity::{ByteBudget, CapacityPolicy, EntryLimit};
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::{ttl_to_millis, CacheEntry};
pub use file::{CacheConfig, FileCache};
pub use lfu::{EvictionPolicy, LfuPolicy};
pub use stats::CacheStats;
pub use store::LfuCache;
