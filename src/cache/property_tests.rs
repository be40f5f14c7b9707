//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the accounting, eviction and expiry guarantees of
//! the LFU cache and its file-backed specialization.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{Clock, FileCache, LfuCache, ManualClock};

// == Test Configuration ==
const TEST_CAPACITY: usize = 1_000;
const TEST_MAX_PAYLOAD: u64 = 256;

// == Strategies ==
/// Small key space so that operations collide on the same files
fn file_key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,2}".prop_map(|s| format!("{}.txt", s))
}

fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..96)
}

/// Generates a sequence of file cache operations for testing
#[derive(Debug, Clone)]
enum FileOp {
    Put { key: String, payload: Vec<u8> },
    Get { key: String },
    Remove { key: String },
    Advance { millis: u64 },
    Prune,
    Clear,
}

fn file_op_strategy() -> impl Strategy<Value = FileOp> {
    prop_oneof![
        6 => (file_key_strategy(), payload_strategy())
            .prop_map(|(key, payload)| FileOp::Put { key, payload }),
        4 => file_key_strategy().prop_map(|key| FileOp::Get { key }),
        2 => file_key_strategy().prop_map(|key| FileOp::Remove { key }),
        2 => (0u64..80).prop_map(|millis| FileOp::Advance { millis }),
        1 => Just(FileOp::Prune),
        1 => Just(FileOp::Clear),
    ]
}

fn apply(cache: &FileCache, clock: &ManualClock, op: FileOp) {
    match op {
        FileOp::Put { key, payload } => {
            cache.put(key, payload, None).unwrap();
        }
        FileOp::Get { key } => {
            let _ = cache.get(key).unwrap();
        }
        FileOp::Remove { key } => {
            let _ = cache.remove(key).unwrap();
        }
        FileOp::Advance { millis } => clock.advance(Duration::from_millis(millis)),
        FileOp::Prune => {
            cache.prune_expired();
        }
        FileOp::Clear => {
            cache.clear();
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // For any sequence of operations, including expiry and eviction, the
    // tracked used size equals the sum of the payloads still held.
    #[test]
    fn prop_used_size_matches_held_payloads(ops in prop::collection::vec(file_op_strategy(), 1..80)) {
        let clock = Arc::new(ManualClock::new(0));
        let cache = FileCache::with_ttl(TEST_CAPACITY, TEST_MAX_PAYLOAD, Duration::from_millis(100))
            .with_clock(clock.clone());

        for op in ops {
            apply(&cache, &clock, op);
            prop_assert_eq!(cache.used_size(), cache.held_bytes());
            prop_assert!(cache.used_size() <= TEST_MAX_PAYLOAD, "Budget exceeded after sweep");
        }
    }

    // A cache filled to exactly its byte budget keeps everything; one more
    // byte triggers an eviction.
    #[test]
    fn prop_byte_budget_boundary(sizes in prop::collection::vec(1usize..64, 1..8)) {
        let budget: u64 = sizes.iter().map(|s| *s as u64).sum();
        let cache = FileCache::with_max_payload(TEST_CAPACITY, budget);

        for (i, size) in sizes.iter().enumerate() {
            cache.put(format!("f{}", i), vec![0u8; *size], None).unwrap();
        }

        prop_assert_eq!(cache.len(), sizes.len());
        prop_assert_eq!(cache.used_size(), budget);
        prop_assert!(!cache.is_full());

        let evicted = cache.put("overflow", vec![0u8; 1], None).unwrap();
        prop_assert!(evicted >= 1);
        prop_assert!(cache.used_size() <= budget);
    }

    // Entry-count capacity is never exceeded once a put returns.
    #[test]
    fn prop_capacity_enforcement(keys in prop::collection::vec("[a-z]{1,3}", 1..200)) {
        let capacity = 16;
        let mut store: LfuCache<String, u32> = LfuCache::new(capacity, Duration::ZERO);

        for (i, key) in keys.into_iter().enumerate() {
            store.put(key, i as u32, None);
            prop_assert!(store.len() <= capacity, "Cache size {} exceeds max {}", store.len(), capacity);
        }
    }

    // The victim is always the entry with the fewest accesses, ties broken
    // by the oldest last access, with the new entry competing like any other.
    #[test]
    fn prop_lfu_eviction_order(hits in prop::collection::vec(0u64..4, 2..10)) {
        let clock = Arc::new(ManualClock::new(1_000));
        let capacity = hits.len();
        let mut store: LfuCache<String, ()> =
            LfuCache::new(capacity, Duration::ZERO).with_clock(clock.clone());

        // (access_count, last_access_ms) per key
        let mut model: HashMap<String, (u64, u64)> = HashMap::new();

        for i in 0..capacity {
            clock.advance(Duration::from_millis(1));
            let key = format!("k{}", i);
            store.put(key.clone(), (), None);
            model.insert(key, (1, clock.now_ms()));
        }
        for (i, count) in hits.iter().enumerate() {
            let key = format!("k{}", i);
            for _ in 0..*count {
                clock.advance(Duration::from_millis(1));
                store.get(&key);
                let slot = model.get_mut(&key).unwrap();
                slot.0 += 1;
                slot.1 = clock.now_ms();
            }
        }

        clock.advance(Duration::from_millis(1));
        model.insert("new".to_string(), (1, clock.now_ms()));
        store.put("new".to_string(), (), None);

        let expected = model
            .iter()
            .min_by_key(|(_, (count, at))| (*count, *at))
            .map(|(key, _)| key.clone())
            .unwrap();

        prop_assert_eq!(store.len(), capacity);
        prop_assert!(!store.contains_key(&expected), "Expected '{}' to be evicted", expected);
        for key in model.keys().filter(|k| **k != expected) {
            prop_assert!(store.contains_key(key), "Key '{}' should survive", key);
        }
    }

    // Reading inside the TTL window restarts it; staying idle for the full
    // TTL drops the entry.
    #[test]
    fn prop_sliding_expiry(ttl_ms in 2u64..10_000, reads in 1usize..6) {
        let clock = Arc::new(ManualClock::new(0));
        let mut store: LfuCache<String, u8> =
            LfuCache::new(0, Duration::from_millis(ttl_ms)).with_clock(clock.clone());

        store.put("k".to_string(), 7, None);
        for _ in 0..reads {
            clock.advance(Duration::from_millis(ttl_ms - 1));
            prop_assert_eq!(store.get("k"), Some(7));
        }

        clock.advance(Duration::from_millis(ttl_ms));
        prop_assert_eq!(store.get("k"), None);
        prop_assert!(store.is_empty());
    }
}

// == Property Test for Concurrent Operation Correctness ==

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Concurrent handlers sharing one FileCache never observe a payload
    // other than one that was put, and the byte accounting stays exact.
    #[test]
    fn prop_concurrent_operation_correctness(
        ops in prop::collection::vec(
            (file_key_strategy(), 1usize..64, any::<bool>()),
            10..60
        )
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            let cache = Arc::new(FileCache::with_max_payload(TEST_CAPACITY, TEST_MAX_PAYLOAD));
            let mut handles = vec![];

            for (key, size, is_write) in ops {
                let cache = Arc::clone(&cache);
                handles.push(tokio::spawn(async move {
                    if is_write {
                        // Payload bytes encode their own length
                        cache.put(key, vec![size as u8; size], None).unwrap();
                    } else if let Some(bytes) = cache.get(&key).unwrap() {
                        let expected = bytes.len() as u8;
                        if bytes.iter().any(|b| *b != expected) {
                            return Err(format!("Torn payload for '{}'", key));
                        }
                    }
                    Ok::<_, String>(())
                }));
            }

            for handle in handles {
                let result = handle.await.expect("Task should not panic");
                prop_assert!(result.is_ok(), "Concurrent operation failed: {:?}", result);
            }

            prop_assert_eq!(cache.used_size(), cache.held_bytes());
            prop_assert!(cache.used_size() <= TEST_MAX_PAYLOAD);
            Ok(())
        })?;
    }
}
