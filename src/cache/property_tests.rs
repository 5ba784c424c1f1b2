//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the cache contract over generated inputs.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use bytes::Bytes;
use chrono::TimeDelta;

use crate::cache::{ByteCache, Cache, ExpiringStore};

// == Strategies ==
/// Generates cache keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:]{1,32}".prop_map(|s| s)
}

/// Generates cache values
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,128}".prop_map(|s| s)
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of operations, the store agrees with a plain HashMap
    // model and the hit/miss counters match the lookups performed.
    #[test]
    fn prop_store_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let store: ExpiringStore<String> = ExpiringStore::new();
        let mut model: HashMap<String, String> = HashMap::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), value.clone(), None);
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let got = store.get(&key).ok();
                    match &got {
                        Some(_) => expected_hits += 1,
                        None => expected_misses += 1,
                    }
                    prop_assert_eq!(got.as_ref(), model.get(&key));
                }
                CacheOp::Delete { key } => {
                    prop_assert_eq!(store.delete(&key), model.remove(&key).is_some());
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, model.len(), "Total entries mismatch");
    }

    // Storing then reading a key before any expiry returns the stored value.
    #[test]
    fn prop_set_then_get(key in key_strategy(), value in value_strategy()) {
        let cache = ByteCache::new();

        cache.set(&key, Bytes::from(value.clone())).unwrap();

        prop_assert_eq!(cache.get(&key).unwrap(), Bytes::from(value));
    }

    // Deleting any key, present or not, succeeds and leaves it not found.
    #[test]
    fn prop_delete_always_succeeds(
        key in key_strategy(),
        value in value_strategy(),
        present in any::<bool>()
    ) {
        let cache = ByteCache::new();
        if present {
            cache.set(&key, Bytes::from(value)).unwrap();
        }

        prop_assert!(cache.delete(&key).is_ok());
        prop_assert!(cache.get(&key).unwrap_err().is_not_found());
    }

    // Last write wins and a key never maps to more than one entry.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let cache = ByteCache::new();

        cache.set(&key, Bytes::from(value1)).unwrap();
        cache.set(&key, Bytes::from(value2.clone())).unwrap();

        prop_assert_eq!(cache.get_str(&key).unwrap(), value2);
        prop_assert_eq!(cache.len(), 1);
    }

    // A zero or negative TTL stores an entry that the next read purges.
    #[test]
    fn prop_non_positive_ttl_is_expired(
        key in key_strategy(),
        value in value_strategy(),
        millis in -10_000i64..=0
    ) {
        let cache = ByteCache::new();

        cache
            .set_with_signed_ttl(&key, Bytes::from(value), TimeDelta::milliseconds(millis))
            .unwrap();

        prop_assert!(cache.get(&key).unwrap_err().is_not_found());
        prop_assert!(!cache.has(&key));
        prop_assert!(cache.is_empty());
    }

    // get_multiple returns exactly the keys that were set.
    #[test]
    fn prop_get_multiple_returns_found_keys(
        set_keys in prop::collection::hash_set(key_strategy(), 0..10),
        extra_keys in prop::collection::hash_set(key_strategy(), 0..10)
    ) {
        let cache = ByteCache::new();
        for key in &set_keys {
            cache.set(key, Bytes::from(format!("value_{}", key))).unwrap();
        }

        let requested: Vec<&str> = set_keys
            .iter()
            .chain(extra_keys.iter())
            .map(String::as_str)
            .collect();
        let found = cache.get_multiple(&requested);

        let found_keys: HashSet<&String> = found.keys().collect();
        prop_assert_eq!(found_keys, set_keys.iter().collect::<HashSet<_>>());
        for (key, value) in &found {
            prop_assert_eq!(value, &Bytes::from(format!("value_{}", key)));
        }
    }

    // set_multiple applies every pair.
    #[test]
    fn prop_set_multiple_applies_all(
        values in prop::collection::hash_map(key_strategy(), value_strategy(), 0..20)
    ) {
        let cache = ByteCache::new();
        let payloads = values
            .iter()
            .map(|(k, v)| (k.clone(), Bytes::from(v.clone())))
            .collect();

        cache.set_multiple(payloads).unwrap();

        for (key, value) in &values {
            prop_assert_eq!(&cache.get_str(key).unwrap(), value);
        }
        prop_assert_eq!(cache.len(), values.len());
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // An entry with a positive TTL is readable until the TTL elapses and
    // reports not found, including through `has`, afterwards.
    #[test]
    fn prop_ttl_expiration_behavior(key in key_strategy(), value in value_strategy()) {
        let cache = ByteCache::new();

        cache
            .set_with_ttl(&key, Bytes::from(value.clone()), Duration::from_millis(100))
            .unwrap();

        prop_assert_eq!(cache.get_str(&key).unwrap(), value);
        prop_assert!(cache.has(&key));

        sleep(Duration::from_millis(150));

        prop_assert!(cache.get(&key).is_err(), "Entry should not be found after TTL expires");
        prop_assert!(!cache.has(&key));
    }
}

// == Concurrent Operation Correctness ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // For any set of concurrent operations, every read returns a complete value
    // that some writer stored, and no operation fails.
    #[test]
    fn prop_concurrent_operation_correctness(
        initial_entries in prop::collection::vec((key_strategy(), value_strategy()), 1..20),
        operations in prop::collection::vec(cache_op_strategy(), 10..50)
    ) {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .build()
            .unwrap();

        let written: HashSet<String> = initial_entries
            .iter()
            .map(|(_, v)| v.clone())
            .chain(operations.iter().filter_map(|op| match op {
                CacheOp::Set { value, .. } => Some(value.clone()),
                _ => None,
            }))
            .collect();
        let written = Arc::new(written);

        rt.block_on(async {
            let cache = Arc::new(ByteCache::new());
            for (key, value) in &initial_entries {
                cache.set(key, Bytes::from(value.clone())).unwrap();
            }

            let mut handles = vec![];
            for op in operations {
                let cache = Arc::clone(&cache);
                let written = Arc::clone(&written);

                // Cache calls are synchronous; run them on the blocking pool
                handles.push(tokio::task::spawn_blocking(move || match op {
                    CacheOp::Set { key, value } => cache
                        .set(&key, Bytes::from(value))
                        .map_err(|e| e.to_string()),
                    CacheOp::Get { key } => match cache.get_str(&key) {
                        Ok(value) if !written.contains(&value) => {
                            Err(format!("Read unknown value '{}' for key '{}'", value, key))
                        }
                        _ => Ok(()),
                    },
                    CacheOp::Delete { key } => cache.delete(&key).map_err(|e| e.to_string()),
                }));
            }

            for handle in handles {
                let result = handle.await.expect("Task should not panic");
                prop_assert!(result.is_ok(), "Concurrent operation failed: {:?}", result);
            }
            Ok(())
        })?;
    }
}
