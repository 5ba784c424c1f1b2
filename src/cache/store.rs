//! Cache Store Module
//!
//! Concurrent storage engine: a sharded map of entries with lazy TTL expiration.

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use dashmap::DashMap;
use tracing::{debug, info};

use crate::cache::stats::StatsRecorder;
use crate::cache::{CacheEntry, CacheStats};
use crate::config::Config;
use crate::error::{CacheError, Result};

type EntryMap<V> = DashMap<String, CacheEntry<V>>;

// == Expiring Store ==
/// Thread-safe key/value storage with lazy TTL expiration.
///
/// Single-key operations only lock the shard owning the key, so callers working
/// on different keys do not contend. Expired entries are never swept in the
/// background: a read that finds one reports the key as missing and removes it.
///
/// The map itself sits behind an `ArcSwap`. `clear` publishes a fresh empty map
/// in one atomic store, so every reader sees either all old entries or none.
#[derive(Debug)]
pub struct ExpiringStore<V> {
    /// Key-value storage, replaced whole on clear
    entries: ArcSwap<EntryMap<V>>,
    /// Sizing used for every map this store creates
    config: Config,
    /// Lookup statistics
    stats: StatsRecorder,
}

impl<V> Default for ExpiringStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ExpiringStore<V> {
    // == Constructor ==
    /// Creates an empty store with default tuning.
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Creates an empty store sized and sharded according to `config`.
    pub fn with_config(config: &Config) -> Self {
        Self {
            entries: ArcSwap::from_pointee(Self::new_map(config)),
            config: config.clone(),
            stats: StatsRecorder::default(),
        }
    }

    fn new_map(config: &Config) -> EntryMap<V> {
        match config.shard_amount {
            Some(shards) if shards > 1 && shards.is_power_of_two() => {
                DashMap::with_capacity_and_shard_amount(config.initial_capacity, shards)
            }
            _ => DashMap::with_capacity(config.initial_capacity),
        }
    }

    // == Set ==
    /// Stores a value, replacing any previous entry and its TTL.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional time to live; None never expires, zero is already expired
    pub fn set(&self, key: String, value: V, ttl: Option<Duration>) {
        self.entries.load().insert(key, CacheEntry::new(value, ttl));
    }

    // == Lookup ==
    /// Reads a live entry through `read`.
    ///
    /// An expired entry is removed and reported as `NotFound`. Removal only
    /// happens if the entry is still expired when the shard is write-locked, so
    /// a value stored concurrently under the same key survives.
    pub fn lookup<R>(&self, key: &str, read: impl FnOnce(&CacheEntry<V>) -> R) -> Result<R> {
        let entries = self.entries.load();
        match entries.get(key) {
            Some(entry) if !entry.is_expired_at(Instant::now()) => {
                self.stats.record_hit();
                return Ok(read(entry.value()));
            }
            Some(_) => {}
            None => {
                self.stats.record_miss();
                return Err(CacheError::NotFound(key.to_string()));
            }
        }

        // The read guard is released above; taking the write lock here is safe
        if let Some((_, expired)) = entries.remove_if(key, |_, entry| entry.is_expired()) {
            self.stats.record_expiration();
            debug!(
                "Lazy expiry: removed key {} after {:?}",
                key,
                expired.created_at.elapsed()
            );
        }

        self.stats.record_miss();
        Err(CacheError::NotFound(key.to_string()))
    }

    // == Has ==
    /// Returns true if `key` maps to a live entry.
    pub fn has(&self, key: &str) -> bool {
        self.lookup(key, |_| ()).is_ok()
    }

    // == TTL ==
    /// Returns the remaining lifetime of a live key, None if it never expires.
    pub fn ttl(&self, key: &str) -> Result<Option<Duration>> {
        self.lookup(key, CacheEntry::ttl_remaining)
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Returns whether a mapping was present. Absent keys are not an error.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.load().remove(key).is_some()
    }

    // == Clear ==
    /// Removes every entry at once by publishing an empty map.
    ///
    /// A single-key operation racing the clear works on either the old or the
    /// new map; a write that lands in the old map is discarded with it.
    pub fn clear(&self) {
        let previous = self.entries.swap(Arc::new(Self::new_map(&self.config)));
        info!("Cache cleared: discarded {} entries", previous.len());
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len())
    }

    // == Length ==
    /// Returns the number of mapped entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }
}

impl<V: Clone> ExpiringStore<V> {
    // == Get ==
    /// Retrieves a clone of the value stored under `key`.
    ///
    /// Cloning is shallow for the value types the caches use (`Arc`, `Bytes`).
    pub fn get(&self, key: &str) -> Result<V> {
        self.lookup(key, |entry| entry.value.clone())
    }
}
