//! Map Cache Module
//!
//! Arbitrary-value cache: stores type-erased values and downcasts on typed reads.

use std::any::{type_name, Any};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{AnyValue, Cache, CacheStats, ExpiringStore};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Map Cache ==
/// Cache of arbitrary `Send + Sync` values with optional per-entry TTL.
///
/// Values are held behind an `Arc`; reads hand out another reference to the
/// stored value rather than a copy.
#[derive(Debug, Default)]
pub struct MapCache {
    store: ExpiringStore<AnyValue>,
}

impl MapCache {
    /// Registry name of this implementation.
    pub const NAME: &'static str = "map";

    // == Constructor ==
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache tuned by `config`.
    pub fn with_config(config: &Config) -> Self {
        Self {
            store: ExpiringStore::with_config(config),
        }
    }

    // == Typed Access ==
    /// Stores any value without expiry.
    pub fn insert<T: Any + Send + Sync>(&self, key: &str, value: T) {
        self.store.set(key.to_string(), Arc::new(value), None);
    }

    /// Stores any value that expires `ttl` from now.
    pub fn insert_with_ttl<T: Any + Send + Sync>(&self, key: &str, value: T, ttl: Duration) {
        self.store.set(key.to_string(), Arc::new(value), Some(ttl));
    }

    /// Returns the value under `key` as a `T`.
    ///
    /// Fails with `WrongType` when a value of another type is stored.
    pub fn get_as<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>> {
        self.store
            .get(key)?
            .downcast::<T>()
            .map_err(|_| CacheError::WrongType {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    // == Introspection ==
    /// Remaining lifetime of `key`, None if it never expires.
    pub fn ttl(&self, key: &str) -> Result<Option<Duration>> {
        self.store.ttl(key)
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    /// Number of mapped entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl Cache for MapCache {
    type Value = AnyValue;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn get(&self, key: &str) -> Result<AnyValue> {
        self.store.get(key)
    }

    fn set(&self, key: &str, value: AnyValue) -> Result<()> {
        self.store.set(key.to_string(), value, None);
        Ok(())
    }

    fn set_with_ttl(&self, key: &str, value: AnyValue, ttl: Duration) -> Result<()> {
        self.store.set(key.to_string(), value, Some(ttl));
        Ok(())
    }

    fn has(&self, key: &str) -> bool {
        self.store.has(key)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.store.delete(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.store.clear();
        Ok(())
    }
}
