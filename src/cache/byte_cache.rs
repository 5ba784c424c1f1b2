//! Byte Cache Module
//!
//! Byte-payload cache with typed decoding on read.

use std::any::type_name;
use std::time::Duration;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::cache::{Cache, CacheStats, ExpiringStore};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Byte Cache ==
/// Cache of raw byte payloads with optional per-entry TTL.
///
/// Typed reads (`get_str`, `get_json`) check the payload at read time and fail
/// with `WrongType` when it cannot be decoded as the requested type.
#[derive(Debug, Default)]
pub struct ByteCache {
    store: ExpiringStore<Bytes>,
}

impl ByteCache {
    /// Registry name of this implementation.
    pub const NAME: &'static str = "bytes";

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
    /// Returns the payload under `key` as UTF-8 text.
    pub fn get_str(&self, key: &str) -> Result<String> {
        let payload = self.store.get(key)?;
        String::from_utf8(payload.to_vec()).map_err(|_| CacheError::WrongType {
            key: key.to_string(),
            expected: "utf-8 string",
        })
    }

    /// Serializes `value` as JSON and stores it, expiring after `ttl` if given.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()> {
        let payload = serde_json::to_vec(value).map_err(|source| CacheError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key.to_string(), Bytes::from(payload), ttl);
        Ok(())
    }

    /// Decodes the JSON payload under `key` as a `T`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let payload = self.store.get(key)?;
        serde_json::from_slice(&payload).map_err(|e| {
            debug!("get_json: payload for key {} is not a {}: {}", key, type_name::<T>(), e);
            CacheError::WrongType {
                key: key.to_string(),
                expected: type_name::<T>(),
            }
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

impl Cache for ByteCache {
    type Value = Bytes;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn get(&self, key: &str) -> Result<Bytes> {
        self.store.get(key)
    }

    fn set(&self, key: &str, value: Bytes) -> Result<()> {
        self.store.set(key.to_string(), value, None);
        Ok(())
    }

    fn set_with_ttl(&self, key: &str, value: Bytes, ttl: Duration) -> Result<()> {
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
