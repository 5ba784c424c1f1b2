//! Cache Module
//!
//! Provides in-memory caching with lazy TTL expiration behind a common
//! [`Cache`] capability trait.

mod byte_cache;
mod entry;
mod map_cache;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use tracing::debug;

use crate::error::{CacheError, Result};

// Re-export public types
pub use byte_cache::ByteCache;
pub use entry::CacheEntry;
pub use map_cache::MapCache;
pub use stats::CacheStats;
pub use store::ExpiringStore;

/// Type-erased value held by [`MapCache`].
pub type AnyValue = Arc<dyn Any + Send + Sync>;

// == Cache Capability ==
/// The operation set shared by every interchangeable cache implementation.
///
/// Implementations provide the point primitives; the bulk operations are
/// per-key loops over them and are not atomic across keys. A failing bulk write
/// leaves the keys processed before the failure applied.
pub trait Cache: Send + Sync {
    /// Value type stored by this implementation.
    type Value;

    /// Identity under which the implementation registers itself.
    fn name(&self) -> &'static str;

    /// Returns the value stored under `key`.
    ///
    /// An expired entry is removed by this call and reported as `NotFound`.
    fn get(&self, key: &str) -> Result<Self::Value>;

    /// Stores `value` with no expiry, replacing any previous entry.
    fn set(&self, key: &str, value: Self::Value) -> Result<()>;

    /// Stores `value` that expires `ttl` from now. A zero TTL is already expired.
    fn set_with_ttl(&self, key: &str, value: Self::Value, ttl: Duration) -> Result<()>;

    /// Removes `key`. Removing an absent key succeeds.
    fn delete(&self, key: &str) -> Result<()>;

    /// Removes every entry.
    fn clear(&self) -> Result<()>;

    /// Returns the stored value or `default` when the key is missing or expired.
    fn get_or_default(&self, key: &str, default: Self::Value) -> Self::Value {
        self.get(key).unwrap_or(default)
    }

    /// Like [`Cache::set_with_ttl`] but accepts signed durations; zero or
    /// negative values store an already-expired entry.
    fn set_with_signed_ttl(&self, key: &str, value: Self::Value, ttl: TimeDelta) -> Result<()> {
        let ttl = ttl.to_std().unwrap_or(Duration::ZERO);
        self.set_with_ttl(key, value, ttl)
    }

    /// Returns true iff [`Cache::get`] would currently succeed.
    fn has(&self, key: &str) -> bool {
        self.get(key).is_ok()
    }

    /// Looks up every key and returns the ones that were found.
    ///
    /// Missing and expired keys are left out of the result; they never fail
    /// the batch.
    fn get_multiple(&self, keys: &[&str]) -> HashMap<String, Self::Value> {
        let found: HashMap<String, Self::Value> = keys
            .iter()
            .filter_map(|key| self.get(key).ok().map(|value| (key.to_string(), value)))
            .collect();

        debug!(
            "get_multiple: {} of {} keys found",
            found.len(),
            keys.len()
        );
        found
    }

    /// Stores every pair without expiry.
    ///
    /// Stops at the first failing key and reports it as `Aggregate`; pairs
    /// stored before the failure are not rolled back.
    fn set_multiple(&self, values: HashMap<String, Self::Value>) -> Result<()> {
        for (key, value) in values {
            self.set(&key, value)
                .map_err(|e| CacheError::aggregate(key.as_str(), e))?;
        }
        Ok(())
    }

    /// Removes every key.
    ///
    /// Stops at the first failing key and reports it as `Aggregate`; keys
    /// removed before the failure stay removed.
    fn delete_multiple(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.delete(key)
                .map_err(|e| CacheError::aggregate(*key, e))?;
        }
        Ok(())
    }
}
