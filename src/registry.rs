//! Provider Registry Module
//!
//! Application-owned directory of interchangeable cache implementations,
//! keyed by implementation name.

use std::sync::Arc;

use bytes::Bytes;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{info, warn};

use crate::cache::{AnyValue, ByteCache, Cache, MapCache};
use crate::error::{CacheError, Result};

/// Shared handle to a registered provider.
pub type CacheHandle<V> = Arc<dyn Cache<Value = V>>;

// == Cache Registry ==
/// Registry of cache providers storing values of type `V`.
///
/// There is one registry per value type: providers are interchangeable only
/// when they store the same `V`, so `MapCache` (`AnyValue`) and `ByteCache`
/// (`Bytes`) live in separate registries.
///
/// The application creates one during startup and registers the providers it
/// wants to offer. Registration is idempotent: the first provider registered
/// under a name is kept.
pub struct CacheRegistry<V: 'static> {
    providers: DashMap<&'static str, CacheHandle<V>>,
}

impl<V: 'static> Default for CacheRegistry<V> {
    fn default() -> Self {
        Self {
            providers: DashMap::new(),
        }
    }
}

impl<V: 'static> CacheRegistry<V> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `cache` under its [`Cache::name`].
    ///
    /// Returns false, keeping the existing provider, if the name is taken.
    pub fn register(&self, cache: CacheHandle<V>) -> bool {
        let name = cache.name();
        match self.providers.entry(name) {
            Entry::Occupied(_) => {
                warn!("Cache provider '{}' already registered, keeping the first", name);
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(cache);
                info!("Registered cache provider '{}'", name);
                true
            }
        }
    }

    /// Returns the provider registered under `name`.
    pub fn get(&self, name: &str) -> Result<CacheHandle<V>> {
        self.providers
            .get(name)
            .map(|provider| Arc::clone(provider.value()))
            .ok_or_else(|| CacheError::UnknownProvider(name.to_string()))
    }

    /// Returns true if a provider is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Names of all registered providers, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.providers.iter().map(|p| *p.key()).collect();
        names.sort_unstable();
        names
    }
}

// == Built-in Providers ==
/// Registers a fresh [`MapCache`] and returns the provider now registered
/// under its name.
pub fn register_map_cache(registry: &CacheRegistry<AnyValue>) -> CacheHandle<AnyValue> {
    let cache: CacheHandle<AnyValue> = Arc::new(MapCache::new());
    register_builtin(registry, cache, MapCache::NAME)
}

/// Registers a fresh [`ByteCache`] and returns the provider now registered
/// under its name.
pub fn register_byte_cache(registry: &CacheRegistry<Bytes>) -> CacheHandle<Bytes> {
    let cache: CacheHandle<Bytes> = Arc::new(ByteCache::new());
    register_builtin(registry, cache, ByteCache::NAME)
}

fn register_builtin<V: 'static>(
    registry: &CacheRegistry<V>,
    cache: CacheHandle<V>,
    name: &'static str,
) -> CacheHandle<V> {
    if registry.register(Arc::clone(&cache)) {
        return cache;
    }
    // Already registered: hand back the provider that won
    registry.get(name).unwrap_or(cache)
}
