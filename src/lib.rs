//! Map Cache - A concurrent in-process key/value cache
//!
//! Provides interchangeable cache implementations with lazy TTL expiration
//! behind the [`Cache`] capability trait, and an application-owned
//! [`CacheRegistry`] for provider discovery.
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use map_cache::{register_map_cache, AnyValue, Cache, CacheRegistry};
//!
//! let registry: CacheRegistry<AnyValue> = CacheRegistry::new();
//! let cache = register_map_cache(&registry);
//!
//! cache.set("greeting", Arc::new("hello")).unwrap();
//! cache.set_with_ttl("session", Arc::new(42u32), Duration::from_secs(30)).unwrap();
//!
//! assert!(cache.has("greeting"));
//! assert!(cache.get("missing").is_err());
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod registry;

pub use cache::{AnyValue, ByteCache, Cache, CacheStats, MapCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use registry::{register_byte_cache, register_map_cache, CacheHandle, CacheRegistry};
