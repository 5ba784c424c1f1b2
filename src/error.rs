//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache operations and provider lookup.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key absent, or present but expired
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Stored payload is not of the requested type (read side only)
    #[error("Wrong type for key {key}: expected {expected}")]
    WrongType {
        key: String,
        expected: &'static str,
    },

    /// Value could not be encoded for storage; nothing was written
    #[error("Cannot encode value for key {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A bulk operation stopped at `key`; earlier keys stay applied
    #[error("Bulk operation failed at key {key}: {source}")]
    Aggregate {
        key: String,
        #[source]
        source: Box<CacheError>,
    },

    /// No provider registered under this name
    #[error("Unknown cache provider: {0}")]
    UnknownProvider(String),
}

impl CacheError {
    /// Wraps a per-key failure of a bulk operation.
    pub fn aggregate(key: impl Into<String>, source: CacheError) -> Self {
        CacheError::Aggregate {
            key: key.into(),
            source: Box::new(source),
        }
    }

    /// Returns true for `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
