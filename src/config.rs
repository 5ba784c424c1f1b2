//! Configuration Module
//!
//! Handles loading store tuning parameters from environment variables.

use std::env;

use tracing::warn;

/// Store configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Neither value bounds how many entries the cache may hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Number of entries to pre-allocate room for
    pub initial_capacity: usize,
    /// Number of map shards, None = dashmap's default
    pub shard_amount: Option<usize>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAP_CACHE_INITIAL_CAPACITY` - Pre-allocated entries (default: 0)
    /// - `MAP_CACHE_SHARDS` - Shard count, a power of two greater than 1
    ///   (default: derived from the number of CPUs)
    pub fn from_env() -> Self {
        Self {
            initial_capacity: env::var("MAP_CACHE_INITIAL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            shard_amount: env::var("MAP_CACHE_SHARDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .and_then(Self::checked_shard_amount),
        }
    }

    /// Sets the shard count, ignoring values dashmap would reject.
    pub fn with_shard_amount(mut self, shard_amount: usize) -> Self {
        self.shard_amount = Self::checked_shard_amount(shard_amount);
        self
    }

    /// Sets the pre-allocated capacity.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    fn checked_shard_amount(shard_amount: usize) -> Option<usize> {
        if shard_amount > 1 && shard_amount.is_power_of_two() {
            Some(shard_amount)
        } else {
            warn!(
                "Ignoring shard amount {}: must be a power of two greater than 1",
                shard_amount
            );
            None
        }
    }
}
