//! No-op cache implementation for disabled caching.

use super::service::{CacheService, CacheStats};
use tracing::debug;

/// A cache implementation that stores nothing.
///
/// Every lookup misses, so all reads go to storage. Used when a cache capacity
/// of zero is configured and in tests that exercise the storage path.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CacheService<V> for NullCache {
    fn get(&self, _key: &str) -> Option<V> {
        None
    }

    fn set(&self, _key: &str, _value: V) {}

    fn stats(&self) -> CacheStats {
        CacheStats::default()
    }
}
