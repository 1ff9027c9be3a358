//! Caching layer shielding storage from repeated reads.
//!
//! Provides a [`CacheService`] trait with two implementations:
//! - [`LruCache`] - Bounded in-process LRU cache
//! - [`NullCache`] - No-op implementation for disabled caching
//!
//! Caches are constructed explicitly and owned by the services that use
//! them, so each test can build fresh instances.

mod lru_cache;
mod null_cache;
mod service;

pub use lru_cache::LruCache;
pub use null_cache::NullCache;
pub use service::{CacheService, CacheStats};

use std::sync::Arc;

/// Builds the cache for a configured capacity: [`LruCache`] when positive,
/// [`NullCache`] when zero.
pub fn build_cache<V>(name: &'static str, capacity: usize) -> Arc<dyn CacheService<V>>
where
    V: Clone + Send + 'static,
{
    if capacity == 0 {
        tracing::info!(cache = name, "Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    } else {
        tracing::info!(cache = name, capacity, "Cache enabled (in-memory LRU)");
        Arc::new(LruCache::new(name, capacity))
    }
}
