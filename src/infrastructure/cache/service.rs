//! Cache service trait and statistics.

use serde::Serialize;

/// Point-in-time counters for one cache instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    /// Returns hits / (hits + misses), or 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Advisory in-memory cache keyed by string.
///
/// A cache is never the source of truth: every value it holds can be rebuilt
/// from storage, so implementations may drop entries at any time. Lookups
/// return owned clones; callers never hold references into the cache.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::LruCache`] - Bounded LRU cache
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
pub trait CacheService<V>: Send + Sync {
    /// Returns a clone of the cached value and marks it most recently used.
    fn get(&self, key: &str) -> Option<V>;

    /// Inserts or replaces a value, evicting the least recently used entry
    /// when the cache is full.
    fn set(&self, key: &str, value: V);

    fn stats(&self) -> CacheStats;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_without_lookups() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..CacheStats::default()
        };
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    }
}
