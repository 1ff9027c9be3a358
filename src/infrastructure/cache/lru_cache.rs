//! Bounded in-memory LRU cache.

use std::collections::{BTreeMap, HashMap};

use parking_lot::Mutex;
use tracing::trace;

use super::service::{CacheService, CacheStats};

struct Slot<V> {
    value: V,
    last_used: u64,
}

/// Map plus recency index, always mutated together under one lock.
///
/// `recency` maps the tick of each entry's last use to its key, so the first
/// element is always the least recently used entry.
struct LruState<V> {
    entries: HashMap<String, Slot<V>>,
    recency: BTreeMap<u64, String>,
    tick: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<V> LruState<V> {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.recency.pop_first()?;
        self.entries.remove(&key);
        self.evictions += 1;
        Some(key)
    }
}

/// Thread-safe cache holding at most `capacity` entries.
///
/// Every operation takes a single `parking_lot::Mutex`, so the map and its
/// recency order can never disagree and the entry count never exceeds the
/// capacity, whatever the interleaving of concurrent callers. Touch, insert
/// and eviction are all `O(log n)`.
///
/// A capacity of zero disables storage entirely.
pub struct LruCache<V> {
    name: &'static str,
    capacity: usize,
    state: Mutex<LruState<V>>,
}

impl<V: Clone> LruCache<V> {
    /// Creates an empty cache. `name` labels its metrics.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            capacity,
            state: Mutex::new(LruState {
                entries: HashMap::with_capacity(capacity),
                recency: BTreeMap::new(),
                tick: 0,
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks for a key without touching its recency or the counters.
    pub fn contains(&self, key: &str) -> bool {
        self.state.lock().entries.contains_key(key)
    }
}

impl<V: Clone + Send> CacheService<V> for LruCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let value = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            let tick = state.next_tick();

            match state.entries.get_mut(key) {
                Some(slot) => {
                    let previous = std::mem::replace(&mut slot.last_used, tick);
                    let value = slot.value.clone();
                    state.recency.remove(&previous);
                    state.recency.insert(tick, key.to_string());
                    state.hits += 1;
                    Some(value)
                }
                None => {
                    state.misses += 1;
                    None
                }
            }
        };

        if value.is_some() {
            metrics::counter!("cache_hits_total", "cache" => self.name).increment(1);
        } else {
            metrics::counter!("cache_misses_total", "cache" => self.name).increment(1);
        }

        value
    }

    fn set(&self, key: &str, value: V) {
        if self.capacity == 0 {
            return;
        }

        let evicted = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            let tick = state.next_tick();

            if let Some(slot) = state.entries.get_mut(key) {
                let previous = std::mem::replace(&mut slot.last_used, tick);
                slot.value = value;
                state.recency.remove(&previous);
                state.recency.insert(tick, key.to_string());
                None
            } else {
                let evicted = if state.entries.len() >= self.capacity {
                    state.evict_oldest()
                } else {
                    None
                };

                state.entries.insert(
                    key.to_string(),
                    Slot {
                        value,
                        last_used: tick,
                    },
                );
                state.recency.insert(tick, key.to_string());
                evicted
            }
        };

        if let Some(evicted) = evicted {
            trace!(cache = self.name, key = %evicted, "Evicted least recently used entry");
            metrics::counter!("cache_evictions_total", "cache" => self.name).increment(1);
        }
    }

    fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            entries: state.entries.len(),
            capacity: self.capacity,
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
        }
    }
}
