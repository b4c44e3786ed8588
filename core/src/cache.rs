use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::search::SearchHit;

pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Composite cache key: distinct filter combinations never collide because
/// every dimension that affects the result set is part of the key.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct QueryKey {
    pub query: String,
    pub category: Option<String>,
    pub level: Option<String>,
    pub limit: usize,
}

/// Bounded memoization of ranked search results. Purely a latency
/// optimization: a disabled cache must yield identical results, and the
/// engine clears it wholesale on every index rebuild.
pub struct QueryCache {
    entries: Mutex<LruCache<QueryKey, Vec<SearchHit>>>,
    capacity: usize,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl QueryCache {
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(cap)),
            capacity: cap.get(),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn get(&self, key: &QueryKey) -> Option<Vec<SearchHit>> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(hits) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(hits.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn put(&self, key: QueryKey, hits: Vec<SearchHit>) {
        self.entries.lock().put(key, hits);
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
            capacity: self.capacity,
        }
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(query: &str, limit: usize) -> QueryKey {
        QueryKey { query: query.into(), category: None, level: None, limit }
    }

    #[test]
    fn capacity_is_enforced() {
        let cache = QueryCache::new(2);
        cache.put(key("a", 10), Vec::new());
        cache.put(key("b", 10), Vec::new());
        cache.put(key("c", 10), Vec::new());
        assert_eq!(cache.len(), 2);
        // Oldest entry was evicted.
        assert!(cache.get(&key("a", 10)).is_none());
        assert!(cache.get(&key("c", 10)).is_some());
    }

    #[test]
    fn distinct_limits_do_not_collide() {
        let cache = QueryCache::default();
        cache.put(key("hei", 1), Vec::new());
        assert!(cache.get(&key("hei", 2)).is_none());
        assert!(cache.get(&key("hei", 1)).is_some());
    }

    #[test]
    fn stats_count_hits_and_misses() {
        let cache = QueryCache::default();
        cache.get(&key("hei", 10));
        cache.put(key("hei", 10), Vec::new());
        cache.get(&key("hei", 10));
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }
}
