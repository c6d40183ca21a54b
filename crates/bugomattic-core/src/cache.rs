//! Bounded response cache
//!
//! An explicit cache object owned by whoever needs it. Once `max_entries` is
//! reached, inserting a new key evicts the oldest-inserted entry.

use indexmap::IndexMap;
use std::hash::Hash;
use tracing::trace;

/// Default capacity for interactive sessions
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// Insertion-ordered cache with first-in, first-out eviction
#[derive(Debug, Clone)]
pub struct BoundedCache<K, V> {
    entries: IndexMap<K, V>,
    max_entries: usize,
    hits: u64,
    misses: u64,
}

/// Hit and miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub max_entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl<K: Hash + Eq + std::fmt::Debug, V> BoundedCache<K, V> {
    /// Storage grows on demand, so `max_entries` may come straight from
    /// user input.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            max_entries,
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self.entries.get(key) {
            Some(value) => {
                self.hits += 1;
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Peek without touching the counters
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert a value and return the evicted entry, if any.
    ///
    /// Replacing an existing key keeps its original insertion position.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.max_entries == 0 {
            return None;
        }
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return None;
        }

        let evicted = if self.entries.len() >= self.max_entries {
            self.entries.shift_remove_index(0)
        } else {
            None
        };
        if let Some((evicted_key, _)) = &evicted {
            trace!("Evicted cache entry {:?}", evicted_key);
        }

        self.entries.insert(key, value);
        evicted
    }

    /// Return a copy of the cached value, or compute and store it
    pub fn get_or_insert_with(&mut self, key: K, compute: impl FnOnce() -> V) -> V
    where
        V: Clone,
    {
        if let Some(value) = self.get(&key) {
            return value.clone();
        }
        let value = compute();
        self.insert(key, value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            max_entries: self.max_entries,
            hits: self.hits,
            misses: self.misses,
        }
    }
}

impl<K: Hash + Eq + std::fmt::Debug, V> Default for BoundedCache<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest_inserted() {
        let mut cache = BoundedCache::new(2);
        assert_eq!(cache.insert("a", 1), None);
        assert_eq!(cache.insert("b", 2), None);
        assert_eq!(cache.insert("c", 3), Some(("a", 1)));
        assert!(!cache.contains_key(&"a"));
        assert_eq!(cache.get(&"b"), Some(&2));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_reads_do_not_refresh_position() {
        let mut cache = BoundedCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.get(&"a");
        assert_eq!(cache.insert("c", 3), Some(("a", 1)));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut cache = BoundedCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.insert("a", 10), None);
        assert_eq!(cache.insert("c", 3), Some(("a", 10)));
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut cache = BoundedCache::new(0);
        assert_eq!(cache.insert("a", 1), None);
        assert!(cache.is_empty());
        assert_eq!(cache.get_or_insert_with("a", || 2), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_huge_capacity_does_not_preallocate() {
        let mut cache: BoundedCache<String, String> = BoundedCache::new(usize::MAX);
        assert_eq!(cache.insert("a".to_string(), "1".to_string()), None);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().max_entries, usize::MAX);
    }

    #[test]
    fn test_get_or_insert_with_counts() {
        let mut cache = BoundedCache::new(4);
        assert_eq!(cache.get_or_insert_with("k", || 7), 7);
        assert_eq!(cache.get_or_insert_with("k", || 8), 7);
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }
}
