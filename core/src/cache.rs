//! Bounded memo table used by the query and aggregation engines.
//!
//! Capacity is fixed at construction. With [`CachePolicy::InsertionOrder`]
//! the oldest inserted entry is evicted and reads do not refresh it (plain
//! FIFO). [`CachePolicy::LeastRecentlyUsed`] moves an entry to the back on
//! every hit. A capacity of 0 stores nothing.

use std::collections::VecDeque;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

use conflux_types::{CachePolicy, CacheStats};
use hashbrown::HashMap;

#[derive(Debug)]
pub struct BoundedCache<K, V> {
    entries: HashMap<K, V>,
    /// Front is the next eviction victim
    order: VecDeque<K>,
    capacity: usize,
    policy: CachePolicy,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(capacity: usize, policy: CachePolicy) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
            policy,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    pub fn get(&mut self, key: &K) -> Option<V> {
        let Some(value) = self.entries.get(key) else {
            self.misses += 1;
            return None;
        };
        let value = value.clone();
        self.hits += 1;
        if self.policy == CachePolicy::LeastRecentlyUsed {
            self.touch(key);
        }
        Some(value)
    }

    pub fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(key.clone(), value).is_some() {
            if self.policy == CachePolicy::LeastRecentlyUsed {
                self.touch(&key);
            }
            return;
        }
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                self.evictions += 1;
            }
        }
    }

    fn touch(&mut self, key: &K) {
        if let Some(pos) = self.order.iter().position(|k| k == key)
            && let Some(k) = self.order.remove(pos)
        {
            self.order.push_back(k);
        }
    }

    /// Drop all entries. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            capacity: self.capacity,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
        }
    }
}

/// Lock a cache mutex. A poisoned cache is still structurally valid, so keep using it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sum two stats snapshots (used to report several caches as one).
pub(crate) fn merge_stats(a: CacheStats, b: CacheStats) -> CacheStats {
    CacheStats {
        entries: a.entries + b.entries,
        capacity: a.capacity + b.capacity,
        hits: a.hits + b.hits,
        misses: a.misses + b.misses,
        evictions: a.evictions + b.evictions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_evicts_oldest_inserted_even_after_hit() {
        let mut cache = BoundedCache::new(2, CachePolicy::InsertionOrder);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.get(&"a"), Some(1));
        cache.insert("c", 3);

        assert!(!cache.contains(&"a"));
        assert!(cache.contains(&"b"));
        assert!(cache.contains(&"c"));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_lru_keeps_recently_read_entry() {
        let mut cache = BoundedCache::new(2, CachePolicy::LeastRecentlyUsed);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.get(&"a"), Some(1));
        cache.insert("c", 3);

        assert!(cache.contains(&"a"));
        assert!(!cache.contains(&"b"));
    }

    #[test]
    fn test_reinsert_replaces_without_growing() {
        let mut cache = BoundedCache::new(2, CachePolicy::InsertionOrder);
        cache.insert("a", 1);
        cache.insert("a", 5);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"a"), Some(5));
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut cache = BoundedCache::new(0, CachePolicy::InsertionOrder);
        cache.insert("a", 1);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_clear_keeps_counters() {
        let mut cache = BoundedCache::new(4, CachePolicy::InsertionOrder);
        cache.insert("a", 1);
        cache.get(&"a");
        cache.get(&"b");
        cache.clear();

        let stats = cache.stats();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }
}
