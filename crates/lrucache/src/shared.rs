//! SharedCache: LruCache behind a single lock

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::capacity::Capacity;
use crate::error::Result;
use crate::lru::LruCache;
use crate::stats::CacheStats;

/// Thread-safe handle to an [`LruCache`]
///
/// The index and the recency list change together, so every call holds one
/// mutex for its whole duration. Clones share the same cache and stats.
pub struct SharedCache<K, V> {
    cache: Arc<Mutex<LruCache<K, V>>>,

    /// Counters shared by every clone of this handle
    stats: Arc<CacheStats>,
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a new SharedCache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of items in cache
    ///
    /// # Returns
    /// * `Result<SharedCache>` - Fails with `InvalidCapacity` on zero
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self::with_capacity(Capacity::new(capacity)?))
    }

    /// Create a new SharedCache from an already validated capacity
    pub fn with_capacity(capacity: Capacity) -> Self {
        Self {
            cache: Arc::new(Mutex::new(LruCache::with_capacity(capacity))),
            stats: Arc::new(CacheStats::new()),
        }
    }

    /// Get a copy of a value, marking it most recently used
    ///
    /// # Returns
    /// * `Result<V>` - `KeyNotFound` on a miss
    pub fn get<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut cache = self.cache.lock();
        match cache.get(key) {
            Ok(value) => {
                self.stats.record_hit();
                Ok(value.clone())
            }
            Err(err) => {
                self.stats.record_miss();
                Err(err)
            }
        }
    }

    /// Get a copy of a value, or `default` on a miss
    pub fn get_or<Q>(&self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).unwrap_or(default)
    }

    /// Insert or update a value
    pub fn put(&self, key: K, value: V) {
        let mut cache = self.cache.lock();
        if cache.contains(&key) {
            self.stats.record_update();
        } else {
            self.stats.record_insert();
        }

        if cache.push(key, value).is_some() {
            self.stats.record_eviction();
        }
    }

    /// Remove a value from the cache
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.lock().remove(key)
    }

    /// Check for a key without touching recency
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.lock().contains(key)
    }

    /// Hit, miss, insert, update and eviction counters
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get current cache size
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.cache.lock().capacity()
    }

    /// Check if the next new key will evict
    pub fn is_full(&self) -> bool {
        self.cache.lock().is_full()
    }

    /// Clear the cache and its statistics
    pub fn clear(&self) {
        let mut cache = self.cache.lock();
        cache.clear();
        self.stats.reset();
    }
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            stats: Arc::clone(&self.stats),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::thread;

    #[test]
    fn test_shared_basic() {
        let cache = SharedCache::new(10).unwrap();

        cache.put(1, String::from("test data"));
        let data = cache.get(&1).unwrap();

        assert_eq!(data, "test data");
        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().misses(), 0);
        assert_eq!(cache.stats().inserts(), 1);
    }

    #[test]
    fn test_shared_invalid_capacity() {
        let result = SharedCache::<u64, u64>::new(0);
        assert!(matches!(result, Err(Error::InvalidCapacity(_))));
    }

    #[test]
    fn test_shared_miss() {
        let cache: SharedCache<u64, u64> = SharedCache::new(2).unwrap();

        assert_eq!(cache.get(&7), Err(Error::KeyNotFound));
        assert_eq!(cache.get_or(&7, 0), 0);
        assert_eq!(cache.stats().misses(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shared_eviction() {
        let cache = SharedCache::new(2).unwrap();

        cache.put(1, 2);
        cache.put(10, 20);
        assert_eq!(cache.get(&1), Ok(2));

        // Cache now: [1 (head), 10 (tail)]
        cache.put(100, 200);

        assert!(cache.is_full());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get_or(&10, -1), -1);
        assert_eq!(cache.get(&1), Ok(2));
        assert_eq!(cache.stats().evictions(), 1);
    }

    #[test]
    fn test_shared_update() {
        let cache = SharedCache::new(2).unwrap();

        cache.put("k", 1);
        cache.put("k", 2);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k"), Ok(2));
        assert_eq!(cache.stats().inserts(), 1);
        assert_eq!(cache.stats().updates(), 1);
    }

    #[test]
    fn test_shared_remove_and_clear() {
        let cache = SharedCache::new(4).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        assert_eq!(cache.remove(&1), Some("a"));
        assert!(!cache.contains(&1));

        cache.get(&2).unwrap();
        cache.clear();

        assert_eq!(cache.len(), 0);
        assert_eq!(cache.capacity(), 4);
        assert_eq!(cache.stats().hits(), 0);
    }

    #[test]
    fn test_shared_clone_and_hit_ratio() {
        let cache = SharedCache::new(3).unwrap();
        let other = cache.clone();

        cache.put(1, 10);
        assert_eq!(other.capacity(), 3);
        assert_eq!(other.get(&1), Ok(10));
        assert_eq!(other.get_or(&2, 0), 0);

        // Both handles read the same counters
        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().misses(), 1);
        assert_eq!(cache.stats().hit_ratio(), 0.5);
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = SharedCache::new(64).unwrap();

        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..100u64 {
                        cache.put(t * 1000 + i, i);
                        let _ = cache.get(&(t * 1000 + i));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 64);
        assert_eq!(cache.stats().inserts(), 400);
        assert_eq!(cache.stats().evictions(), 400 - 64);
    }
}
