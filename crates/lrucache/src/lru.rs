//! LRU (Least Recently Used) cache implementation
//!
//! An [`Index`] resolves keys to slots of a [`RecencyList`] that keeps
//! entries ordered from most to least recently used. Every `get` and `put`
//! does at most one map operation and one list move, plus one pop and one
//! map removal when a new key arrives at a full cache.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use tracing::{debug, error, trace};

use crate::capacity::Capacity;
use crate::error::{Error, Result};
use crate::index::Index;
use crate::list::RecencyList;

/// Payload stored in each slot
struct Entry<K, V> {
    key: K,
    value: V,
}

/// LRU cache with fixed capacity
pub struct LruCache<K, V> {
    index: Index<K>,
    list: RecencyList<Entry<K, V>>,
    capacity: Capacity,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache holding at most `capacity` entries
    ///
    /// # Errors
    /// * `Error::InvalidCapacity` - `capacity` is zero
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self::with_capacity(Capacity::new(capacity)?))
    }

    /// Create a new LRU cache from an already validated capacity
    pub fn with_capacity(capacity: Capacity) -> Self {
        debug!(capacity = capacity.get(), "creating LRU cache");

        Self {
            index: Index::with_capacity(capacity.get()),
            list: RecencyList::with_capacity(capacity.get()),
            capacity,
        }
    }

    /// Get a value and mark it most recently used
    ///
    /// # Errors
    /// * `Error::KeyNotFound` - key is absent; the cache is left untouched
    pub fn get<Q>(&mut self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.index.get(key).ok_or(Error::KeyNotFound)?;
        self.list.move_to_front(slot);
        self.list
            .get(slot)
            .map(|entry| &entry.value)
            .ok_or(Error::KeyNotFound)
    }

    /// Get a value, or `default` on a miss. A miss never modifies the cache.
    pub fn get_or<Q>(&mut self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.get(key).cloned().unwrap_or(default)
    }

    /// Mutable variant of [`LruCache::get`]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.index.get(key).ok_or(Error::KeyNotFound)?;
        self.list.move_to_front(slot);
        self.list
            .get_mut(slot)
            .map(|entry| &mut entry.value)
            .ok_or(Error::KeyNotFound)
    }

    /// Read a value without touching recency
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.index.get(key)?;
        self.list.get(slot).map(|entry| &entry.value)
    }

    /// Check for a key without touching recency
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains(key)
    }

    /// Insert or update a key-value pair
    pub fn put(&mut self, key: K, value: V) {
        self.push(key, value);
    }

    /// Insert or update a key-value pair, returning the entry evicted to
    /// make room for it.
    ///
    /// Updating an existing key replaces its value and never evicts.
    pub fn push(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(slot) = self.index.get(&key) {
            if let Some(entry) = self.list.get_mut(slot) {
                entry.value = value;
            }
            self.list.move_to_front(slot);
            return None;
        }

        let evicted = if self.is_full() { self.evict() } else { None };

        let slot = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, slot);

        evicted
    }

    /// Remove a key from the cache
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.index.remove(key)?;
        self.list.remove(slot).map(|entry| entry.value)
    }

    /// Remove and return the least recently used entry
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let entry = self.list.pop_back().ok()?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Get the maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Check if the next new key will evict
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        debug!(len = self.len(), "clearing LRU cache");
        self.index.clear();
        self.list.clear();
    }

    /// Iterate entries from most to least recently used without promoting
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.list.iter().map(|(_, entry)| (&entry.key, &entry.value))
    }

    /// Iterate keys from most to least recently used without promoting
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    fn evict(&mut self) -> Option<(K, V)> {
        debug_assert_eq!(self.index.len(), self.list.len());

        let slot = self.list.back();
        let evicted = self.pop_lru();
        if evicted.is_some() {
            trace!(?slot, len = self.len(), "evicted least recently used entry");
        } else {
            error!(
                index_len = self.index.len(),
                capacity = self.capacity(),
                "cache reported full but recency list is empty"
            );
        }
        evicted
    }

    #[cfg(test)]
    pub(crate) fn debug_validate_invariants(&self) {
        self.list.debug_validate_invariants();
        assert_eq!(self.index.len(), self.list.len());
        assert!(self.len() <= self.capacity());

        for (key, slot) in self.index.iter() {
            let entry = self.list.get(slot).expect("index points at vacant slot");
            assert!(entry.key == *key, "index entry resolves to another key");
        }
    }
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Hash + Eq + Clone + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Put(u8, u16),
        Get(u8),
        Remove(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..16, any::<u16>()).prop_map(|(key, value)| Op::Put(key, value)),
            (0u8..16).prop_map(Op::Get),
            (0u8..16).prop_map(Op::Remove),
        ]
    }

    /// Reference model: entries ordered most to least recently used.
    fn model_put(model: &mut Vec<(u8, u16)>, capacity: usize, key: u8, value: u16) {
        if let Some(pos) = model.iter().position(|(k, _)| *k == key) {
            model.remove(pos);
        } else if model.len() == capacity {
            model.pop();
        }
        model.insert(0, (key, value));
    }

    fn model_get(model: &mut Vec<(u8, u16)>, key: u8) -> Option<u16> {
        let pos = model.iter().position(|(k, _)| *k == key)?;
        let entry = model.remove(pos);
        model.insert(0, entry);
        Some(entry.1)
    }

    proptest! {
        /// len() never exceeds capacity.
        #[test]
        fn prop_len_within_capacity(
            capacity in 1usize..20,
            ops in prop::collection::vec((0u8..64, any::<u16>()), 0..200)
        ) {
            let mut cache = LruCache::new(capacity).unwrap();
            for (key, value) in ops {
                cache.put(key, value);
                prop_assert!(cache.len() <= cache.capacity());
            }
        }

        /// Cache matches a simple ordered model after every operation.
        #[test]
        fn prop_matches_model(
            capacity in 1usize..8,
            ops in prop::collection::vec(op(), 0..200)
        ) {
            let mut cache = LruCache::new(capacity).unwrap();
            let mut model: Vec<(u8, u16)> = Vec::new();

            for op in ops {
                match op {
                    Op::Put(key, value) => {
                        cache.put(key, value);
                        model_put(&mut model, capacity, key, value);
                    }
                    Op::Get(key) => {
                        let expected = model_get(&mut model, key);
                        prop_assert_eq!(cache.get(&key).ok().copied(), expected);
                    }
                    Op::Remove(key) => {
                        let expected = model
                            .iter()
                            .position(|(k, _)| *k == key)
                            .map(|pos| model.remove(pos).1);
                        prop_assert_eq!(cache.remove(&key), expected);
                    }
                }

                cache.debug_validate_invariants();
                let actual: Vec<(u8, u16)> = cache.iter().map(|(k, v)| (*k, *v)).collect();
                prop_assert_eq!(actual, model.clone());
            }
        }

        /// A put of a new key into a full cache evicts exactly the back entry.
        #[test]
        fn prop_evicts_least_recent(
            capacity in 1usize..8,
            keys in prop::collection::vec(0u8..32, 1..64)
        ) {
            let mut cache = LruCache::new(capacity).unwrap();
            for key in keys {
                let lru = cache.keys().last().copied();
                let was_present = cache.contains(&key);
                let was_full = cache.is_full();

                let evicted = cache.push(key, 0u8);

                if !was_present && was_full {
                    prop_assert_eq!(evicted.map(|(k, _)| k), lru);
                    prop_assert_eq!(cache.len(), capacity);
                } else {
                    prop_assert!(evicted.is_none());
                }
                prop_assert_eq!(cache.keys().next().copied(), Some(key));
            }
        }
    }
}
