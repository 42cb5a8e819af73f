//! Key to slot lookup
//!
//! Holds handles only. The recency list owns the slots, so dropping an
//! index entry never frees anything on its own.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;

use crate::list::SlotId;

/// Hash index from key to slot handle
pub(crate) struct Index<K> {
    map: HashMap<K, SlotId, RandomState>,
}

impl<K: Hash + Eq> Index<K> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<SlotId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key).copied()
    }

    /// Overwrites any existing handle for `key`
    pub(crate) fn insert(&mut self, key: K, slot: SlotId) -> Option<SlotId> {
        self.map.insert(key, slot)
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<SlotId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.remove(key)
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&K, SlotId)> {
        self.map.iter().map(|(key, slot)| (key, *slot))
    }
}
