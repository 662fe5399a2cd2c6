//! Bounded recency list of keys without values.
//!
//! Adaptive policies track recently evicted keys ("ghosts") to detect when
//! the working set shifted and an evicted entry should have been kept. A
//! ghost list stores only keys, ordered by recency, and caps its own size:
//! recording a new key when full drops the least recently seen ghost.
//!
//! Backed by an [`IntrusiveList`] for O(1) reordering plus an `FxHashMap`
//! index for O(1) membership checks.

use rustc_hash::FxHashMap;
use std::hash::Hash;

use crate::ds::intrusive_list::{IntrusiveList, NodeId};

/// Bounded recency list of keys, used for ARC-style ghost tracking.
///
/// # Example
///
/// ```
/// use evictkit::ds::GhostList;
///
/// let mut ghost = GhostList::new(2);
/// ghost.record("a");
/// ghost.record("b");
/// ghost.record("c"); // at capacity: "a" is dropped
///
/// assert!(!ghost.contains(&"a"));
/// assert!(ghost.contains(&"b"));
/// assert!(ghost.contains(&"c"));
/// ```
#[derive(Debug)]
pub struct GhostList<K> {
    list: IntrusiveList<K>,
    index: FxHashMap<K, NodeId>,
    capacity: usize,
}

impl<K> GhostList<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates a ghost list holding at most `capacity` keys.
    ///
    /// A capacity of 0 creates a no-op list that ignores all records.
    pub fn new(capacity: usize) -> Self {
        Self {
            list: IntrusiveList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            capacity,
        }
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns `true` if `key` is present. This is the ghost-hit check.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Records `key` as most recently seen, dropping the oldest ghost if full.
    ///
    /// Re-recording a tracked key promotes it to the most recent position.
    pub fn record(&mut self, key: K) {
        if self.capacity == 0 {
            return;
        }

        if let Some(&id) = self.index.get(&key) {
            self.list.move_to_front(id);
            return;
        }

        if self.list.len() >= self.capacity {
            if let Some(old) = self.list.pop_back() {
                self.index.remove(&old);
            }
        }

        let id = self.list.push_front(key.clone());
        self.index.insert(key, id);
    }

    /// Removes `key`; returns `true` if it was tracked.
    ///
    /// Called after a ghost hit so the key is not counted twice.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(id) => {
                self.list.remove(id);
                true
            }
            None => false,
        }
    }

    /// Drops and returns the least recently seen ghost.
    pub fn pop_oldest(&mut self) -> Option<K> {
        let key = self.list.pop_back()?;
        self.index.remove(&key);
        Some(key)
    }

    /// Forgets all tracked keys.
    pub fn clear(&mut self) {
        self.list.clear();
        self.index.clear();
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.list.len(), self.index.len());
        assert!(self.list.len() <= self.capacity);
        for key in self.list.iter() {
            assert!(self.index.contains_key(key));
        }
        self.list.debug_validate_invariants();
    }
}
