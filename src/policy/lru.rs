//! Least Recently Used (LRU) eviction engine.
//!
//! A single recency list with the most recently used entry at the front,
//! indexed by a hash map for O(1) access:
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                       LruCore<K, V>                          │
//!   │                                                              │
//!   │   index: FxHashMap<K, NodeId>                                │
//!   │   ┌─────────┬─────────┐                                      │
//!   │   │   Key   │ NodeId  │──┐                                   │
//!   │   └─────────┴─────────┘  │                                   │
//!   │                          ▼                                   │
//!   │   list: IntrusiveList<Entry<K, V>>                           │
//!   │   front ─► [E] ◄──► [D] ◄──► [C] ◄─ back                     │
//!   │            MRU                LRU                            │
//!   └──────────────────────────────────────────────────────────────┘
//!
//!   get(D)             front ─► [D] ◄──► [E] ◄──► [C]   (move to front)
//!   insert(F) (full)   evict [C] from back, push [F] at front
//! ```
//!
//! All mutating operations are O(1). Eviction order is total and stable:
//! least recently used first, ties impossible because accesses are
//! serialized by the caller (or by the lock of the concurrent wrapper).
//!
//! `LruCore` is single-threaded; use
//! [`ConcurrentLruCache`](crate::concurrent::ConcurrentLruCache) or
//! [`ShardedLruCache`](crate::policy::sharded::ShardedLruCache) for shared
//! access.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::intrusive_list::{IntrusiveList, NodeId};
use crate::traits::{CoreCache, MutableCache};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Recency-ordered cache core.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::LruCore;
/// use evictkit::traits::CoreCache;
///
/// let mut cache = LruCore::new(2);
/// cache.insert(1, "one");
/// cache.insert(2, "two");
/// cache.get(&1);          // 1 is now most recent
/// cache.insert(3, "three"); // evicts 2
///
/// assert!(cache.contains(&1));
/// assert!(!cache.contains(&2));
/// ```
pub struct LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    index: FxHashMap<K, NodeId>,
    list: IntrusiveList<Entry<K, V>>,
    capacity: usize,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU cache with the given capacity.
    ///
    /// A capacity of 0 is legal and yields a cache that admits nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            list: IntrusiveList::with_capacity(capacity),
            capacity,
        }
    }

    /// Looks up a value mutably, refreshing its recency.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = *self.index.get(key)?;
        self.list.move_to_front(id);
        self.list.get_mut(id).map(|entry| &mut entry.value)
    }

    /// Returns the value without updating recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Marks a key as most recently used without returning its value.
    ///
    /// Returns `true` if the key was present.
    pub fn touch(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&id) => self.list.move_to_front(id),
            None => false,
        }
    }

    /// Returns the least recently used entry without removing it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.back().map(|entry| (&entry.key, &entry.value))
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let entry = self.list.pop_back()?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.index.len(), self.list.len());
        assert!(self.list.len() <= self.capacity);
        for entry in self.list.iter() {
            assert!(self.index.contains_key(&entry.key));
        }
        self.list.debug_validate_invariants();
    }
}

impl<K, V> CoreCache<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
            let previous = self
                .list
                .get_mut(id)
                .map(|entry| std::mem::replace(&mut entry.value, value));
            self.list.move_to_front(id);
            return previous;
        }

        if self.capacity == 0 {
            return None;
        }

        if self.list.len() >= self.capacity {
            if let Some(evicted) = self.list.pop_back() {
                self.index.remove(&evicted.key);
            }
        }

        let id = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.move_to_front(id);
        self.list.get(id).map(|entry| &entry.value)
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }
}

impl<K, V> MutableCache<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        self.list.remove(id).map(|entry| entry.value)
    }
}

impl<K, V> fmt::Debug for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
