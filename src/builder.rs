//! Unified cache builder over all eviction policies.
//!
//! Drivers that compare policies (benchmarks, cross-policy tests) want one
//! value type they can dispatch through; [`Cache`] is that tagged variant
//! over the four cores, built by [`CacheBuilder`].
//!
//! ## Example
//!
//! ```
//! use evictkit::builder::{CacheBuilder, EvictionPolicy};
//!
//! let mut cache = CacheBuilder::new(100).build::<u64, String>(EvictionPolicy::Lru);
//! cache.insert(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//! ```

use std::hash::Hash;

use crate::policy::arc::{ArcCore, DEFAULT_PROMOTE_AFTER};
use crate::policy::lfu::LfuCore;
use crate::policy::lru::LruCore;
use crate::policy::lru_k::LrukCore;
use crate::traits::{CoreCache, MutableCache};

/// Available eviction policies and their tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Least Recently Used.
    Lru,
    /// LRU-K: promoted from a bounded observation history after `k` contacts.
    LruK { history_capacity: usize, k: u32 },
    /// Least Frequently Used; `aging_interval` of 0 disables aging.
    Lfu { aging_interval: u64 },
    /// Adaptive Replacement Cache; `promote_after` accesses move an entry
    /// from the recency list into the frequency list.
    Arc { promote_after: u32 },
}

impl EvictionPolicy {
    /// LRU-K with the conventional K of 2 and a history twice the capacity.
    pub fn lru_2(capacity: usize) -> Self {
        EvictionPolicy::LruK {
            history_capacity: capacity * 2,
            k: 2,
        }
    }

    /// Plain LFU without aging.
    pub fn lfu() -> Self {
        EvictionPolicy::Lfu { aging_interval: 0 }
    }

    /// Classical ARC (promotion on any second access).
    pub fn arc() -> Self {
        EvictionPolicy::Arc {
            promote_after: DEFAULT_PROMOTE_AFTER,
        }
    }
}

enum CacheInner<K, V>
where
    K: Eq + Hash + Clone,
{
    Lru(LruCore<K, V>),
    LruK(LrukCore<K, V>),
    Lfu(LfuCore<K, V>),
    Arc(ArcCore<K, V>),
}

/// Policy-erased cache with a uniform single-threaded API.
pub struct Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: CacheInner<K, V>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Inserts a key-value pair, returning the replaced value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match &mut self.inner {
            CacheInner::Lru(cache) => cache.insert(key, value),
            CacheInner::LruK(cache) => cache.insert(key, value),
            CacheInner::Lfu(cache) => cache.insert(key, value),
            CacheInner::Arc(cache) => cache.insert(key, value),
        }
    }

    /// Looks up a value, updating the policy's metadata on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match &mut self.inner {
            CacheInner::Lru(cache) => cache.get(key),
            CacheInner::LruK(cache) => cache.get(key),
            CacheInner::Lfu(cache) => cache.get(key),
            CacheInner::Arc(cache) => cache.get(key),
        }
    }

    /// Returns `true` if the key is cached.
    pub fn contains(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Lru(cache) => cache.contains(key),
            CacheInner::LruK(cache) => cache.contains(key),
            CacheInner::Lfu(cache) => cache.contains(key),
            CacheInner::Arc(cache) => cache.contains(key),
        }
    }

    /// Removes a key, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        match &mut self.inner {
            CacheInner::Lru(cache) => cache.remove(key),
            CacheInner::LruK(cache) => cache.remove(key),
            CacheInner::Lfu(cache) => cache.remove(key),
            CacheInner::Arc(cache) => cache.remove(key),
        }
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(cache) => cache.len(),
            CacheInner::LruK(cache) => cache.len(),
            CacheInner::Lfu(cache) => cache.len(),
            CacheInner::Arc(cache) => cache.len(),
        }
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of live entries.
    pub fn capacity(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(cache) => cache.capacity(),
            CacheInner::LruK(cache) => cache.capacity(),
            CacheInner::Lfu(cache) => cache.capacity(),
            CacheInner::Arc(cache) => cache.capacity(),
        }
    }

    /// Drops every entry and all auxiliary structures.
    pub fn clear(&mut self) {
        match &mut self.inner {
            CacheInner::Lru(cache) => cache.clear(),
            CacheInner::LruK(cache) => cache.clear(),
            CacheInner::Lfu(cache) => cache.clear(),
            CacheInner::Arc(cache) => cache.clear(),
        }
    }
}

/// Builder for [`Cache`] instances.
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Starts a builder for caches of the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Builds a cache with the chosen eviction policy.
    ///
    /// ```
    /// use evictkit::builder::{CacheBuilder, EvictionPolicy};
    ///
    /// let mut lru = CacheBuilder::new(64).build::<u64, u64>(EvictionPolicy::Lru);
    /// let mut arc = CacheBuilder::new(64).build::<u64, u64>(EvictionPolicy::arc());
    /// lru.insert(1, 1);
    /// arc.insert(1, 1);
    /// ```
    pub fn build<K, V>(self, policy: EvictionPolicy) -> Cache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        let inner = match policy {
            EvictionPolicy::Lru => CacheInner::Lru(LruCore::new(self.capacity)),
            EvictionPolicy::LruK {
                history_capacity,
                k,
            } => CacheInner::LruK(LrukCore::new(self.capacity, history_capacity, k)),
            EvictionPolicy::Lfu { aging_interval } => {
                CacheInner::Lfu(LfuCore::with_aging(self.capacity, aging_interval))
            }
            EvictionPolicy::Arc { promote_after } => {
                CacheInner::Arc(ArcCore::with_promote_after(self.capacity, promote_after))
            }
        };
        Cache { inner }
    }
}
