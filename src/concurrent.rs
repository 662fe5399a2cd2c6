//! Thread-safe cache wrappers.
//!
//! [`ConcurrentCache`] wraps any engine core in `Arc<parking_lot::Mutex<_>>`.
//! Each instance holds exactly one lock covering all of its index
//! structures; every operation acquires it on entry and releases it on every
//! exit path via the guard. Operations on one instance are therefore
//! linearizable in lock-acquisition order. The lock is never held across
//! user code other than the key's `Hash`/`Eq` and the value's `Clone`.
//!
//! `get` copies the value out (`V: Clone`) rather than handing out a
//! reference into the cache, so callers never pin internal storage.
//! Cloning the wrapper clones the `Arc`: all clones share one cache.

use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::policy::arc::{ArcCore, DEFAULT_PROMOTE_AFTER};
use crate::policy::lfu::LfuCore;
use crate::policy::lru::LruCore;
use crate::policy::lru_k::LrukCore;
use crate::traits::MutableCache;

/// Shared, lock-protected cache handle.
///
/// Use the per-policy aliases and their constructors:
/// [`ConcurrentLruCache`], [`ConcurrentLrukCache`], [`ConcurrentLfuCache`],
/// [`ConcurrentArcCache`].
///
/// # Example
///
/// ```
/// use evictkit::concurrent::ConcurrentLruCache;
///
/// let cache: ConcurrentLruCache<u64, String> = ConcurrentLruCache::new(100);
/// let worker = cache.clone();
/// std::thread::spawn(move || {
///     worker.insert(1, "one".to_string());
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(cache.get(&1), Some("one".to_string()));
/// ```
pub struct ConcurrentCache<K, V, C> {
    inner: Arc<Mutex<C>>,
    _marker: PhantomData<fn(K) -> V>,
}

/// Shared recency cache.
pub type ConcurrentLruCache<K, V> = ConcurrentCache<K, V, LruCore<K, V>>;
/// Shared promotion-gated cache.
pub type ConcurrentLrukCache<K, V> = ConcurrentCache<K, V, LrukCore<K, V>>;
/// Shared frequency cache.
pub type ConcurrentLfuCache<K, V> = ConcurrentCache<K, V, LfuCore<K, V>>;
/// Shared adaptive cache.
pub type ConcurrentArcCache<K, V> = ConcurrentCache<K, V, ArcCore<K, V>>;

impl<K, V, C> Clone for ConcurrentCache<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _marker: PhantomData,
        }
    }
}

impl<K, V, C> ConcurrentCache<K, V, C>
where
    K: Eq + Hash,
    C: MutableCache<K, V>,
{
    /// Wraps an engine core in a shared lock.
    pub fn from_core(core: C) -> Self {
        Self {
            inner: Arc::new(Mutex::new(core)),
            _marker: PhantomData,
        }
    }

    /// Inserts a key-value pair, returning the replaced value.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().insert(key, value)
    }

    /// Looks up a value, copying it out of the cache.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Returns `true` if the key is cached; does not touch eviction metadata.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Removes a key, returning its value.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns the maximum number of live entries.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Drops every entry; capacity unchanged.
    pub fn clear(&self) {
        self.inner.lock().clear()
    }

    /// Runs `f` on the locked core, for policy-specific introspection.
    pub fn with_core<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl<K, V> ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Shared LRU cache with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self::from_core(LruCore::new(capacity))
    }
}

impl<K, V> ConcurrentLrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Shared LRU-K cache; see [`LrukCore::new`] for parameter semantics.
    pub fn new(capacity: usize, history_capacity: usize, k: u32) -> Self {
        Self::from_core(LrukCore::new(capacity, history_capacity, k))
    }
}

impl<K, V> ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Shared LFU cache without aging.
    pub fn new(capacity: usize) -> Self {
        Self::from_core(LfuCore::new(capacity))
    }

    /// Shared LFU cache that ages every `aging_interval` operations
    /// (0 disables aging).
    pub fn with_aging(capacity: usize, aging_interval: u64) -> Self {
        Self::from_core(LfuCore::with_aging(capacity, aging_interval))
    }
}

impl<K, V> ConcurrentArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Shared ARC cache with the classical promotion rule.
    pub fn new(capacity: usize) -> Self {
        Self::from_core(ArcCore::with_promote_after(capacity, DEFAULT_PROMOTE_AFTER))
    }

    /// Shared ARC cache with an explicit T1 -> T2 promotion threshold.
    pub fn with_promote_after(capacity: usize, promote_after: u32) -> Self {
        Self::from_core(ArcCore::with_promote_after(capacity, promote_after))
    }
}
