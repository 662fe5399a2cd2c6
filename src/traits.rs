//! Capability traits shared by every eviction engine.
//!
//! The engines expose one common contract split across two traits:
//!
//! | Trait             | Extends        | Adds                                |
//! |-------------------|----------------|-------------------------------------|
//! | [`CoreCache`]     | -              | insert / get / contains / len / capacity / clear |
//! | [`MutableCache`]  | [`CoreCache`]  | arbitrary key removal               |
//!
//! Lookup misses are the only expected runtime outcome and surface as
//! `None`; there is no error type on this path. `get` may reorder internal
//! metadata (recency, frequency); `contains` never does. `clear` drops every
//! entry and all auxiliary bookkeeping while leaving the capacity unchanged.
//!
//! The single-threaded cores ([`LruCore`](crate::policy::lru::LruCore),
//! [`LrukCore`](crate::policy::lru_k::LrukCore),
//! [`LfuCore`](crate::policy::lfu::LfuCore),
//! [`ArcCore`](crate::policy::arc::ArcCore)) implement both traits; the
//! concurrent and sharded wrappers are generic over them.

/// Operations every cache supports regardless of eviction policy.
///
/// # Example
///
/// ```
/// use evictkit::traits::CoreCache;
/// use evictkit::policy::lru::LruCore;
///
/// fn warm<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.insert(*key, value.clone());
///     }
/// }
///
/// let mut cache = LruCore::new(16);
/// warm(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if the key was
    /// already cached.
    ///
    /// When the cache is full and the key is new, exactly one entry is
    /// evicted according to the policy before the new entry is admitted.
    /// With capacity 0 this is a no-op returning `None`.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Looks up a value, updating the policy's recency/frequency metadata on
    /// a hit. A miss changes nothing except, for probation-based policies,
    /// their observation bookkeeping.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Returns `true` if the key is cached, without touching any metadata.
    fn contains(&self, key: &K) -> bool;

    /// Returns the number of live entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of live entries.
    fn capacity(&self) -> usize;

    /// Drops every entry and all auxiliary structures; capacity unchanged.
    fn clear(&mut self);
}

/// Caches supporting removal of arbitrary keys.
///
/// # Example
///
/// ```
/// use evictkit::traits::{CoreCache, MutableCache};
/// use evictkit::policy::lru::LruCore;
///
/// let mut cache = LruCore::new(16);
/// cache.insert(1, "one");
/// assert_eq!(cache.remove(&1), Some("one"));
/// assert_eq!(cache.remove(&1), None);
/// ```
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes a key, returning its value if it was cached.
    fn remove(&mut self, key: &K) -> Option<V>;
}
