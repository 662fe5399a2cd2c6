//! Sharded cache wrapper: hash-partitioned engines for contention relief.
//!
//! A total capacity N is split across S independent engine instances, each
//! guarded by its own lock; a key is routed to `hash(key) mod S` via a
//! [`ShardSelector`]. Operations on keys in different shards proceed
//! concurrently, and there are no cross-shard transactions: eviction order
//! is defined per shard only, and the reported length is the sum of the
//! shard lengths.
//!
//! Each shard gets capacity `ceil(N / S)`, so the effective total capacity
//! is `S * ceil(N / S)` (at most `N + S - 1`). When the shard count is not
//! given it defaults to the hardware concurrency hint, minimum 1.

use std::hash::Hash;
use std::marker::PhantomData;

use parking_lot::Mutex;

use crate::ds::shard::ShardSelector;
use crate::policy::arc::{ArcCore, DEFAULT_PROMOTE_AFTER};
use crate::policy::lfu::LfuCore;
use crate::policy::lru::LruCore;
use crate::policy::lru_k::LrukCore;
use crate::traits::MutableCache;

/// Hash-partitioned cache over independent engine instances.
///
/// Use the per-policy aliases and their constructors:
/// [`ShardedLruCache`], [`ShardedLrukCache`], [`ShardedLfuCache`],
/// [`ShardedArcCache`].
///
/// # Example
///
/// ```
/// use evictkit::policy::sharded::ShardedLruCache;
///
/// let cache: ShardedLruCache<u64, String> = ShardedLruCache::with_shards(100, 4);
/// cache.insert(1, "one".to_string());
/// assert_eq!(cache.get(&1), Some("one".to_string()));
/// assert_eq!(cache.shard_count(), 4);
/// ```
pub struct ShardedCache<K, V, C> {
    shards: Vec<Mutex<C>>,
    selector: ShardSelector,
    _marker: PhantomData<fn(K) -> V>,
}

/// Sharded recency cache.
pub type ShardedLruCache<K, V> = ShardedCache<K, V, LruCore<K, V>>;
/// Sharded promotion-gated cache.
pub type ShardedLrukCache<K, V> = ShardedCache<K, V, LrukCore<K, V>>;
/// Sharded frequency cache.
pub type ShardedLfuCache<K, V> = ShardedCache<K, V, LfuCore<K, V>>;
/// Sharded adaptive cache.
pub type ShardedArcCache<K, V> = ShardedCache<K, V, ArcCore<K, V>>;

/// Hardware concurrency hint, used when no shard count is given.
fn default_shard_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Capacity of each shard for a requested total.
fn shard_capacity(total_capacity: usize, shards: usize) -> usize {
    total_capacity.div_ceil(shards)
}

impl<K, V, C> ShardedCache<K, V, C>
where
    K: Eq + Hash,
    C: MutableCache<K, V>,
{
    fn from_shards(shards: Vec<C>) -> Self {
        let selector = ShardSelector::new(shards.len(), 0);
        Self {
            shards: shards.into_iter().map(Mutex::new).collect(),
            selector,
            _marker: PhantomData,
        }
    }

    /// Returns the number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Returns the shard index a key routes to.
    pub fn shard_for(&self, key: &K) -> usize {
        self.selector.shard_for_key(key)
    }

    fn shard(&self, key: &K) -> &Mutex<C> {
        &self.shards[self.selector.shard_for_key(key)]
    }

    /// Inserts into the key's shard, returning the replaced value.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.shard(&key).lock().insert(key, value)
    }

    /// Looks up in the key's shard, copying the value out.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.shard(key).lock().get(key).cloned()
    }

    /// Returns `true` if the key's shard holds it.
    pub fn contains(&self, key: &K) -> bool {
        self.shard(key).lock().contains(key)
    }

    /// Removes from the key's shard.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.shard(key).lock().remove(key)
    }

    /// Sum of per-shard entry counts.
    ///
    /// Each shard is read under its own lock; under concurrent mutation the
    /// result is a point-in-time approximation, not a global snapshot.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    /// Returns `true` if every shard is empty.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.lock().is_empty())
    }

    /// Sum of per-shard capacities: `S * ceil(N / S)` for a requested N.
    pub fn capacity(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.lock().capacity())
            .sum()
    }

    /// Clears every shard. Shards are cleared one at a time; concurrent
    /// inserts into already-cleared shards may survive.
    pub fn clear(&self) {
        for shard in &self.shards {
            shard.lock().clear();
        }
    }
}

impl<K, V> ShardedLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Sharded LRU with the default shard count (hardware concurrency).
    pub fn new(total_capacity: usize) -> Self {
        Self::with_shards(total_capacity, default_shard_count())
    }

    /// Sharded LRU with an explicit shard count (0 is clamped to 1).
    pub fn with_shards(total_capacity: usize, shards: usize) -> Self {
        let shards = shards.max(1);
        let per_shard = shard_capacity(total_capacity, shards);
        Self::from_shards((0..shards).map(|_| LruCore::new(per_shard)).collect())
    }
}

impl<K, V> ShardedLrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Sharded LRU-K with the default shard count. The history capacity is
    /// split across shards the same way as the main capacity.
    pub fn new(total_capacity: usize, history_capacity: usize, k: u32) -> Self {
        Self::with_shards(
            total_capacity,
            history_capacity,
            k,
            default_shard_count(),
        )
    }

    /// Sharded LRU-K with an explicit shard count (0 is clamped to 1).
    pub fn with_shards(
        total_capacity: usize,
        history_capacity: usize,
        k: u32,
        shards: usize,
    ) -> Self {
        let shards = shards.max(1);
        let per_shard = shard_capacity(total_capacity, shards);
        let history_per_shard = shard_capacity(history_capacity, shards);
        Self::from_shards(
            (0..shards)
                .map(|_| LrukCore::new(per_shard, history_per_shard, k))
                .collect(),
        )
    }
}

impl<K, V> ShardedLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Sharded LFU without aging, default shard count.
    pub fn new(total_capacity: usize) -> Self {
        Self::with_shards(total_capacity, 0, default_shard_count())
    }

    /// Sharded LFU with an aging interval applied per shard
    /// (0 disables aging) and an explicit shard count (0 is clamped to 1).
    pub fn with_shards(total_capacity: usize, aging_interval: u64, shards: usize) -> Self {
        let shards = shards.max(1);
        let per_shard = shard_capacity(total_capacity, shards);
        Self::from_shards(
            (0..shards)
                .map(|_| LfuCore::with_aging(per_shard, aging_interval))
                .collect(),
        )
    }
}

impl<K, V> ShardedArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Sharded ARC with the classical promotion rule, default shard count.
    pub fn new(total_capacity: usize) -> Self {
        Self::with_shards(total_capacity, DEFAULT_PROMOTE_AFTER, default_shard_count())
    }

    /// Sharded ARC with an explicit promotion threshold and shard count
    /// (0 shards is clamped to 1).
    pub fn with_shards(total_capacity: usize, promote_after: u32, shards: usize) -> Self {
        let shards = shards.max(1);
        let per_shard = shard_capacity(total_capacity, shards);
        Self::from_shards(
            (0..shards)
                .map(|_| ArcCore::with_promote_after(per_shard, promote_after))
                .collect(),
        )
    }
}
