//! LRU-K eviction engine: promotion-gated LRU with an observation history.
//!
//! Entries do not enter the main cache on first contact. Candidates sit in a
//! bounded, recency-ordered history that counts observations per key and
//! remembers the most recent pending value; once a key has been observed K
//! times it is promoted into the main LRU cache. One-shot scans therefore
//! never displace the resident working set.
//!
//! ```text
//!   put(k, v) / get(k) miss                 promotion at K observations
//!   ──────────────────────►  history (LRU, cap H)  ───────────────────►  main (LRU, cap N)
//!                            key -> { count, pending value }
//! ```
//!
//! The history is itself an [`LruCore`] so stale candidates age out together
//! with their pending values. A key lives in the main cache or in the
//! history, never in both: hits in the main cache touch only the main
//! recency list. With K = 1 the history is bypassed entirely and the engine
//! behaves exactly like [`LruCore`].
//!
//! A `get` that triggers promotion counts as a single observation and
//! reports a hit with the promoted value.

use std::fmt;
use std::hash::Hash;

use crate::policy::lru::LruCore;
use crate::traits::{CoreCache, MutableCache};

#[derive(Debug)]
struct HistorySlot<V> {
    observations: u32,
    pending: Option<V>,
}

/// Promotion-gated LRU cache core.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru_k::LrukCore;
/// use evictkit::traits::CoreCache;
///
/// let mut cache = LrukCore::new(4, 8, 2);
/// cache.insert(1, "one");          // first observation: still on probation
/// assert_eq!(cache.len(), 0);
/// assert_eq!(cache.get(&1), Some(&"one")); // second observation: promoted
/// assert_eq!(cache.len(), 1);
/// ```
pub struct LrukCore<K, V>
where
    K: Eq + Hash + Clone,
{
    main: LruCore<K, V>,
    history: LruCore<K, HistorySlot<V>>,
    k: u32,
}

impl<K, V> LrukCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU-K cache.
    ///
    /// `capacity` bounds the main cache, `history_capacity` bounds the
    /// candidate history, and `k` is the number of observations required for
    /// promotion. `k = 0` is clamped to 1; `k = 1` reduces to plain LRU.
    pub fn new(capacity: usize, history_capacity: usize, k: u32) -> Self {
        Self {
            main: LruCore::new(capacity),
            history: LruCore::new(history_capacity),
            k: k.max(1),
        }
    }

    /// Returns the promotion threshold K.
    pub fn k_value(&self) -> u32 {
        self.k
    }

    /// Returns the number of candidates currently on probation.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Returns the candidate capacity of the history.
    pub fn history_capacity(&self) -> usize {
        self.history.capacity()
    }

    /// Returns the observation count for a key on probation.
    pub fn observations(&self, key: &K) -> Option<u32> {
        self.history.peek(key).map(|slot| slot.observations)
    }

    /// Records one observation on the miss path; promotes when it reaches K
    /// and a value is pending. Returns `true` on promotion.
    fn observe_miss(&mut self, key: &K, pending: Option<V>) -> bool {
        let record_value = pending.is_some();
        let (count, has_value) = match self.history.get_mut(key) {
            Some(slot) => {
                slot.observations += 1;
                if let Some(value) = pending {
                    slot.pending = Some(value);
                }
                (slot.observations, slot.pending.is_some())
            }
            None => {
                self.history.insert(
                    key.clone(),
                    HistorySlot {
                        observations: 1,
                        pending,
                    },
                );
                (1, record_value)
            }
        };

        if count >= self.k {
            if has_value {
                if let Some(slot) = self.history.remove(key) {
                    if let Some(value) = slot.pending {
                        self.main.insert(key.clone(), value);
                        return true;
                    }
                }
            } else if let Some(slot) = self.history.get_mut(key) {
                // Keep the stored count below K until a value arrives.
                slot.observations = self.k - 1;
            }
        }
        false
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.main.debug_validate_invariants();
        self.history.debug_validate_invariants();
    }
}

impl<K, V> CoreCache<K, V> for LrukCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.main.contains(&key) {
            return self.main.insert(key, value);
        }
        if self.main.capacity() == 0 {
            return None;
        }
        if self.k == 1 {
            return self.main.insert(key, value);
        }
        self.observe_miss(&key, Some(value));
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        if self.main.contains(key) {
            return self.main.get(key);
        }
        if self.main.capacity() == 0 || self.k == 1 {
            return None;
        }
        if self.observe_miss(key, None) {
            return self.main.get(key);
        }
        None
    }

    fn contains(&self, key: &K) -> bool {
        self.main.contains(key)
    }

    fn len(&self) -> usize {
        self.main.len()
    }

    fn capacity(&self) -> usize {
        self.main.capacity()
    }

    fn clear(&mut self) {
        self.main.clear();
        self.history.clear();
    }
}

impl<K, V> MutableCache<K, V> for LrukCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        // The key may be resident or still on probation; drop either record.
        let resident = self.main.remove(key);
        if resident.is_none() {
            self.history.remove(key);
        }
        resident
    }
}

impl<K, V> fmt::Debug for LrukCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LrukCore")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("history_len", &self.history.len())
            .field("k", &self.k)
            .finish_non_exhaustive()
    }
}
