//! Adaptive Replacement Cache (ARC) eviction engine.
//!
//! ARC balances recency against frequency at runtime. It keeps two value
//! lists and two ghost lists, plus a tuning parameter `p` that is the target
//! size of the recency list:
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────────┐
//!   │                          ArcCore<K, V>                            │
//!   │                                                                   │
//!   │   T1 (recent, values)             T2 (frequent, values)           │
//!   │   MRU ─► [..] ◄──► [..] ◄─ LRU    MRU ─► [..] ◄──► [..] ◄─ LRU    │
//!   │              │ evict                         │ evict              │
//!   │              ▼                               ▼                    │
//!   │   B1 (ghost keys of T1)           B2 (ghost keys of T2)           │
//!   │                                                                   │
//!   │   |T1| + |T2| ≤ N     |B1| ≤ N     |B2| ≤ N     0 ≤ p ≤ N         │
//!   └───────────────────────────────────────────────────────────────────┘
//!
//!   put hit in B1: the entry was evicted too early from the recency side
//!                  -> grow p (favour T1), re-admit straight into T2
//!   put hit in B2: the frequency side is being squeezed
//!                  -> shrink p (favour T2), re-admit straight into T2
//! ```
//!
//! REPLACE is the single mechanism that turns a cached entry into a ghost:
//! it evicts the LRU of T1 into B1 when T1 exceeds its target `p` (or, on a
//! B2 ghost hit, meets it), otherwise the LRU of T2 into B2, falling back to
//! whichever list is non-empty.
//!
//! New keys enter at the T1 MRU end and are promoted to T2 once they have
//! been accessed `promote_after` times (insertion counts as the first
//! access; the default of 2 is the classical promote-on-second-access
//! rule). Ghost bookkeeping happens only on `put`; a plain `get` miss
//! changes nothing.
//!
//! Reference: Megiddo & Modha, "ARC: A Self-Tuning, Low Overhead
//! Replacement Cache", FAST 2003.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::ghost_list::GhostList;
use crate::ds::intrusive_list::{IntrusiveList, NodeId};
use crate::traits::{CoreCache, MutableCache};

/// Which value list an entry currently occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Residence {
    T1(NodeId),
    T2(NodeId),
}

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    /// Accesses observed while the entry sits in T1 (insertion counts as 1).
    t1_hits: u32,
}

/// Default number of T1 accesses before promotion to T2.
pub const DEFAULT_PROMOTE_AFTER: u32 = 2;

/// Adaptive cache core with self-tuning recency/frequency split.
///
/// # Example
///
/// ```
/// use evictkit::policy::arc::ArcCore;
/// use evictkit::traits::CoreCache;
///
/// let mut cache = ArcCore::new(2);
/// cache.insert(1, "a");      // enters T1
/// cache.get(&1);             // second access: promoted to T2
/// assert_eq!(cache.t2_len(), 1);
/// ```
pub struct ArcCore<K, V>
where
    K: Eq + Hash + Clone,
{
    index: FxHashMap<K, Residence>,
    t1: IntrusiveList<Entry<K, V>>,
    t2: IntrusiveList<Entry<K, V>>,
    b1: GhostList<K>,
    b2: GhostList<K>,
    /// Target size of T1; adapted on ghost hits, clamped to `[0, capacity]`.
    p: usize,
    promote_after: u32,
    capacity: usize,
}

impl<K, V> ArcCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an ARC cache with the classical promotion rule
    /// (any second access moves an entry from T1 to T2).
    pub fn new(capacity: usize) -> Self {
        Self::with_promote_after(capacity, DEFAULT_PROMOTE_AFTER)
    }

    /// Creates an ARC cache that promotes from T1 to T2 only after
    /// `promote_after` accesses (insertion counts as the first).
    ///
    /// A threshold of 0 is clamped to 1. The tuning parameter `p` starts
    /// at 0, so a cold cache evicts from the recency side first.
    pub fn with_promote_after(capacity: usize, promote_after: u32) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            t1: IntrusiveList::with_capacity(capacity),
            t2: IntrusiveList::with_capacity(capacity),
            b1: GhostList::new(capacity),
            b2: GhostList::new(capacity),
            p: 0,
            promote_after: promote_after.max(1),
            capacity,
        }
    }

    /// Current value of the tuning parameter `p` (target size of T1).
    pub fn p_value(&self) -> usize {
        self.p
    }

    /// Number of entries in the recency list T1.
    pub fn t1_len(&self) -> usize {
        self.t1.len()
    }

    /// Number of entries in the frequency list T2.
    pub fn t2_len(&self) -> usize {
        self.t2.len()
    }

    /// Number of ghost keys tracking T1 evictions.
    pub fn b1_len(&self) -> usize {
        self.b1.len()
    }

    /// Number of ghost keys tracking T2 evictions.
    pub fn b2_len(&self) -> usize {
        self.b2.len()
    }

    /// Configured T1 -> T2 promotion threshold.
    pub fn promote_after(&self) -> u32 {
        self.promote_after
    }

    fn live(&self) -> usize {
        self.t1.len() + self.t2.len()
    }

    /// Moves the LRU of T1 into ghost B1, or of T2 into ghost B2, based on
    /// the tuning parameter. Falls back to the non-empty list.
    fn replace(&mut self, b2_hit: bool) {
        let from_t1 = if self.t1.is_empty() {
            false
        } else if self.t2.is_empty() {
            true
        } else {
            self.t1.len() > self.p || (b2_hit && self.t1.len() == self.p)
        };

        if from_t1 {
            if let Some(victim) = self.t1.pop_back() {
                self.index.remove(&victim.key);
                self.b1.record(victim.key);
            }
        } else if let Some(victim) = self.t2.pop_back() {
            self.index.remove(&victim.key);
            self.b2.record(victim.key);
        }
    }

    /// Re-links an entry currently in T1 at the T2 MRU end.
    fn promote_to_t2(&mut self, id: NodeId) {
        if let Some(entry) = self.t1.remove(id) {
            let key = entry.key.clone();
            let new_id = self.t2.push_front(entry);
            self.index.insert(key, Residence::T2(new_id));
        }
    }

    /// Admits a key straight into T2 after a ghost hit.
    fn admit_to_t2(&mut self, key: K, value: V) {
        let id = self.t2.push_front(Entry {
            key: key.clone(),
            value,
            t1_hits: self.promote_after,
        });
        self.index.insert(key, Residence::T2(id));
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.index.len(), self.live());
        assert!(self.live() <= self.capacity);
        assert!(self.p <= self.capacity);
        assert!(self.b1.len() <= self.capacity);
        assert!(self.b2.len() <= self.capacity);

        for entry in self.t1.iter() {
            assert!(matches!(self.index.get(&entry.key), Some(Residence::T1(_))));
            assert!(!self.b1.contains(&entry.key));
            assert!(!self.b2.contains(&entry.key));
        }
        for entry in self.t2.iter() {
            assert!(matches!(self.index.get(&entry.key), Some(Residence::T2(_))));
            assert!(!self.b1.contains(&entry.key));
            assert!(!self.b2.contains(&entry.key));
        }
        self.t1.debug_validate_invariants();
        self.t2.debug_validate_invariants();
        self.b1.debug_validate_invariants();
        self.b2.debug_validate_invariants();
    }
}

impl<K, V> CoreCache<K, V> for ArcCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.capacity == 0 {
            return None;
        }

        // Resident: replace the value and count the access.
        match self.index.get(&key) {
            Some(&Residence::T2(id)) => {
                let previous = self
                    .t2
                    .get_mut(id)
                    .map(|entry| std::mem::replace(&mut entry.value, value));
                self.t2.move_to_front(id);
                return previous;
            }
            Some(&Residence::T1(id)) => {
                let (previous, hits) = match self.t1.get_mut(id) {
                    Some(entry) => {
                        entry.t1_hits = entry.t1_hits.saturating_add(1);
                        (
                            Some(std::mem::replace(&mut entry.value, value)),
                            entry.t1_hits,
                        )
                    }
                    None => return None,
                };
                if hits >= self.promote_after {
                    self.promote_to_t2(id);
                } else {
                    self.t1.move_to_front(id);
                }
                return previous;
            }
            None => {}
        }

        // Ghost hit in B1: the recency side deserved more room.
        if self.b1.contains(&key) {
            let delta = (self.b2.len() / self.b1.len()).max(1);
            self.p = (self.p + delta).min(self.capacity);
            self.b1.remove(&key);
            if self.live() >= self.capacity {
                self.replace(false);
            }
            self.admit_to_t2(key, value);
            return None;
        }

        // Ghost hit in B2: the frequency side deserved more room.
        if self.b2.contains(&key) {
            let delta = (self.b1.len() / self.b2.len()).max(1);
            self.p = self.p.saturating_sub(delta);
            self.b2.remove(&key);
            if self.live() >= self.capacity {
                self.replace(true);
            }
            self.admit_to_t2(key, value);
            return None;
        }

        // True miss.
        let l1 = self.t1.len() + self.b1.len();
        if l1 >= self.capacity {
            if self.t1.len() < self.capacity {
                self.b1.pop_oldest();
                if self.live() >= self.capacity {
                    self.replace(false);
                }
            } else {
                // T1 occupies the whole cache; retire its LRU to B1.
                self.replace(false);
            }
        } else {
            let total = self.live() + self.b1.len() + self.b2.len();
            if total >= self.capacity {
                if total >= 2 * self.capacity {
                    self.b2.pop_oldest();
                }
                if self.live() >= self.capacity {
                    self.replace(false);
                }
            }
        }

        let id = self.t1.push_front(Entry {
            key: key.clone(),
            value,
            t1_hits: 1,
        });
        self.index.insert(key, Residence::T1(id));
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        match self.index.get(key) {
            Some(&Residence::T2(id)) => {
                self.t2.move_to_front(id);
                self.t2.get(id).map(|entry| &entry.value)
            }
            Some(&Residence::T1(id)) => {
                let hits = match self.t1.get_mut(id) {
                    Some(entry) => {
                        entry.t1_hits = entry.t1_hits.saturating_add(1);
                        entry.t1_hits
                    }
                    None => return None,
                };
                if hits >= self.promote_after {
                    self.promote_to_t2(id);
                    match self.index.get(key) {
                        Some(&Residence::T2(new_id)) => {
                            self.t2.get(new_id).map(|entry| &entry.value)
                        }
                        _ => None,
                    }
                } else {
                    self.t1.move_to_front(id);
                    self.t1.get(id).map(|entry| &entry.value)
                }
            }
            // Plain miss: ghost bookkeeping happens only on insert.
            None => None,
        }
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.live()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.index.clear();
        self.t1.clear();
        self.t2.clear();
        self.b1.clear();
        self.b2.clear();
        self.p = 0;
    }
}

impl<K, V> MutableCache<K, V> for ArcCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        match self.index.remove(key)? {
            Residence::T1(id) => self.t1.remove(id).map(|entry| entry.value),
            Residence::T2(id) => self.t2.remove(id).map(|entry| entry.value),
        }
    }
}

impl<K, V> fmt::Debug for ArcCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcCore")
            .field("capacity", &self.capacity)
            .field("t1_len", &self.t1.len())
            .field("t2_len", &self.t2.len())
            .field("b1_len", &self.b1.len())
            .field("b2_len", &self.b2.len())
            .field("p", &self.p)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cache_is_empty() {
        let cache: ArcCore<u32, &str> = ArcCore::new(8);
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 8);
        assert_eq!(cache.p_value(), 0);
        assert_eq!(cache.promote_after(), 2);
    }

    #[test]
    fn insert_enters_t1_and_second_access_promotes() {
        let mut cache = ArcCore::new(8);
        cache.insert(1, "a");
        assert_eq!(cache.t1_len(), 1);
        assert_eq!(cache.t2_len(), 0);

        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.t1_len(), 0);
        assert_eq!(cache.t2_len(), 1);

        // Further accesses stay in T2.
        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.t2_len(), 1);
    }

    #[test]
    fn update_in_t1_counts_as_access() {
        let mut cache = ArcCore::new(8);
        cache.insert(1, "a");
        assert_eq!(cache.insert(1, "a2"), Some("a"));
        assert_eq!(cache.t2_len(), 1);
        assert_eq!(cache.get(&1), Some(&"a2"));
    }

    #[test]
    fn eviction_from_t1_records_ghost() {
        let mut cache = ArcCore::new(2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c");

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&1));
        assert_eq!(cache.b1_len(), 1);
        cache.debug_validate_invariants();
    }

    #[test]
    fn b1_ghost_hit_grows_p_and_enters_t2() {
        let mut cache = ArcCore::new(2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c"); // evicts 1 into B1
        let p_before = cache.p_value();

        cache.insert(1, "a2");
        assert!(cache.p_value() > p_before);
        assert!(cache.contains(&1));
        assert_eq!(cache.t2_len(), 1);
        assert_eq!(cache.b1_len(), 1); // holds the key displaced to make room
        cache.debug_validate_invariants();
    }

    #[test]
    fn b2_ghost_hit_shrinks_p() {
        let mut cache = ArcCore::new(2);
        // Build a full T2.
        cache.insert(1, "a");
        cache.get(&1);
        cache.insert(2, "b");
        cache.get(&2);
        assert_eq!(cache.t2_len(), 2);

        // A newcomer forces a T2 eviction (T1 is empty).
        cache.insert(3, "c");
        assert_eq!(cache.b2_len(), 1);
        assert!(!cache.contains(&1));

        let p_before = cache.p_value();
        cache.insert(1, "a2"); // B2 ghost hit
        assert!(cache.p_value() <= p_before);
        assert!(cache.contains(&1));
        cache.debug_validate_invariants();
    }

    #[test]
    fn frequent_entries_survive_recency_pressure() {
        let mut cache = ArcCore::new(2);
        cache.insert(1, "a");
        cache.get(&1); // 1 in T2

        // A stream of one-shot keys flows through T1.
        for key in 10..20 {
            cache.insert(key, "scan");
        }
        assert!(cache.contains(&1));
        cache.debug_validate_invariants();
    }

    #[test]
    fn custom_promote_threshold_delays_t2() {
        let mut cache = ArcCore::with_promote_after(4, 3);
        cache.insert(1, "a"); // access 1
        cache.get(&1); // access 2: still T1
        assert_eq!(cache.t1_len(), 1);
        assert_eq!(cache.t2_len(), 0);

        cache.get(&1); // access 3: promoted
        assert_eq!(cache.t1_len(), 0);
        assert_eq!(cache.t2_len(), 1);
    }

    #[test]
    fn plain_get_miss_changes_nothing() {
        let mut cache = ArcCore::new(2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c"); // 1 in B1

        let p_before = cache.p_value();
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.b1_len(), 1);
        assert_eq!(cache.p_value(), p_before); // untouched by the miss
    }

    #[test]
    fn remove_from_either_list() {
        let mut cache = ArcCore::new(4);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.get(&2); // 2 in T2

        assert_eq!(cache.remove(&1), Some("a"));
        assert_eq!(cache.remove(&2), Some("b"));
        assert_eq!(cache.remove(&3), None);
        assert_eq!(cache.len(), 0);
        cache.debug_validate_invariants();
    }

    #[test]
    fn zero_capacity_admits_nothing() {
        let mut cache = ArcCore::new(0);
        cache.insert(1, "a");
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn clear_resets_all_lists_and_p() {
        let mut cache = ArcCore::new(4);
        for key in 0..8 {
            cache.insert(key, key);
        }
        cache.get(&6);
        cache.clear();

        assert_eq!(cache.len(), 0);
        assert_eq!(cache.t1_len(), 0);
        assert_eq!(cache.t2_len(), 0);
        assert_eq!(cache.b1_len(), 0);
        assert_eq!(cache.b2_len(), 0);
        assert_eq!(cache.p_value(), 0);
        assert_eq!(cache.get(&6), None);
    }

    #[test]
    fn capacity_bound_holds_under_churn() {
        let mut cache = ArcCore::new(4);
        for i in 0..64u32 {
            cache.insert(i % 10, i);
            if i % 3 == 0 {
                cache.get(&(i % 10));
            }
            assert!(cache.len() <= 4);
        }
        cache.debug_validate_invariants();
    }
}
