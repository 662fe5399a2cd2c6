//! Least Frequently Used (LFU) eviction engine with optional aging.
//!
//! Entries carry an access-frequency counter and live in per-frequency
//! buckets. Each bucket is a doubly linked list threaded through the entry
//! slots (oldest at the head, newest at the tail); non-empty buckets are
//! themselves chained in ascending frequency order so eviction can walk
//! them without scanning.
//!
//! ```text
//!   index: FxHashMap<K, slot>          buckets: freq -> Bucket
//!
//!   min_freq ──► [1] ◄──► [3] ◄──► [7]          (bucket chain)
//!                 │        │        │
//!                 ▼        ▼        ▼
//!               a ─ b     c       d ─ e          (entries, oldest first)
//!
//!   get(c):  unlink c from bucket 3, append to bucket 4 (created between
//!            3 and 7), counter 3 -> 4
//!   evict:   head of the bucket at the `min_freq` cursor
//! ```
//!
//! `min_freq` is an eviction cursor, not always the global minimum: a
//! newcomer admitted while evicting enters bucket 1 below the cursor, and
//! capacity misses keep draining the established buckets before the fresh
//! probationary entries. A non-full admission re-anchors the cursor at 1,
//! as does bumping an entry into a bucket below it.
//!
//! ## Aging
//!
//! A long-lived hot spot can pin entries with huge counters long after the
//! workload moved on. When constructed with an aging interval A > 0, the
//! engine counts every `get` and `insert` call; on reaching A it halves all
//! frequencies (floor 1), rebuilds the bucket chain eagerly preserving
//! traversal order, recomputes `min_freq`, and resets the counter. Aging is
//! amortised and synchronous; no timers are involved.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::traits::{CoreCache, MutableCache};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    freq: u64,
    prev: Option<usize>,
    next: Option<usize>,
}

/// One frequency bucket plus its position in the ascending bucket chain.
#[derive(Debug, Default)]
struct Bucket {
    head: Option<usize>,
    tail: Option<usize>,
    lower: Option<u64>,
    higher: Option<u64>,
}

/// Frequency-ordered cache core.
///
/// # Example
///
/// ```
/// use evictkit::policy::lfu::LfuCore;
/// use evictkit::traits::CoreCache;
///
/// let mut cache = LfuCore::new(2);
/// cache.insert(1, "one");
/// cache.insert(2, "two");
/// cache.get(&1);            // freq(1) = 2, freq(2) = 1
/// cache.insert(3, "three"); // evicts 2, the least frequently used
///
/// assert!(cache.contains(&1));
/// assert!(!cache.contains(&2));
/// ```
pub struct LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    slots: Vec<Option<Entry<K, V>>>,
    free: Vec<usize>,
    index: FxHashMap<K, usize>,
    buckets: FxHashMap<u64, Bucket>,
    /// Frequency of the bucket next in line for eviction; 0 encodes
    /// "cache empty". Newcomers admitted while evicting enter bucket 1
    /// below the cursor and are reached once the chain drains.
    min_freq: u64,
    capacity: usize,
    /// Operations between aging sweeps; 0 disables aging.
    aging_interval: u64,
    ops_since_aging: u64,
}

impl<K, V> LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LFU cache without aging.
    pub fn new(capacity: usize) -> Self {
        Self::with_aging(capacity, 0)
    }

    /// Creates an LFU cache that halves all frequencies every
    /// `aging_interval` operations. An interval of 0 disables aging.
    pub fn with_aging(capacity: usize, aging_interval: u64) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FxHashMap::default(),
            min_freq: 0,
            capacity,
            aging_interval,
            ops_since_aging: 0,
        }
    }

    /// Returns the access frequency recorded for a key.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let idx = *self.index.get(key)?;
        Some(self.entry(idx).freq)
    }

    /// Returns the frequency of the bucket next in line for eviction, or
    /// `None` if the cache is empty.
    pub fn min_frequency(&self) -> Option<u64> {
        if self.min_freq == 0 {
            None
        } else {
            Some(self.min_freq)
        }
    }

    /// Returns the configured aging interval (0 = disabled).
    pub fn aging_interval(&self) -> u64 {
        self.aging_interval
    }

    /// Returns the next eviction victim without removing it.
    pub fn peek_lfu(&self) -> Option<(&K, &V)> {
        if self.min_freq == 0 {
            return None;
        }
        let idx = self.buckets.get(&self.min_freq)?.head?;
        let entry = self.entry(idx);
        Some((&entry.key, &entry.value))
    }

    /// Removes and returns the entry first in line for eviction: the
    /// oldest entry of the bucket the cursor points at (ties within a
    /// bucket broken by recency).
    pub fn pop_lfu(&mut self) -> Option<(K, V)> {
        if self.min_freq == 0 {
            return None;
        }
        let idx = self.buckets.get(&self.min_freq)?.head?;
        let entry = self.remove_slot(idx);
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    fn entry(&self, idx: usize) -> &Entry<K, V> {
        self.slots[idx].as_ref().expect("stale slot index")
    }

    fn entry_mut(&mut self, idx: usize) -> &mut Entry<K, V> {
        self.slots[idx].as_mut().expect("stale slot index")
    }

    fn alloc_slot(&mut self, entry: Entry<K, V>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(entry);
                idx
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        }
    }

    /// Unlinks the slot from its bucket, drops the bucket if emptied, frees
    /// the slot. The index entry is the caller's responsibility.
    fn remove_slot(&mut self, idx: usize) -> Entry<K, V> {
        let freq = self.entry(idx).freq;
        self.bucket_unlink(freq, idx);
        self.drop_bucket_if_empty(freq);
        let entry = self.slots[idx].take().expect("stale slot index");
        self.free.push(idx);
        entry
    }

    /// Links a new bucket between `lower` and `higher` in the chain.
    fn insert_bucket(&mut self, freq: u64, lower: Option<u64>, higher: Option<u64>) {
        self.buckets.insert(
            freq,
            Bucket {
                head: None,
                tail: None,
                lower,
                higher,
            },
        );
        if let Some(lower) = lower {
            if let Some(bucket) = self.buckets.get_mut(&lower) {
                bucket.higher = Some(freq);
            }
        }
        if let Some(higher) = higher {
            if let Some(bucket) = self.buckets.get_mut(&higher) {
                bucket.lower = Some(freq);
            }
        }
    }

    fn drop_bucket_if_empty(&mut self, freq: u64) {
        let (empty, lower, higher) = match self.buckets.get(&freq) {
            Some(bucket) => (bucket.head.is_none(), bucket.lower, bucket.higher),
            None => return,
        };
        if !empty {
            return;
        }
        if let Some(lower) = lower {
            if let Some(bucket) = self.buckets.get_mut(&lower) {
                bucket.higher = higher;
            }
        }
        if let Some(higher) = higher {
            if let Some(bucket) = self.buckets.get_mut(&higher) {
                bucket.lower = lower;
            }
        }
        self.buckets.remove(&freq);
        if self.min_freq == freq {
            self.min_freq = match higher {
                Some(next) => next,
                // Entries admitted below the cursor are all that is left.
                None if self.buckets.contains_key(&1) => 1,
                None => 0,
            };
        }
    }

    /// Appends the slot at the tail (newest end) of bucket `freq`.
    fn bucket_append(&mut self, freq: u64, idx: usize) {
        let old_tail = self.buckets.get(&freq).expect("bucket missing").tail;
        {
            let entry = self.entry_mut(idx);
            entry.prev = old_tail;
            entry.next = None;
        }
        match old_tail {
            Some(tail_idx) => self.entry_mut(tail_idx).next = Some(idx),
            None => self.buckets.get_mut(&freq).expect("bucket missing").head = Some(idx),
        }
        self.buckets.get_mut(&freq).expect("bucket missing").tail = Some(idx);
    }

    fn bucket_unlink(&mut self, freq: u64, idx: usize) {
        let (prev, next) = {
            let entry = self.entry(idx);
            (entry.prev, entry.next)
        };
        match prev {
            Some(prev_idx) => self.entry_mut(prev_idx).next = next,
            None => {
                if let Some(bucket) = self.buckets.get_mut(&freq) {
                    bucket.head = next;
                }
            }
        }
        match next {
            Some(next_idx) => self.entry_mut(next_idx).prev = prev,
            None => {
                if let Some(bucket) = self.buckets.get_mut(&freq) {
                    bucket.tail = prev;
                }
            }
        }
        let entry = self.entry_mut(idx);
        entry.prev = None;
        entry.next = None;
    }

    /// Moves the slot from its current bucket into the next higher one.
    fn bump_frequency(&mut self, idx: usize) {
        let freq = self.entry(idx).freq;
        if freq == u64::MAX {
            // Saturated: refresh recency within the bucket instead.
            self.bucket_unlink(freq, idx);
            self.bucket_append(freq, idx);
            return;
        }
        let next_freq = freq + 1;

        let (lower, higher) = {
            let bucket = self.buckets.get(&freq).expect("bucket missing");
            (bucket.lower, bucket.higher)
        };

        self.bucket_unlink(freq, idx);
        let emptied = self
            .buckets
            .get(&freq)
            .map(|bucket| bucket.head.is_none())
            .unwrap_or(true);
        if emptied {
            self.drop_bucket_if_empty(freq);
        }

        if !self.buckets.contains_key(&next_freq) {
            let chain_lower = if emptied { lower } else { Some(freq) };
            self.insert_bucket(next_freq, chain_lower, higher);
        }

        self.entry_mut(idx).freq = next_freq;
        self.bucket_append(next_freq, idx);
        if self.min_freq == 0 || next_freq < self.min_freq {
            self.min_freq = next_freq;
        }
    }

    /// Inserts a fresh entry at frequency 1.
    fn admit(&mut self, key: K, value: V) {
        let idx = self.alloc_slot(Entry {
            key: key.clone(),
            value,
            freq: 1,
            prev: None,
            next: None,
        });
        self.index.insert(key, idx);

        if !self.buckets.contains_key(&1) {
            let higher = if self.min_freq == 0 {
                None
            } else {
                Some(self.min_freq)
            };
            self.insert_bucket(1, None, higher);
        }
        self.bucket_append(1, idx);
    }

    /// Ticks the aging counter; at the interval, halves every frequency.
    fn note_op(&mut self) {
        if self.aging_interval == 0 {
            return;
        }
        self.ops_since_aging += 1;
        if self.ops_since_aging >= self.aging_interval {
            self.age_entries();
            self.ops_since_aging = 0;
        }
    }

    /// Halves every live frequency (floor 1) and rebuilds the bucket chain.
    ///
    /// Entries are walked in eviction order (ascending frequency, oldest
    /// first) and re-appended, so relative order inside merged buckets is
    /// preserved and `min_freq` comes out correct.
    fn age_entries(&mut self) {
        if self.index.is_empty() {
            return;
        }

        let mut order = Vec::with_capacity(self.index.len());
        // Bucket 1 can sit below the cursor; start from the chain head.
        let mut freq = if self.buckets.contains_key(&1) {
            1
        } else {
            self.min_freq
        };
        while freq != 0 {
            let bucket = self.buckets.get(&freq).expect("chained bucket missing");
            let next_bucket = bucket.higher;
            let mut current = bucket.head;
            while let Some(idx) = current {
                order.push(idx);
                current = self.entry(idx).next;
            }
            freq = next_bucket.unwrap_or(0);
        }

        self.buckets.clear();
        self.min_freq = 0;

        let mut last_freq = 0u64;
        for idx in order {
            let new_freq = {
                let entry = self.entry_mut(idx);
                entry.freq = (entry.freq / 2).max(1);
                entry.prev = None;
                entry.next = None;
                entry.freq
            };
            if !self.buckets.contains_key(&new_freq) {
                let lower = if last_freq == 0 { None } else { Some(last_freq) };
                self.insert_bucket(new_freq, lower, None);
            }
            self.bucket_append(new_freq, idx);
            if self.min_freq == 0 {
                self.min_freq = new_freq;
            }
            last_freq = new_freq;
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        let live = self.slots.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(live, self.index.len());
        assert!(live <= self.capacity);
        assert_eq!(self.slots.len(), self.free.len() + live);

        if live == 0 {
            assert!(self.buckets.is_empty());
            assert_eq!(self.min_freq, 0);
            return;
        }

        assert!(self.min_freq > 0);
        assert!(self.buckets.contains_key(&self.min_freq));

        let mut counted = 0usize;
        let mut chain_heads = 0usize;
        for (&freq, bucket) in &self.buckets {
            assert!(bucket.head.is_some(), "empty bucket left in chain");
            // Only fresh admissions may sit below the eviction cursor.
            if freq < self.min_freq {
                assert_eq!(freq, 1);
            }
            if let Some(lower) = bucket.lower {
                assert!(lower < freq);
                assert_eq!(self.buckets[&lower].higher, Some(freq));
            } else {
                chain_heads += 1;
            }
            if let Some(higher) = bucket.higher {
                assert!(higher > freq);
                assert_eq!(self.buckets[&higher].lower, Some(freq));
            }

            let mut current = bucket.head;
            let mut last = None;
            while let Some(idx) = current {
                let entry = self.entry(idx);
                assert_eq!(entry.freq, freq);
                assert_eq!(entry.prev, last);
                assert_eq!(self.index.get(&entry.key), Some(&idx));
                last = Some(idx);
                current = entry.next;
                counted += 1;
            }
            assert_eq!(bucket.tail, last);
        }
        assert_eq!(chain_heads, 1);
        assert_eq!(counted, live);
    }
}

impl<K, V> CoreCache<K, V> for LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.note_op();

        if let Some(&idx) = self.index.get(&key) {
            let previous = std::mem::replace(&mut self.entry_mut(idx).value, value);
            self.bump_frequency(idx);
            return Some(previous);
        }

        if self.capacity == 0 {
            return None;
        }

        if self.index.len() >= self.capacity {
            let _ = self.pop_lfu();
            self.admit(key, value);
            // The eviction cursor keeps draining the surviving buckets;
            // it reaches the newcomer's bucket once the chain is exhausted.
            if self.min_freq == 0 {
                self.min_freq = 1;
            }
        } else {
            self.admit(key, value);
            self.min_freq = 1;
        }
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        self.note_op();

        let idx = *self.index.get(key)?;
        self.bump_frequency(idx);
        Some(&self.entry(idx).value)
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.index.clear();
        self.buckets.clear();
        self.min_freq = 0;
        self.ops_since_aging = 0;
    }
}

impl<K, V> MutableCache<K, V> for LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.index.remove(key)?;
        let entry = self.remove_slot(idx);
        Some(entry.value)
    }
}

impl<K, V> fmt::Debug for LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCore")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("min_freq", &self.min_freq)
            .field("aging_interval", &self.aging_interval)
            .finish_non_exhaustive()
    }
}
