//! Deterministic key-to-shard mapping.
//!
//! A [`ShardSelector`] hashes a seed followed by the key and reduces the
//! result modulo the shard count. The same `(key, seed, shards)` tuple always
//! yields the same shard index, keys spread evenly given a reasonable `Hash`
//! implementation, and distinct seeds produce distinct distributions.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Maps any `Hash`able key to a shard index in `[0, shards)`.
///
/// # Example
///
/// ```
/// use evictkit::ds::ShardSelector;
///
/// let selector = ShardSelector::new(4, 0);
/// let shard = selector.shard_for_key(&"user:123");
/// assert!(shard < 4);
/// assert_eq!(selector.shard_for_key(&"user:123"), shard);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardSelector {
    shards: usize,
    seed: u64,
}

impl ShardSelector {
    /// Creates a selector for `shards` shards with the given `seed`.
    ///
    /// A shard count of 0 is clamped to 1.
    pub fn new(shards: usize, seed: u64) -> Self {
        Self {
            shards: shards.max(1),
            seed,
        }
    }

    /// Returns the number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards
    }

    /// Maps a key to a shard index in `[0, shards)`.
    pub fn shard_for_key<K: Hash>(&self, key: &K) -> usize {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards
    }
}

impl Default for ShardSelector {
    /// Single-shard selector with seed 0.
    fn default() -> Self {
        Self::new(1, 0)
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Same key always returns the same shard.
        #[test]
        fn prop_deterministic_mapping(
            shard_count in 1usize..64,
            seed in any::<u64>(),
            key in any::<u32>()
        ) {
            let selector = ShardSelector::new(shard_count, seed);
            prop_assert_eq!(selector.shard_for_key(&key), selector.shard_for_key(&key));
        }

        /// Shard index is always within range.
        #[test]
        fn prop_shard_in_range(
            shard_count in 1usize..128,
            seed in any::<u64>(),
            keys in prop::collection::vec(any::<u64>(), 0..100)
        ) {
            let selector = ShardSelector::new(shard_count, seed);
            for key in keys {
                prop_assert!(selector.shard_for_key(&key) < shard_count);
            }
        }

        /// Enough distinct keys reach more than one shard.
        #[test]
        fn prop_keys_spread_across_shards(
            shard_count in 2usize..16,
            seed in any::<u64>(),
            keys in prop::collection::hash_set(any::<u32>(), 32..96)
        ) {
            let selector = ShardSelector::new(shard_count, seed);
            let mut used = vec![false; shard_count];
            for key in &keys {
                used[selector.shard_for_key(key)] = true;
            }
            prop_assert!(used.iter().filter(|u| **u).count() > 1);
        }
    }
}
