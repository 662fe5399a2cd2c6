pub use crate::builder::{Cache, CacheBuilder, EvictionPolicy};
pub use crate::concurrent::{
    ConcurrentArcCache, ConcurrentCache, ConcurrentLfuCache, ConcurrentLruCache,
    ConcurrentLrukCache,
};
pub use crate::ds::{GhostList, IntrusiveList, NodeId, ShardSelector};
pub use crate::policy::arc::ArcCore;
pub use crate::policy::lfu::LfuCore;
pub use crate::policy::lru::LruCore;
pub use crate::policy::lru_k::LrukCore;
pub use crate::policy::sharded::{
    ShardedArcCache, ShardedCache, ShardedLfuCache, ShardedLruCache, ShardedLrukCache,
};
pub use crate::traits::{CoreCache, MutableCache};
