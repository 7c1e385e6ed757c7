//! # freqcache
//!
//! Bounded in-memory caches with O(1) operations.
//!
//! ## Architecture
//! - **Entry store**: AHash map of key -> (value, frequency)
//! - **Frequency index**: frequency -> dense bucket of keys
//! - **LFU controller**: bumps frequencies, evicts from the lowest bucket
//!   and tracks which bucket that is
//!
//! Alongside the LFU core:
//! - [`LruCache`]: recency-ordered eviction
//! - [`RandomTable`]: insert/remove/sample-at-random table
//! - [`SharedLfuCache`]: mutex-guarded LFU handle with [`CacheStats`]
//!
//! ```
//! use freqcache::LfuCache;
//!
//! let mut cache = LfuCache::new(2).unwrap();
//! cache.put(1, "a");
//! cache.put(2, "b");
//! cache.get(&1);
//! cache.put(3, "c"); // evicts 2, the only key read fewer times than 1
//!
//! assert_eq!(cache.get(&2), None);
//! assert_eq!(cache.get(&1), Some(&"a"));
//! ```

#![warn(missing_docs)]

mod error;
mod frequency;
mod lfu;
mod lru;
mod random_table;
mod shared;
mod stats;
mod store;

pub use error::{Error, Result};
pub use lfu::LfuCache;
pub use lru::{Iter as LruIter, LruCache};
pub use random_table::RandomTable;
pub use shared::SharedLfuCache;
pub use stats::{CacheStats, StatsSnapshot};
