//! Thread-safe handle around [`LfuCache`]

use std::hash::Hash;
use std::sync::Arc;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::Result;
use crate::lfu::LfuCache;
use crate::stats::CacheStats;

/// LFU cache shared between threads, with hit/miss statistics
///
/// Every operation holds the lock for its whole duration. A bump touches
/// the entry store, the frequency index and the minimum frequency together,
/// so no caller can see one updated without the others. Clones share the
/// same cache and statistics.
pub struct SharedLfuCache<K, V> {
    /// The cache itself; even reads mutate frequencies
    cache: Arc<Mutex<LfuCache<K, V>>>,

    /// Cache statistics
    stats: Arc<CacheStats>,

    /// Cache capacity
    capacity: usize,
}

impl<K, V> SharedLfuCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a new shared cache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries
    ///
    /// # Returns
    /// * `Result<SharedLfuCache>` - Fails with `ZeroCapacity` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            cache: Arc::new(Mutex::new(LfuCache::new(capacity)?)),
            stats: Arc::new(CacheStats::new()),
            capacity,
        })
    }

    /// Insert or update a value
    ///
    /// # Returns
    /// * `Option<V>` - Previous value if the key was already cached
    pub fn put(&self, key: K, value: V) -> Option<V> {
        let mut cache = self.cache.lock();

        let is_new = !cache.contains_key(&key);
        if is_new && cache.len() >= cache.capacity() {
            self.stats.record_eviction();
        }

        let previous = cache.put(key, value);
        if is_new {
            self.stats.record_insert();
        } else {
            self.stats.record_update();
        }
        previous
    }

    /// Get a copy of a value, counting the access
    pub fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.cache.lock();
        match cache.get(key) {
            Some(value) => {
                self.stats.record_hit();
                Some(value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Check whether a key is cached (does not count as an access)
    pub fn contains_key(&self, key: &K) -> bool {
        self.cache.lock().contains_key(key)
    }

    /// Current access count of a key
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.cache.lock().frequency(key)
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get current number of entries
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry and reset statistics
    pub fn clear(&self) {
        let mut cache = self.cache.lock();
        cache.clear();
        self.stats.reset();
        debug!("shared LFU cache cleared");
    }

    /// Run `f` against the cache while holding the lock
    pub fn with_cache<R>(&self, f: impl FnOnce(&LfuCache<K, V>) -> R) -> R {
        f(&self.cache.lock())
    }
}

impl<K, V> Clone for SharedLfuCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            stats: Arc::clone(&self.stats),
            capacity: self.capacity,
        }
    }
}
