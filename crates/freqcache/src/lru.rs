//! LRU (Least Recently Used) cache
//!
//! Entries live in a slab of nodes threaded onto a doubly-linked recency
//! list (front = most recent). The map points each key at its node, so
//! touching, inserting and evicting are all O(1). Freed node slots are
//! reused before the slab grows.

use std::collections::HashMap;
use std::hash::Hash;
use ahash::RandomState;
use tracing::{debug, trace};

use crate::error::{Error, Result};

struct Node<K, V> {
    key: K,
    value: V,
    newer: Option<usize>,
    older: Option<usize>,
}

/// Recency-ordered cache with fixed capacity
pub struct LruCache<K, V> {
    map: HashMap<K, usize, RandomState>,
    slab: Vec<Option<Node<K, V>>>,
    vacant: Vec<usize>,
    newest: Option<usize>,
    oldest: Option<usize>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache holding at most `capacity` entries
    ///
    /// # Errors
    /// [`Error::ZeroCapacity`] if `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        debug!(capacity, "creating LRU cache");

        Ok(Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            slab: Vec::with_capacity(capacity),
            vacant: Vec::new(),
            newest: None,
            oldest: None,
            capacity,
        })
    }

    /// Get a value and mark it most recently used
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.promote(idx);
        self.node(idx).map(|node| &node.value)
    }

    /// Get a value without touching its recency
    pub fn peek(&self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.node(idx).map(|node| &node.value)
    }

    /// Insert or update a value, marking it most recently used.
    /// Returns the previous value for an existing key.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&idx) = self.map.get(&key) {
            self.promote(idx);
            return self
                .slab
                .get_mut(idx)
                .and_then(Option::as_mut)
                .map(|node| std::mem::replace(&mut node.value, value));
        }

        if self.map.len() >= self.capacity {
            self.evict_oldest();
        }

        let idx = self.allocate(Node {
            key: key.clone(),
            value,
            newer: None,
            older: None,
        });
        self.push_front(idx);
        self.map.insert(key, idx);
        None
    }

    /// Remove a key, returning its value
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.map.remove(key)?;
        self.detach(idx);
        self.release(idx).map(|node| node.value)
    }

    /// Check whether a key is cached (does not touch recency)
    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Get the cache capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.map.clear();
        self.slab.clear();
        self.vacant.clear();
        self.newest = None;
        self.oldest = None;
    }

    /// Iterate from most to least recently used
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            cache: self,
            cursor: self.newest,
        }
    }

    fn node(&self, idx: usize) -> Option<&Node<K, V>> {
        self.slab.get(idx).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node<K, V>> {
        self.slab.get_mut(idx).and_then(Option::as_mut)
    }

    fn promote(&mut self, idx: usize) {
        if self.newest != Some(idx) {
            self.detach(idx);
            self.push_front(idx);
        }
    }

    fn push_front(&mut self, idx: usize) {
        let old_front = self.newest;
        if let Some(node) = self.node_mut(idx) {
            node.newer = None;
            node.older = old_front;
        }
        match old_front.and_then(|front| self.node_mut(front)) {
            Some(front) => front.newer = Some(idx),
            None => self.oldest = Some(idx),
        }
        self.newest = Some(idx);
    }

    fn detach(&mut self, idx: usize) {
        let Some((newer, older)) = self.node(idx).map(|node| (node.newer, node.older)) else {
            return;
        };

        match newer {
            Some(n) => {
                if let Some(node) = self.node_mut(n) {
                    node.older = older;
                }
            }
            None => self.newest = older,
        }
        match older {
            Some(o) => {
                if let Some(node) = self.node_mut(o) {
                    node.newer = newer;
                }
            }
            None => self.oldest = newer,
        }
    }

    fn evict_oldest(&mut self) {
        let Some(idx) = self.oldest else {
            return;
        };
        self.detach(idx);
        if let Some(node) = self.release(idx) {
            self.map.remove(&node.key);
            trace!(len = self.map.len(), "evicted least recently used entry");
        }
    }

    fn allocate(&mut self, node: Node<K, V>) -> usize {
        match self.vacant.pop() {
            Some(idx) => {
                self.slab[idx] = Some(node);
                idx
            }
            None => {
                self.slab.push(Some(node));
                self.slab.len() - 1
            }
        }
    }

    fn release(&mut self, idx: usize) -> Option<Node<K, V>> {
        let node = self.slab.get_mut(idx)?.take()?;
        self.vacant.push(idx);
        Some(node)
    }
}

/// Iterator over an [`LruCache`] from most to least recently used
pub struct Iter<'a, K, V> {
    cache: &'a LruCache<K, V>,
    cursor: Option<usize>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = self.cache.slab.get(idx).and_then(Option::as_ref)?;
        self.cursor = node.older;
        Some((&node.key, &node.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_zero_capacity() {
        assert!(matches!(
            LruCache::<u32, u32>::new(0),
            Err(Error::ZeroCapacity)
        ));
    }

    #[test]
    fn test_lru_basic() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");

        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c"); // Should evict 1

        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.get(&3), Some(&"c"));
    }

    #[test]
    fn test_lru_get_refreshes() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.get(&1);
        cache.put(3, "c"); // Should evict 2

        assert_eq!(cache.peek(&1), Some(&"a"));
        assert_eq!(cache.peek(&2), None);
        assert_eq!(cache.peek(&3), Some(&"c"));
    }

    #[test]
    fn test_lru_put_refreshes_and_returns_previous() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        assert_eq!(cache.put(1, "z"), Some("a"));
        cache.put(3, "c"); // Should evict 2

        assert_eq!(cache.peek(&1), Some(&"z"));
        assert!(!cache.contains_key(&2));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_lru_peek_does_not_refresh() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.peek(&1);
        cache.put(3, "c");

        assert!(!cache.contains_key(&1));
    }

    #[test]
    fn test_lru_remove() {
        let mut cache = LruCache::new(3).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");

        assert_eq!(cache.remove(&2), Some("b"));
        assert_eq!(cache.remove(&2), None);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&2), None);

        // Vacated slot is reused
        cache.put(4, "d");
        let order: Vec<_> = cache.iter().map(|(k, _)| *k).collect();
        assert_eq!(order, vec![4, 3, 1]);
    }

    #[test]
    fn test_lru_iter_order() {
        let mut cache = LruCache::new(3).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");
        cache.get(&1);

        let order: Vec<_> = cache.iter().map(|(k, _)| *k).collect();
        assert_eq!(order, vec![1, 3, 2]);
    }

    #[test]
    fn test_lru_clear() {
        let mut cache = LruCache::new(3).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.clear();

        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.iter().count(), 0);

        cache.put(5, "e");
        assert_eq!(cache.get(&5), Some(&"e"));
    }

    #[test]
    fn test_lru_capacity_one() {
        let mut cache = LruCache::new(1).unwrap();

        cache.put(1, "a");
        cache.put(1, "b");
        assert_eq!(cache.len(), 1);

        cache.put(2, "c");
        assert_eq!(cache.peek(&1), None);
        assert_eq!(cache.peek(&2), Some(&"c"));
        assert_eq!(cache.capacity(), 1);
    }
}
