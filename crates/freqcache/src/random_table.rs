//! Table with O(1) insert, remove and uniform random access
//!
//! Keys are kept densely packed in a vector; the map stores each value
//! together with its key's position in that vector. Removing swaps the
//! last key into the hole and pops, so the vector never has gaps and a
//! uniformly random index is a uniformly random entry.

use std::collections::HashMap;
use std::hash::Hash;
use ahash::RandomState;
use rand::Rng;

struct Located<V> {
    value: V,
    position: usize,
}

/// Unbounded key-value table supporting random sampling
pub struct RandomTable<K, V> {
    map: HashMap<K, Located<V>, RandomState>,
    keys: Vec<K>,
}

impl<K, V> RandomTable<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create an empty table
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty table with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            keys: Vec::with_capacity(capacity),
        }
    }

    /// Insert a value, or update it in place if the key exists.
    /// Returns the previous value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self.map.get_mut(&key) {
            return Some(std::mem::replace(&mut slot.value, value));
        }

        self.keys.push(key.clone());
        self.map.insert(
            key,
            Located {
                value,
                position: self.keys.len() - 1,
            },
        );
        None
    }

    /// Remove a key, returning its value
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let removed = self.map.remove(key)?;
        self.keys.swap_remove(removed.position);
        if let Some(moved) = self.keys.get(removed.position) {
            if let Some(slot) = self.map.get_mut(moved) {
                slot.position = removed.position;
            }
        }
        Some(removed.value)
    }

    /// Get a value by key
    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key).map(|slot| &slot.value)
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Pick an entry uniformly at random using `rng`.
    /// Returns `None` when the table is empty.
    pub fn random_with<R: Rng>(&self, rng: &mut R) -> Option<(&K, &V)> {
        if self.keys.is_empty() {
            return None;
        }
        let key = &self.keys[rng.gen_range(0..self.keys.len())];
        self.map.get(key).map(|slot| (key, &slot.value))
    }

    /// Pick an entry uniformly at random using the thread-local rng
    pub fn random(&self) -> Option<(&K, &V)> {
        self.random_with(&mut rand::thread_rng())
    }

    /// Iterate in storage order (which removals permute)
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.keys
            .iter()
            .filter_map(|key| self.map.get(key).map(|slot| (key, &slot.value)))
    }
}

impl<K, V> Default for RandomTable<K, V>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_insert_and_get() {
        let mut table = RandomTable::new();

        assert_eq!(table.insert(1, "a"), None);
        assert_eq!(table.insert(2, "b"), None);
        assert_eq!(table.insert(1, "z"), Some("a"));

        assert_eq!(table.get(&1), Some(&"z"));
        assert_eq!(table.get(&2), Some(&"b"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_remove_keeps_positions_consistent() {
        let mut table = RandomTable::with_capacity(4);
        for i in 0..4 {
            table.insert(i, i * 10);
        }

        assert_eq!(table.remove(&0), Some(0));
        assert_eq!(table.remove(&0), None);
        // Key 3 was swapped into position 0; removing it must still work
        assert_eq!(table.remove(&3), Some(30));
        assert_eq!(table.len(), 2);

        let mut left: Vec<_> = table.iter().map(|(k, v)| (*k, *v)).collect();
        left.sort();
        assert_eq!(left, vec![(1, 10), (2, 20)]);
    }

    #[test]
    fn test_remove_last() {
        let mut table = RandomTable::new();
        table.insert("only", 1);

        assert_eq!(table.remove(&"only"), Some(1));
        assert!(table.is_empty());
        assert!(!table.contains_key(&"only"));
    }

    #[test]
    fn test_random_empty() {
        let table: RandomTable<u32, u32> = RandomTable::default();
        assert!(table.random().is_none());
    }

    #[test]
    fn test_random_only_returns_live_entries() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut table = RandomTable::new();
        for i in 0..100 {
            table.insert(i, format!("value{}", i));
        }
        for i in (1..100).step_by(2) {
            table.remove(&i);
        }

        let mut seen = HashSet::new();
        for _ in 0..500 {
            let (key, value) = table.random_with(&mut rng).unwrap();
            assert_eq!(key % 2, 0);
            assert_eq!(value, &format!("value{}", key));
            seen.insert(*key);
        }
        // 500 draws over 50 keys should hit most of them
        assert!(seen.len() > 40);
    }
}
