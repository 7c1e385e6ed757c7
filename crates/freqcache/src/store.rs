//! Entry store: key -> (value, access frequency)

use std::collections::HashMap;
use std::hash::Hash;
use ahash::RandomState;

/// A cached value together with its access count.
///
/// `slot` is the entry's position inside the frequency bucket it currently
/// belongs to. The controller keeps it in sync with the frequency index so
/// a key can be taken out of its bucket without searching.
#[derive(Debug)]
pub(crate) struct Entry<V> {
    pub value: V,
    pub frequency: u64,
    pub slot: usize,
}

/// Owns every live entry of the cache
pub(crate) struct EntryStore<K, V> {
    entries: HashMap<K, Entry<V>, RandomState>,
}

impl<K, V> EntryStore<K, V>
where
    K: Hash + Eq,
{
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
        }
    }

    pub fn get(&self, key: &K) -> Option<&Entry<V>> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut Entry<V>> {
        self.entries.get_mut(key)
    }

    /// Overwrite the value of an existing key and return the old one, or
    /// insert a new entry at frequency 1 whose bucket position is `slot`.
    ///
    /// On update the entry's frequency and slot are left untouched.
    pub fn insert_or_update(&mut self, key: K, value: V, slot: usize) -> Option<V> {
        match self.entries.get_mut(&key) {
            Some(entry) => Some(std::mem::replace(&mut entry.value, value)),
            None => {
                self.entries.insert(
                    key,
                    Entry {
                        value,
                        frequency: 1,
                        slot,
                    },
                );
                None
            }
        }
    }

    /// Only eviction calls this
    pub fn remove(&mut self, key: &K) -> Option<Entry<V>> {
        self.entries.remove(key)
    }

    pub fn set_slot(&mut self, key: &K, slot: usize) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.slot = slot;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Entry<V>)> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_insert_new() {
        let mut store = EntryStore::with_capacity(4);

        assert_eq!(store.insert_or_update("a", 1, 0), None);

        let entry = store.get(&"a").unwrap();
        assert_eq!(entry.value, 1);
        assert_eq!(entry.frequency, 1);
        assert_eq!(entry.slot, 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_update_keeps_frequency_and_slot() {
        let mut store = EntryStore::with_capacity(4);
        store.insert_or_update("a", 1, 3);
        if let Some(entry) = store.get_mut(&"a") {
            entry.frequency = 7;
        }

        assert_eq!(store.insert_or_update("a", 2, 0), Some(1));

        let entry = store.get(&"a").unwrap();
        assert_eq!(entry.value, 2);
        assert_eq!(entry.frequency, 7);
        assert_eq!(entry.slot, 3);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_remove_and_set_slot() {
        let mut store = EntryStore::with_capacity(4);
        store.insert_or_update("a", 1, 0);
        store.insert_or_update("b", 2, 1);

        store.set_slot(&"b", 0);
        assert_eq!(store.get(&"b").unwrap().slot, 0);

        let removed = store.remove(&"a").unwrap();
        assert_eq!(removed.value, 1);
        assert!(store.get(&"a").is_none());
        assert!(store.remove(&"a").is_none());
        assert_eq!(store.len(), 1);

        // Unknown keys are ignored
        store.set_slot(&"zzz", 9);
        assert_eq!(store.len(), 1);
    }
}
