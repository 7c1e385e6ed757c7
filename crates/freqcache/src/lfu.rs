//! LFU (Least Frequently Used) cache controller
//!
//! Combines the entry store with the frequency index and tracks the
//! smallest non-empty frequency, so put, get and eviction are all O(1).
//!
//! `min_frequency` only ever changes in two ways:
//! - reset to 1 when a brand-new key is inserted
//! - advanced by one when a bump empties the bucket it points at
//!
//! Keys are never removed individually, which is what keeps a single
//! integer sufficient. Eviction is only run as the first half of inserting
//! a new key; on its own it could leave `min_frequency` pointing at a
//! deleted bucket.

use std::hash::Hash;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::frequency::FrequencyIndex;
use crate::store::EntryStore;

/// LFU cache with fixed capacity
///
/// Ties between keys at the lowest frequency are broken arbitrarily.
pub struct LfuCache<K, V> {
    store: EntryStore<K, V>,
    index: FrequencyIndex<K>,
    min_frequency: u64,
    capacity: usize,
}

impl<K, V> LfuCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LFU cache holding at most `capacity` entries
    ///
    /// # Errors
    /// [`Error::ZeroCapacity`] if `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        debug!(capacity, "creating LFU cache");

        Ok(Self {
            store: EntryStore::with_capacity(capacity),
            index: FrequencyIndex::new(),
            min_frequency: 1,
            capacity,
        })
    }

    /// Insert or update a value
    ///
    /// An existing key keeps its entry: its value is replaced and its
    /// frequency goes up by one, and the old value is returned. A new key
    /// starts at frequency 1, evicting a least frequently used entry first
    /// if the cache is full.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self.bump(&key) {
            return self.store.insert_or_update(key, value, slot);
        }

        if self.store.len() >= self.capacity {
            self.evict();
        }

        let slot = self.index.add(1, key.clone());
        self.store.insert_or_update(key, value, slot);
        self.min_frequency = 1;
        None
    }

    /// Get a value, counting the access
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.bump(key)?;
        self.store.get(key).map(|entry| &entry.value)
    }

    /// Get a value without counting the access
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.store.get(key).map(|entry| &entry.value)
    }

    /// Current access count of a key
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.store.get(key).map(|entry| entry.frequency)
    }

    /// Check whether a key is cached (does not count as an access)
    pub fn contains_key(&self, key: &K) -> bool {
        self.store.get(key).is_some()
    }

    /// Smallest access count among cached keys, `None` when empty
    pub fn min_frequency(&self) -> Option<u64> {
        if self.is_empty() {
            None
        } else {
            Some(self.min_frequency)
        }
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.store.len() == 0
    }

    /// Get the cache capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over `(key, value, frequency)` in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V, u64)> {
        self.store
            .iter()
            .map(|(key, entry)| (key, &entry.value, entry.frequency))
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        debug!(len = self.store.len(), "clearing LFU cache");
        self.store.clear();
        self.index.clear();
        self.min_frequency = 1;
    }

    /// Audit every bookkeeping invariant. O(n), meant for tests and
    /// debugging.
    ///
    /// # Errors
    /// [`Error::Invariant`] describing the first inconsistency found.
    pub fn check_invariants(&self) -> Result<()> {
        if self.store.len() > self.capacity {
            return Err(Error::invariant(format!(
                "{} entries exceed capacity {}",
                self.store.len(),
                self.capacity
            )));
        }

        for (key, entry) in self.store.iter() {
            match self.index.key_at(entry.frequency, entry.slot) {
                Some(indexed) if indexed == key => {}
                _ => {
                    return Err(Error::invariant(format!(
                        "entry at frequency {} is not found at slot {} of its bucket",
                        entry.frequency, entry.slot
                    )))
                }
            }
        }

        let mut indexed = 0;
        let mut lowest: Option<u64> = None;
        for (freq, keys) in self.index.buckets() {
            if keys.is_empty() {
                return Err(Error::invariant(format!(
                    "bucket {} is empty but still present",
                    freq
                )));
            }
            for key in keys {
                if self.frequency(key) != Some(freq) {
                    return Err(Error::invariant(format!(
                        "bucket {} holds a key whose entry disagrees",
                        freq
                    )));
                }
            }
            indexed += keys.len();
            lowest = Some(lowest.map_or(freq, |low| low.min(freq)));
        }

        if indexed != self.store.len() {
            return Err(Error::invariant(format!(
                "{} keys indexed but {} entries stored",
                indexed,
                self.store.len()
            )));
        }

        if !self.is_empty() && !self.index.contains_bucket(self.min_frequency) {
            return Err(Error::invariant(format!(
                "min_frequency {} points at a missing bucket",
                self.min_frequency
            )));
        }

        if let Some(lowest) = lowest {
            if lowest != self.min_frequency {
                return Err(Error::invariant(format!(
                    "min_frequency is {} but the lowest bucket is {}",
                    self.min_frequency, lowest
                )));
            }
        }

        Ok(())
    }

    /// Move `key` from its bucket to the next one up.
    /// Returns the key's new slot, or `None` if the key is not cached.
    fn bump(&mut self, key: &K) -> Option<usize> {
        let (freq, slot) = {
            let entry = self.store.get(key)?;
            (entry.frequency, entry.slot)
        };

        let removed = self.index.remove(freq, slot);
        if removed.relocated {
            if let Some(moved) = self.index.key_at(freq, slot) {
                self.store.set_slot(moved, slot);
            }
        }

        let next = freq + 1;
        let new_slot = self.index.add(next, removed.key);
        if let Some(entry) = self.store.get_mut(key) {
            entry.frequency = next;
            entry.slot = new_slot;
        }

        // Only an emptied minimum bucket raises the minimum. The key that
        // emptied it now sits at `next`, so that is the new minimum.
        if removed.emptied && freq == self.min_frequency {
            self.min_frequency = next;
        }

        Some(new_slot)
    }

    /// Drop one key at the minimum frequency.
    ///
    /// Must be followed by the insertion of a new key, which resets
    /// `min_frequency` to 1.
    fn evict(&mut self) {
        let freq = self.min_frequency;
        let slot = {
            let victim = self.index.pick_any(freq);
            match self.store.get(victim) {
                Some(entry) => entry.slot,
                None => panic!("key at frequency {} has no entry", freq),
            }
        };

        let removed = self.index.remove(freq, slot);
        if removed.relocated {
            if let Some(moved) = self.index.key_at(freq, slot) {
                self.store.set_slot(moved, slot);
            }
        }
        self.store.remove(&removed.key);

        trace!(
            frequency = freq,
            bucket_emptied = removed.emptied,
            "evicted least frequently used entry"
        );
    }
}

impl<K, V> std::fmt::Debug for LfuCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LfuCache")
            .field("capacity", &self.capacity)
            .field("min_frequency", &self.min_frequency)
            .finish_non_exhaustive()
    }
}
