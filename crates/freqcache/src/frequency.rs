//! Frequency index: access count -> keys currently at that count
//!
//! Each bucket is a dense vector of keys. Callers remember the slot a key
//! was placed at and hand it back on removal, which makes removal a
//! swap-remove. When that swap moves another key into the vacated slot,
//! the caller is told so it can update the moved key's recorded slot.
//!
//! Buckets never linger empty: the last removal from a bucket deletes it.

use std::collections::HashMap;
use ahash::RandomState;

/// Outcome of taking a key out of its bucket
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Removed<K> {
    /// The key that was removed
    pub key: K,
    /// The bucket became empty and was deleted
    pub emptied: bool,
    /// Another key was swapped into the vacated slot
    pub relocated: bool,
}

pub(crate) struct FrequencyIndex<K> {
    buckets: HashMap<u64, Vec<K>, RandomState>,
}

impl<K> FrequencyIndex<K> {
    pub fn new() -> Self {
        Self {
            buckets: HashMap::with_hasher(RandomState::new()),
        }
    }

    /// Add `key` to bucket `freq`, creating the bucket if needed.
    /// Returns the slot the key now occupies.
    pub fn add(&mut self, freq: u64, key: K) -> usize {
        let bucket = self.buckets.entry(freq).or_default();
        bucket.push(key);
        bucket.len() - 1
    }

    /// Remove the key at `slot` of bucket `freq`.
    ///
    /// # Panics
    /// If the bucket does not exist or `slot` is out of range. Either means
    /// the caller's bookkeeping is broken.
    pub fn remove(&mut self, freq: u64, slot: usize) -> Removed<K> {
        let bucket = self
            .buckets
            .get_mut(&freq)
            .unwrap_or_else(|| panic!("frequency bucket {} does not exist", freq));
        assert!(
            slot < bucket.len(),
            "slot {} out of range for frequency bucket {} (len {})",
            slot,
            freq,
            bucket.len()
        );

        let key = bucket.swap_remove(slot);
        let relocated = slot < bucket.len();
        let emptied = bucket.is_empty();
        if emptied {
            self.buckets.remove(&freq);
        }

        Removed {
            key,
            emptied,
            relocated,
        }
    }

    /// Any member of bucket `freq`. The last one is returned, so removing
    /// it never relocates another key.
    ///
    /// # Panics
    /// If the bucket does not exist.
    pub fn pick_any(&self, freq: u64) -> &K {
        self.buckets
            .get(&freq)
            .and_then(|bucket| bucket.last())
            .unwrap_or_else(|| panic!("no keys at frequency {}", freq))
    }

    pub fn key_at(&self, freq: u64, slot: usize) -> Option<&K> {
        self.buckets.get(&freq).and_then(|bucket| bucket.get(slot))
    }

    pub fn contains_bucket(&self, freq: u64) -> bool {
        self.buckets.contains_key(&freq)
    }

    /// Iterate `(frequency, keys)` pairs in no particular order
    pub fn buckets(&self) -> impl Iterator<Item = (u64, &[K])> {
        self.buckets.iter().map(|(freq, keys)| (*freq, keys.as_slice()))
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}
