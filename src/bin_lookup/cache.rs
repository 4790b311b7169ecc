//! Bounded LRU cache of BIN lookup results.
//!
//! Keys are hashed BINs (see [`super::hash_bin`]), never raw digits. The
//! cache is small, sized to the number of predefined brands by default, so
//! eviction scans for the oldest entry instead of maintaining a linked list.

use crate::card::{CardType, DetectedCardType};
use std::collections::HashMap;

/// Lifecycle of a lookup for one key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BinLookupResult {
    /// No data and no request in flight.
    #[default]
    Unavailable,
    /// A request is in flight.
    Loading,
    /// The backend answered with these card types.
    Available(Vec<DetectedCardType>),
}

#[derive(Debug)]
struct Entry {
    result: BinLookupResult,
    last_used: u64,
}

/// Least-recently-used cache of [`BinLookupResult`]s.
#[derive(Debug)]
pub struct BinLookupCache {
    entries: HashMap<String, Entry>,
    capacity: usize,
    clock: u64,
}

impl BinLookupCache {
    /// Default capacity: one entry per predefined card type.
    pub const DEFAULT_CAPACITY: usize = CardType::ALL.len();

    /// Creates a cache holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            capacity,
            clock: 0,
        }
    }

    /// Returns the result for `key` and marks it as recently used.
    /// Missing keys read as [`BinLookupResult::Unavailable`].
    pub fn get(&mut self, key: &str) -> BinLookupResult {
        let now = self.tick();
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.last_used = now;
                entry.result.clone()
            }
            None => BinLookupResult::Unavailable,
        }
    }

    /// Returns the result for `key` without touching its recency.
    pub fn peek(&self, key: &str) -> BinLookupResult {
        self.entries
            .get(key)
            .map(|entry| entry.result.clone())
            .unwrap_or_default()
    }

    /// Stores a result, evicting the least recently used key when full.
    pub fn insert(&mut self, key: String, result: BinLookupResult) {
        let now = self.tick();
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_least_recently_used();
        }
        self.entries.insert(
            key,
            Entry {
                result,
                last_used: now,
            },
        );
    }

    /// Drops `key`, returning it to [`BinLookupResult::Unavailable`].
    pub fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    /// Returns true if `key` has an entry, whatever its state.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_least_recently_used(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}

impl Default for BinLookupCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
