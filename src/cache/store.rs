//! Cache Store Module
//!
//! Key-to-entry mapping plus the single expiry-check-and-reap primitive used
//! by both lazy expiration and the background sweep. Not synchronized; the
//! [`Cache`](crate::Cache) handle wraps it in a lock.

use std::collections::HashMap;

use tokio::time::Instant;

use crate::cache::CacheEntry;

// == Lookup ==
/// Outcome of a non-mutating lookup.
#[derive(Debug)]
pub enum Lookup<V> {
    /// Present and live
    Live(CacheEntry<V>),
    /// Present but past its expiry instant
    Expired,
    /// No entry for the key
    Missing,
}

// == Cache Store ==
/// Main cache storage with TTL support.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    // == Insert ==
    /// Stores an entry, replacing any existing one for the key wholesale.
    ///
    /// Returns the replaced entry, if any.
    pub fn insert(&mut self, key: String, entry: CacheEntry<V>) -> Option<CacheEntry<V>> {
        self.entries.insert(key, entry)
    }

    // == Lookup ==
    /// Classifies the entry for `key` as of `now` without mutating.
    pub fn lookup(&self, key: &str, now: Instant) -> Lookup<V> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired_at(now) => Lookup::Expired,
            Some(entry) => Lookup::Live(entry.clone()),
            None => Lookup::Missing,
        }
    }

    // == Remove ==
    /// Removes the entry for `key` unconditionally.
    pub fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        self.entries.remove(key)
    }

    // == Reap If Expired ==
    /// Removes the entry for `key` only if it is expired as of `now`.
    ///
    /// Returns the removed entry so the caller can fire Delete hooks for it.
    /// A live or missing entry is left untouched and yields None.
    pub fn reap_if_expired(&mut self, key: &str, now: Instant) -> Option<CacheEntry<V>> {
        if self.entries.get(key)?.is_expired_at(now) {
            self.entries.remove(key)
        } else {
            None
        }
    }

    // == Cleanup Expired ==
    /// Removes every entry expired as of `now`.
    ///
    /// Returns the removed `(key, entry)` pairs.
    pub fn cleanup_expired(&mut self, now: Instant) -> Vec<(String, CacheEntry<V>)> {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        expired_keys
            .into_iter()
            .filter_map(|key| {
                let entry = self.reap_if_expired(&key, now)?;
                Some((key, entry))
            })
            .collect()
    }

    // == Length ==
    /// Returns the number of entries held, including unreaped expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}
