//! Cache Store Module
//!
//! Bounded map of fingerprinted query results with lazy TTL expiry and batch
//! LRU eviction. Not synchronized; see [`RecommendationCache`] for the shared
//! handle.
//!
//! [`RecommendationCache`]: crate::cache::RecommendationCache

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::cache::{current_timestamp_ms, CacheEntry, CacheStats, LruTracker};

// == Cache Store ==
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Access-time tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Entries removed beyond the overflow when eviction runs
    eviction_batch: usize,
    /// TTL applied when `set` is given none
    default_ttl_hours: u32,
    /// Successful writes since creation
    writes: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the cache can hold
    /// * `eviction_batch` - Extra entries removed per eviction pass
    /// * `default_ttl_hours` - TTL for entries stored without one
    pub fn new(max_entries: usize, eviction_batch: usize, default_ttl_hours: u32) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(max_entries),
            max_entries,
            eviction_batch,
            default_ttl_hours,
            writes: 0,
        }
    }

    // == Set ==
    /// Stores a value under a fingerprint key, returning how many entries
    /// were evicted to make room.
    ///
    /// When a new key arrives at capacity, the `len - max + batch` least
    /// recently accessed entries are evicted in one pass. Overwriting an
    /// existing key never evicts.
    ///
    /// # Arguments
    /// * `key` - Fingerprint of the query
    /// * `value` - Result to memoize
    /// * `ttl_hours` - Lifetime in hours (uses the default if None)
    pub fn set(&mut self, key: String, value: Value, ttl_hours: Option<u32>) -> usize {
        if self.max_entries == 0 {
            return 0;
        }

        let mut evicted = 0;
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            let overflow = self.entries.len() - self.max_entries;
            evicted = self.evict_oldest(overflow + self.eviction_batch.max(1));
        }

        let entry = CacheEntry::new(value, ttl_hours.unwrap_or(self.default_ttl_hours));
        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);
        self.writes += 1;
        self.stats.set_total_entries(self.entries.len());
        evicted
    }

    fn evict_oldest(&mut self, count: usize) -> usize {
        let victims = self.lru.oldest(count);
        for key in &victims {
            self.entries.remove(key);
            self.lru.remove(key);
        }
        self.stats.record_evictions(victims.len());
        debug!("Evicted {} cache entries", victims.len());
        victims.len()
    }

    // == Get ==
    /// Returns the value for a key if present and unexpired.
    ///
    /// An expired entry is removed on access and counted as a miss.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(),
        };

        if expired {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.record_expired(1);
            self.stats.record_miss();
            self.stats.set_total_entries(self.entries.len());
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Sweep Expired ==
    /// Removes all expired entries, returning how many were purged.
    pub fn sweep_expired(&mut self) -> usize {
        self.sweep_expired_at(current_timestamp_ms())
    }

    pub fn sweep_expired_at(&mut self, now_ms: u64) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now_ms))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_expired(expired_keys.len());
        self.stats.set_total_entries(self.entries.len());
        expired_keys.len()
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
    }

    // == Snapshot / Restore ==
    /// Copy of the live entries for persistence.
    pub fn snapshot(&self) -> HashMap<String, CacheEntry> {
        self.entries.clone()
    }

    /// Loads persisted entries, skipping expired ones.
    ///
    /// Entries are replayed oldest first, so if the snapshot is larger than
    /// the capacity the newest ones survive. Returns the number restored.
    pub fn restore(&mut self, entries: HashMap<String, CacheEntry>) -> usize {
        let now = current_timestamp_ms();
        let mut live: Vec<(String, CacheEntry)> = entries
            .into_iter()
            .filter(|(_, entry)| !entry.is_expired_at(now))
            .collect();
        live.sort_by_key(|(_, entry)| entry.created_at);

        let skip = live.len().saturating_sub(self.max_entries);
        for (key, entry) in live.into_iter().skip(skip) {
            self.lru.touch(&key);
            self.entries.insert(key, entry);
        }
        self.stats.set_total_entries(self.entries.len());
        self.entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub(crate) fn record_snapshot(&mut self) {
        self.stats.record_snapshot();
    }

    /// Successful writes since the store was created.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
