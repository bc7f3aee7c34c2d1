//! Shared cache handle.
//!
//! Wraps [`CacheStore`] in a coarse mutex and adds periodic snapshots. The
//! store lock is released before any disk I/O; a second lock orders the
//! snapshot writes themselves.

use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{snapshot, CacheEntry, CacheStats, CacheStore};
use crate::config::Config;
use crate::error::{RecommendError, Result};

// == Recommendation Cache ==
#[derive(Debug)]
pub struct RecommendationCache {
    store: Mutex<CacheStore>,
    /// Generation of the last snapshot written; held during writes
    io: Mutex<u64>,
    snapshot_path: Option<PathBuf>,
    /// Snapshot after every Nth write, 0 disables periodic snapshots
    snapshot_every: u64,
}

impl RecommendationCache {
    pub fn new(store: CacheStore, snapshot_path: Option<PathBuf>, snapshot_every: u64) -> Self {
        Self {
            store: Mutex::new(store),
            io: Mutex::new(0),
            snapshot_path,
            snapshot_every,
        }
    }

    /// In-memory cache without persistence.
    pub fn in_memory(max_entries: usize, eviction_batch: usize, ttl_hours: u32) -> Self {
        Self::new(CacheStore::new(max_entries, eviction_batch, ttl_hours), None, 0)
    }

    // == From Config ==
    /// Builds the cache and reloads the snapshot if one exists.
    ///
    /// A corrupt snapshot is logged and the cache starts empty.
    pub fn from_config(config: &Config) -> Self {
        let mut store = CacheStore::new(
            config.max_cache_entries,
            config.cache_eviction_batch,
            config.cache_ttl_hours,
        );

        if let Some(path) = config.snapshot_path() {
            match snapshot::load(&path) {
                Ok(entries) if entries.is_empty() => {}
                Ok(entries) => {
                    let total = entries.len();
                    let restored = store.restore(entries);
                    info!(
                        "Restored {} of {} cached entries from {}",
                        restored,
                        total,
                        path.display()
                    );
                }
                Err(err) => warn!("{}; starting with an empty cache", err),
            }
        }

        Self::new(store, config.snapshot_path(), config.snapshot_every)
    }

    // == Get ==
    pub fn get(&self, key: &str) -> Option<Value> {
        self.store.lock().get(key)
    }

    // == Set ==
    /// Stores a value and, on every Nth write, snapshots the cache.
    ///
    /// Snapshot failures are logged and never surface to the caller.
    pub fn set(&self, key: String, value: Value, ttl_hours: Option<u32>) {
        let pending = {
            let mut store = self.store.lock();
            let evicted = store.set(key, value, ttl_hours);
            if evicted > 0 {
                debug!("Cache full: evicted {} entries", evicted);
            }
            let writes = store.writes();
            let due = self.snapshot_path.is_some()
                && self.snapshot_every > 0
                && writes % self.snapshot_every == 0;
            due.then(|| (writes, store.snapshot()))
        };

        if let Some((generation, entries)) = pending {
            if let Err(err) = self.persist(generation, entries) {
                warn!("Cache snapshot failed: {}", err);
            }
        }
    }

    pub fn remove(&self, key: &str) -> bool {
        self.store.lock().remove(key)
    }

    /// Purges every expired entry.
    pub fn sweep_expired(&self) -> usize {
        self.store.lock().sweep_expired()
    }

    pub fn clear(&self) {
        self.store.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    // == Flush ==
    /// Writes a snapshot now, regardless of the write counter.
    pub fn flush(&self) -> Result<()> {
        let (generation, entries) = {
            let store = self.store.lock();
            (store.writes(), store.snapshot())
        };
        self.persist(generation, entries)
    }

    fn persist(&self, generation: u64, entries: HashMap<String, CacheEntry>) -> Result<()> {
        let Some(path) = self.snapshot_path.as_ref() else {
            return Ok(());
        };

        let mut last_written = self.io.lock();
        // A newer snapshot already reached disk.
        if generation < *last_written {
            return Ok(());
        }
        snapshot::save(path, entries)?;
        *last_written = generation;
        drop(last_written);

        self.store.lock().record_snapshot();
        debug!("Cache snapshot written to {}", path.display());
        Ok(())
    }

    /// Fails with `CacheCorrupt` if the configured snapshot cannot be read.
    pub fn verify_snapshot(&self) -> Result<usize> {
        match self.snapshot_path.as_ref() {
            Some(path) => snapshot::load(path).map(|entries| entries.len()),
            None => Err(RecommendError::Internal(
                "Cache persistence is disabled".to_string(),
            )),
        }
    }
}
