//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the recommendation cache can hold
    pub max_cache_entries: usize,
    /// Extra entries removed on top of the overflow when the cache is full
    pub cache_eviction_batch: usize,
    /// Default TTL in hours for cached recommendations
    pub cache_ttl_hours: u32,
    /// Snapshot the cache to disk every Nth write
    pub snapshot_every: u64,
    /// Directory holding the cache snapshot, None disables persistence
    pub cache_dir: Option<PathBuf>,
    /// Number of performance samples retained by the monitor
    pub monitor_history: usize,
    /// Upper bound on the dietary-only fallback result
    pub fallback_cap: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Background TTL sweep interval in seconds
    pub cleanup_interval: u64,
    /// Optional JSON catalog document loaded at startup
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `CACHE_EVICTION_BATCH` - Eviction batch size (default: 10)
    /// - `CACHE_TTL_HOURS` - Cache TTL in hours (default: 24)
    /// - `CACHE_SNAPSHOT_EVERY` - Writes between snapshots (default: 10)
    /// - `CACHE_DIR` - Snapshot directory, empty disables (default: cache)
    /// - `MONITOR_HISTORY` - Retained performance samples (default: 1000)
    /// - `FALLBACK_CAP` - Dietary fallback cap (default: 20)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - TTL sweep frequency in seconds (default: 60)
    /// - `CATALOG_PATH` - JSON catalog document (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_cache_entries: env_or("CACHE_MAX_ENTRIES", defaults.max_cache_entries),
            cache_eviction_batch: env_or("CACHE_EVICTION_BATCH", defaults.cache_eviction_batch),
            cache_ttl_hours: env_or("CACHE_TTL_HOURS", defaults.cache_ttl_hours),
            snapshot_every: env_or("CACHE_SNAPSHOT_EVERY", defaults.snapshot_every),
            cache_dir: match env::var("CACHE_DIR") {
                Ok(dir) if dir.trim().is_empty() => None,
                Ok(dir) => Some(PathBuf::from(dir)),
                Err(_) => defaults.cache_dir,
            },
            monitor_history: env_or("MONITOR_HISTORY", defaults.monitor_history),
            fallback_cap: env_or("FALLBACK_CAP", defaults.fallback_cap),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            catalog_path: env::var("CATALOG_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Path of the cache snapshot file, if persistence is enabled.
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join("recommend_cache.json"))
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_cache_entries: 1000,
            cache_eviction_batch: 10,
            cache_ttl_hours: 24,
            snapshot_every: 10,
            cache_dir: Some(PathBuf::from("cache")),
            monitor_history: 1000,
            fallback_cap: 20,
            server_port: 3000,
            cleanup_interval: 60,
            catalog_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_cache_entries, 1000);
        assert_eq!(config.cache_eviction_batch, 10);
        assert_eq!(config.cache_ttl_hours, 24);
        assert_eq!(config.snapshot_every, 10);
        assert_eq!(config.monitor_history, 1000);
        assert_eq!(config.fallback_cap, 20);
        assert_eq!(config.server_port, 3000);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_snapshot_path_follows_cache_dir() {
        let mut config = Config::default();
        assert_eq!(
            config.snapshot_path(),
            Some(PathBuf::from("cache").join("recommend_cache.json"))
        );

        config.cache_dir = None;
        assert!(config.snapshot_path().is_none());
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        env::set_var("RECIPE_TEST_GARBAGE_NUMBER", "not-a-number");
        assert_eq!(env_or("RECIPE_TEST_GARBAGE_NUMBER", 7usize), 7);
        env::remove_var("RECIPE_TEST_GARBAGE_NUMBER");
    }
}
