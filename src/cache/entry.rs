//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with hour-based TTL.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Milliseconds in one hour.
const HOUR_MS: u64 = 3_600_000;

// == Cache Entry ==
/// A memoized query result with its creation time and lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Lifetime in hours, counted from `created_at`
    pub ttl_hours: u32,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_hours` - Lifetime in hours; 0 makes the entry expire immediately
    pub fn new(value: Value, ttl_hours: u32) -> Self {
        Self::created_at(value, ttl_hours, current_timestamp_ms())
    }

    /// Creates an entry with an explicit creation time.
    pub fn created_at(value: Value, ttl_hours: u32, created_at: u64) -> Self {
        Self {
            value,
            created_at,
            ttl_hours,
        }
    }

    /// Unix milliseconds at which the entry stops being served.
    pub fn expires_at(&self) -> u64 {
        self.created_at
            .saturating_add(u64::from(self.ttl_hours).saturating_mul(HOUR_MS))
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches `expires_at`, so a
    /// zero TTL is expired as soon as it is created.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at()
    }

    /// Remaining lifetime in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.expires_at().saturating_sub(current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zero_ttl_is_expired_immediately() {
        let entry = CacheEntry::new(json!(["R1"]), 0);
        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining_ms(), 0);
    }

    #[test]
    fn test_fresh_entry_is_live() {
        let entry = CacheEntry::new(json!({"ids": ["R1", "R2"]}), 24);
        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining_ms() > 23 * HOUR_MS);
    }

    #[test]
    fn test_expiration_boundary() {
        let entry = CacheEntry::created_at(json!(1), 2, 1_000);
        assert_eq!(entry.expires_at(), 1_000 + 2 * HOUR_MS);
        assert!(!entry.is_expired_at(1_000 + 2 * HOUR_MS - 1));
        assert!(entry.is_expired_at(1_000 + 2 * HOUR_MS));
    }

    #[test]
    fn test_entry_serde_shape() {
        let entry = CacheEntry::created_at(json!("v"), 1, 5);
        let encoded = serde_json::to_value(&entry).unwrap();
        assert_eq!(encoded, json!({"value": "v", "created_at": 5, "ttl_hours": 1}));
    }
}
