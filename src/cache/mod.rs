//! Cache Module
//!
//! Content-addressed memoization of recommendation results with TTL expiry,
//! batch LRU eviction and best-effort disk snapshots.

mod entry;
mod fingerprint;
mod lru;
mod shared;
mod snapshot;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use fingerprint::{canonicalize, fingerprint};
pub use lru::LruTracker;
pub use shared::RecommendationCache;
pub use stats::CacheStats;
pub use store::CacheStore;
