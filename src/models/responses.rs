//! Response DTOs for the recommendation API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::filter::{AgeGroup, FilterReport};
use crate::monitor::HealthStatus;
use crate::recommend::{Recommendation, RecommendationSet};

/// Response body for `GET /recommend` and `GET /popular`.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub count: usize,
    pub cold_start: bool,
    pub recommendations: Vec<Recommendation>,
    pub filter_report: FilterReport,
    /// Human-readable reason when nothing could be recommended
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_reason: Option<String>,
    /// Nutrition focus of the requested age group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition_focus: Option<&'static str>,
}

impl RecommendResponse {
    pub fn new(customer_id: Option<String>, set: RecommendationSet, age_group: Option<AgeGroup>) -> Self {
        Self {
            customer_id,
            count: set.items.len(),
            cold_start: set.cold_start,
            empty_reason: set.empty_reason.as_ref().map(ToString::to_string),
            recommendations: set.items,
            filter_report: set.filter_report,
            nutrition_focus: age_group.map(|group| group.nutrition_focus()),
        }
    }
}

/// Response body for the cache stats endpoint (GET /cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expired: u64,
    pub total_entries: usize,
    pub max_entries: usize,
    pub snapshots_written: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    pub usage_percent: f64,
}

impl From<CacheStats> for CacheStatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            usage_percent: stats.usage_percent(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expired: stats.expired,
            total_entries: stats.total_entries,
            max_entries: stats.max_entries,
            snapshots_written: stats.snapshots_written,
        }
    }
}

/// Response body for POST /cache/sweep
#[derive(Debug, Clone, Serialize)]
pub struct SweepResponse {
    pub removed: usize,
    pub remaining: usize,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    pub recipes: usize,
    pub customers: usize,
}

impl HealthResponse {
    pub fn new(status: HealthStatus, recipes: usize, customers: usize) -> Self {
        Self {
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
            recipes,
            customers,
        }
    }
}
