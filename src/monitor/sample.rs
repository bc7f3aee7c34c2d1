//! Performance samples and health classification.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Performance Sample ==
/// One timed call of a core operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSample {
    pub endpoint: String,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: f64,
    pub success: bool,
}

impl PerformanceSample {
    pub fn new(endpoint: &str, duration: Duration, success: bool) -> Self {
        Self::at(endpoint, Utc::now(), duration, success)
    }

    pub fn at(endpoint: &str, timestamp: DateTime<Utc>, duration: Duration, success: bool) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            timestamp,
            duration_ms: duration.as_secs_f64() * 1000.0,
            success,
        }
    }
}

// == Health Status ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

/// Success rate (percent) below which the service is critical.
pub const CRITICAL_SUCCESS_RATE: f64 = 90.0;
/// Success rate (percent) below which the service is degraded.
pub const WARNING_SUCCESS_RATE: f64 = 95.0;
/// Average latency above which the service is degraded.
pub const WARNING_LATENCY_MS: f64 = 5_000.0;

impl HealthStatus {
    /// Classifies a window by its average latency and success rate.
    ///
    /// # Arguments
    /// * `avg_latency_ms` - Mean duration over the window
    /// * `success_rate` - Share of successful calls, in percent
    pub fn classify(avg_latency_ms: f64, success_rate: f64) -> Self {
        if success_rate < CRITICAL_SUCCESS_RATE {
            HealthStatus::Critical
        } else if avg_latency_ms > WARNING_LATENCY_MS || success_rate < WARNING_SUCCESS_RATE {
            HealthStatus::Warning
        } else {
            HealthStatus::Healthy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Warning => "warning",
            HealthStatus::Critical => "critical",
        }
    }
}
