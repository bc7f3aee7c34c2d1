//! Monitor Module
//!
//! Latency and success aggregation with health classification.

mod performance;
mod sample;

pub use performance::{EndpointStats, MonitorStats, PerformanceMonitor};
pub use sample::{HealthStatus, PerformanceSample};
