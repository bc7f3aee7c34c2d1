//! Request and Response models for the recommendation API
//!
//! DTOs for query strings and JSON response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{RecommendQuery, DEFAULT_COUNT};
pub use responses::{CacheStatsResponse, HealthResponse, RecommendResponse, SweepResponse};
