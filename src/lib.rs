//! Recipe Recommender - recommendation core with constraint filtering
//!
//! Ranks recipes for a customer from collaborative and content signals,
//! applies dietary and soft constraints, falls back to popularity for new
//! customers, and memoizes results in a TTL/LRU cache.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod monitor;
pub mod recommend;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{RecommendError, Result};
pub use recommend::RecommendationService;
pub use tasks::spawn_cleanup_task;
