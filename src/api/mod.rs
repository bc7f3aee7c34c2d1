//! API Module
//!
//! Thin HTTP surface over the recommendation service.
//!
//! # Endpoints
//! - `GET /recommend` - Recommendations for a customer
//! - `GET /popular` - Popularity ranking
//! - `GET /stats` - Performance statistics
//! - `GET /cache/stats` - Cache statistics
//! - `POST /cache/sweep` - Purge expired cache entries
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
