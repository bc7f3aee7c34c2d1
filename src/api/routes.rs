//! API Routes
//!
//! Configures the Axum router with all recommendation endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, health_handler, popular_handler, recommend_handler, stats_handler,
    sweep_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /recommend` - Personalized or cold-start recommendations
/// - `GET /popular` - Popularity ranking
/// - `GET /stats` - Latency and success statistics
/// - `GET /cache/stats` - Cache statistics
/// - `POST /cache/sweep` - Purge expired cache entries
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/recommend", get(recommend_handler))
        .route("/popular", get(popular_handler))
        .route("/stats", get(stats_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .route("/cache/sweep", post(sweep_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
