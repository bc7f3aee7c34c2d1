//! API Handlers
//!
//! HTTP request handlers for each recommendation endpoint. Handlers only
//! translate between query strings and the service.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;

use crate::catalog::LoadedCatalog;
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    CacheStatsResponse, HealthResponse, RecommendQuery, RecommendResponse, SweepResponse,
};
use crate::monitor::MonitorStats;
use crate::recommend::RecommendationService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RecommendationService>,
}

impl AppState {
    pub fn new(service: RecommendationService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Builds the service for a loaded catalog with the configured cache.
    pub fn from_config(loaded: LoadedCatalog, config: &Config) -> Self {
        Self::new(RecommendationService::from_loaded(loaded, config))
    }
}

/// Handler for GET /recommend
pub async fn recommend_handler(
    State(state): State<AppState>,
    Query(query): Query<RecommendQuery>,
) -> Result<Json<RecommendResponse>> {
    let customer_id = query.customer_id()?;
    let filters = query.filters()?;
    let set = state.service.recommend(
        customer_id,
        &filters,
        query.count,
        query.randomize,
        query.seed,
    )?;
    Ok(Json(RecommendResponse::new(
        Some(customer_id.to_string()),
        set,
        filters.age_group,
    )))
}

/// Handler for GET /popular
pub async fn popular_handler(
    State(state): State<AppState>,
    Query(query): Query<RecommendQuery>,
) -> Result<Json<RecommendResponse>> {
    let filters = query.filters()?;
    let set = state.service.popular(&filters, query.count)?;
    Ok(Json(RecommendResponse::new(None, set, filters.age_group)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<MonitorStats> {
    Json(state.service.monitor().stats())
}

/// Handler for GET /cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(state.service.cache().stats().into())
}

/// Handler for POST /cache/sweep
pub async fn sweep_handler(State(state): State<AppState>) -> Json<SweepResponse> {
    let cache = state.service.cache();
    let removed = cache.sweep_expired();
    info!("Manual sweep removed {} expired entries", removed);
    Json(SweepResponse {
        removed,
        remaining: cache.len(),
    })
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let service = &state.service;
    Json(HealthResponse::new(
        service.monitor().stats().health,
        service.catalog().len(),
        service.catalog().customers().len(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::recipe::fixtures::recipe;
    use crate::catalog::{CatalogStore, Interaction};
    use crate::classify::DietaryOracle;
    use crate::monitor::HealthStatus;

    fn state() -> AppState {
        let store = CatalogStore::build(
            vec![
                recipe("R1", "Đậu hũ non", 0.2, 0.3),
                recipe("R2", "Thịt bò xào", 0.5, 0.5),
            ],
            vec![("C1".to_string(), Interaction::rated("R2", 5.0))],
        )
        .unwrap();
        let config = Config {
            cache_dir: None,
            ..Config::default()
        };
        AppState::from_config(
            LoadedCatalog {
                store,
                oracle: DietaryOracle::empty(),
            },
            &config,
        )
    }

    fn query(customer_id: Option<&str>) -> RecommendQuery {
        RecommendQuery {
            customer_id: customer_id.map(str::to_string),
            count: 3,
            ..RecommendQuery::default()
        }
    }

    #[tokio::test]
    async fn test_recommend_handler_warm() {
        let response = recommend_handler(State(state()), Query(query(Some("C1"))))
            .await
            .unwrap();
        assert!(!response.cold_start);
        assert_eq!(response.recommendations.len(), 1);
        assert_eq!(response.recommendations[0].recipe_id, "R1");
    }

    #[tokio::test]
    async fn test_recommend_handler_requires_customer() {
        let result = recommend_handler(State(state()), Query(query(None))).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_popular_handler() {
        let response = popular_handler(State(state()), Query(query(None)))
            .await
            .unwrap();
        assert!(response.cold_start);
        assert_eq!(response.recommendations[0].recipe_id, "R2");
    }

    #[tokio::test]
    async fn test_sweep_and_cache_stats() {
        let state = state();
        popular_handler(State(state.clone()), Query(query(None)))
            .await
            .unwrap();
        let stats = cache_stats_handler(State(state.clone())).await;
        assert_eq!(stats.total_entries, 1);
        let sweep = sweep_handler(State(state)).await;
        assert_eq!(sweep.removed, 0);
        assert_eq!(sweep.remaining, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler(State(state())).await;
        assert_eq!(response.status, HealthStatus::Healthy);
        assert_eq!(response.recipes, 2);
        assert_eq!(response.customers, 1);
    }
}
