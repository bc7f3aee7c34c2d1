//! Recommendation Service
//!
//! The object handed to request handlers: selection wrapped in the cache and
//! timed by the monitor. Built once at startup.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::cache::{fingerprint, RecommendationCache};
use crate::catalog::{CatalogStore, LoadedCatalog};
use crate::classify::DietaryOracle;
use crate::config::Config;
use crate::error::{RecommendError, Result};
use crate::filter::{FilterPipeline, FilterSpec};
use crate::monitor::PerformanceMonitor;
use crate::recommend::{RatingModel, RecommendationSet, Scorer, Selector};

#[derive(Serialize)]
struct RecommendKey<'a> {
    op: &'static str,
    customer_id: &'a str,
    filters: &'a FilterSpec,
    count: usize,
    randomize: bool,
    seed: Option<u64>,
    history_len: usize,
    interactions: usize,
}

#[derive(Serialize)]
struct PopularKey<'a> {
    op: &'static str,
    filters: &'a FilterSpec,
    count: usize,
    interactions: usize,
}

// == Recommendation Service ==
#[derive(Debug)]
pub struct RecommendationService {
    catalog: Arc<CatalogStore>,
    selector: Selector,
    cache: Arc<RecommendationCache>,
    monitor: Arc<PerformanceMonitor>,
}

impl RecommendationService {
    /// Builds the service with a cache and monitor sized from `config`.
    pub fn new(catalog: Arc<CatalogStore>, oracle: Arc<DietaryOracle>, config: &Config) -> Self {
        Self::with_parts(
            catalog,
            oracle,
            Arc::new(RecommendationCache::from_config(config)),
            Arc::new(PerformanceMonitor::new(config.monitor_history)),
            config.fallback_cap,
        )
    }

    pub fn from_loaded(loaded: LoadedCatalog, config: &Config) -> Self {
        Self::new(Arc::new(loaded.store), Arc::new(loaded.oracle), config)
    }

    /// Builds the service around existing shared components.
    pub fn with_parts(
        catalog: Arc<CatalogStore>,
        oracle: Arc<DietaryOracle>,
        cache: Arc<RecommendationCache>,
        monitor: Arc<PerformanceMonitor>,
        fallback_cap: usize,
    ) -> Self {
        Self {
            catalog,
            selector: Selector::new(FilterPipeline::new(oracle, fallback_cap), Scorer::new()),
            cache,
            monitor,
        }
    }

    /// Installs a rating model used instead of precomputed scores.
    pub fn with_rating_model(mut self, model: Arc<dyn RatingModel>) -> Self {
        self.selector = Selector::new(self.selector.pipeline().clone(), Scorer::with_model(model));
        self
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn cache(&self) -> &RecommendationCache {
        &self.cache
    }

    /// Shared handle for background maintenance.
    pub fn cache_handle(&self) -> Arc<RecommendationCache> {
        Arc::clone(&self.cache)
    }

    pub fn monitor(&self) -> &PerformanceMonitor {
        &self.monitor
    }

    // == Recommend ==
    /// Top-K recipes for a customer.
    ///
    /// Customers without history get the popularity ranking, flagged as cold
    /// start. A randomized request without a seed is seeded from the clock
    /// and bypasses the cache.
    ///
    /// # Arguments
    /// * `customer_id` - Customer being served
    /// * `filters` - Dietary and soft constraints
    /// * `count` - Number of results wanted, at least 1
    /// * `randomize` - Perturb and sample the ranking
    /// * `seed` - Seed for the randomization
    pub fn recommend(
        &self,
        customer_id: &str,
        filters: &FilterSpec,
        count: usize,
        randomize: bool,
        seed: Option<u64>,
    ) -> Result<RecommendationSet> {
        self.monitor.time("recommend", || {
            validate_count(count)?;
            let filters = filters.normalized();
            let effective_seed = if randomize {
                Some(seed.unwrap_or_else(|| Utc::now().timestamp_millis() as u64))
            } else {
                None
            };
            let cacheable = !randomize || seed.is_some();

            let history = match self.catalog.history(customer_id) {
                Ok(history) => Some(history),
                Err(RecommendError::NotFound(_)) => None,
                Err(err) => return Err(err),
            };

            let key = RecommendKey {
                op: "recommend",
                customer_id,
                filters: &filters,
                count,
                randomize,
                seed: effective_seed.filter(|_| cacheable),
                history_len: history.map_or(0, <[_]>::len),
                interactions: self.catalog.interaction_count(),
            };
            let key = if cacheable { Some(fingerprint(&key)?) } else { None };

            self.cached(key, || match history {
                Some(history) => self.selector.select_warm(
                    &self.catalog,
                    customer_id,
                    history,
                    &filters,
                    count,
                    effective_seed,
                ),
                None => {
                    info!("No history for '{}', serving popular recipes", customer_id);
                    self.selector
                        .select_cold(&self.catalog, &filters, count, effective_seed)
                }
            })
        })
    }

    // == Popular ==
    /// Popularity ranking, every item flagged as cold start.
    pub fn popular(&self, filters: &FilterSpec, count: usize) -> Result<RecommendationSet> {
        self.monitor.time("popular", || {
            validate_count(count)?;
            let filters = filters.normalized();
            let key = fingerprint(&PopularKey {
                op: "popular",
                filters: &filters,
                count,
                interactions: self.catalog.interaction_count(),
            })?;
            self.cached(Some(key), || {
                self.selector.select_cold(&self.catalog, &filters, count, None)
            })
        })
    }

    /// Serves from the cache when possible, otherwise computes and stores.
    fn cached<F>(&self, key: Option<String>, compute: F) -> Result<RecommendationSet>
    where
        F: FnOnce() -> RecommendationSet,
    {
        if let Some(key) = key.as_deref() {
            if let Some(value) = self.cache.get(key) {
                match serde_json::from_value::<RecommendationSet>(value) {
                    Ok(set) => {
                        self.monitor.record_cache_hit();
                        return Ok(set);
                    }
                    Err(err) => {
                        warn!("Dropping undecodable cache entry: {}", err);
                        self.cache.remove(key);
                    }
                }
            }
            self.monitor.record_cache_miss();
        }

        let set = compute();
        if let Some(key) = key {
            let value = serde_json::to_value(&set)
                .map_err(|err| RecommendError::Internal(format!("Cannot cache result: {}", err)))?;
            self.cache.set(key, value, None);
        }
        Ok(set)
    }
}

fn validate_count(count: usize) -> Result<()> {
    if count == 0 {
        return Err(RecommendError::InvalidRequest(
            "count must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::recipe::fixtures::recipe;
    use crate::catalog::{Interaction, Recipe};
    use crate::filter::DietaryRestriction;

    fn service(interactions: Vec<(String, Interaction)>) -> RecommendationService {
        let catalog = CatalogStore::build(
            vec![
                recipe("R1", "Đậu hũ non", 0.2, 0.3),
                recipe("R2", "Thịt bò xào", 0.5, 0.5),
            ],
            interactions,
        )
        .unwrap();
        let config = Config {
            cache_dir: None,
            ..Config::default()
        };
        RecommendationService::new(Arc::new(catalog), Arc::new(DietaryOracle::empty()), &config)
    }

    #[test]
    fn test_zero_count_is_invalid() {
        let svc = service(Vec::new());
        assert!(matches!(
            svc.recommend("C", &FilterSpec::new(), 0, false, None),
            Err(RecommendError::InvalidRequest(_))
        ));
        assert!(matches!(
            svc.popular(&FilterSpec::new(), 0),
            Err(RecommendError::InvalidRequest(_))
        ));
        assert_eq!(svc.monitor().stats().total_errors, 2);
    }

    #[test]
    fn test_unknown_customer_goes_cold() {
        let svc = service(Vec::new());
        let filters = FilterSpec::new().with_restriction(DietaryRestriction::Vegetarian);
        let set = svc.recommend("C", &filters, 1, false, None).unwrap();
        assert_eq!(set.ids(), vec!["R1"]);
        assert!(set.cold_start);
        assert!(set.items[0].cold_start);
    }

    #[test]
    fn test_repeat_request_hits_cache() {
        let svc = service(vec![("C".to_string(), Interaction::rated("R2", 5.0))]);
        let first = svc.recommend("C", &FilterSpec::new(), 2, false, None).unwrap();
        let second = svc.recommend("C", &FilterSpec::new(), 2, false, None).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.ids(), vec!["R1"]);
        let stats = svc.cache().stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_unseeded_random_request_skips_cache() {
        let svc = service(vec![("C".to_string(), Interaction::rated("R2", 5.0))]);
        svc.recommend("C", &FilterSpec::new(), 1, true, None).unwrap();
        svc.recommend("C", &FilterSpec::new(), 1, true, None).unwrap();
        assert!(svc.cache().is_empty());
        svc.recommend("C", &FilterSpec::new(), 1, true, Some(5)).unwrap();
        assert_eq!(svc.cache().len(), 1);
    }

    #[test]
    fn test_popular_is_cold_and_cached() {
        let svc = service(vec![("C".to_string(), Interaction::rated("R2", 4.0))]);
        let set = svc.popular(&FilterSpec::new(), 5).unwrap();
        assert!(set.items.iter().all(|item| item.cold_start));
        assert_eq!(set.ids()[0], "R2");
        svc.popular(&FilterSpec::new(), 5).unwrap();
        assert_eq!(svc.monitor().stats().cache_hit_rate, 50.0);
    }

    struct Reverse;

    impl RatingModel for Reverse {
        fn predict(&self, _customer_id: &str, recipe: &Recipe) -> Option<f64> {
            Some(-recipe.base_score())
        }
    }

    #[test]
    fn test_rating_model_overrides_precomputed_scores() {
        let catalog = CatalogStore::build(
            vec![
                recipe("R1", "Canh chua", 0.2, 0.3),
                recipe("R2", "Rau xào", 0.5, 0.5),
                recipe("R3", "Phở chay", 0.0, 0.1),
            ],
            vec![("C".to_string(), Interaction::rated("R1", 5.0))],
        )
        .unwrap();
        let config = Config {
            cache_dir: None,
            ..Config::default()
        };
        let svc = RecommendationService::new(Arc::new(catalog), Arc::new(DietaryOracle::empty()), &config)
            .with_rating_model(Arc::new(Reverse));
        let set = svc.recommend("C", &FilterSpec::new(), 2, false, None).unwrap();
        assert_eq!(set.ids(), vec!["R3", "R2"]);
    }
}
