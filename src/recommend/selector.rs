//! Selector
//!
//! Top-K extraction for known customers and the popularity path for
//! customers without history.

use std::collections::{HashMap, HashSet};

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::catalog::{CatalogStore, Interaction, Recipe};
use crate::filter::{EmptyReason, FilterPipeline, FilterReport, FilterSpec};
use crate::recommend::{Recommendation, RecommendationSet, Scored, Scorer};

/// Popularity bonus per recorded rating.
pub const POPULARITY_BOOST: f64 = 0.1;

/// Popularity of a recipe: mean rating scaled by how often it was rated.
pub fn popularity(mean_rating: f64, interaction_count: usize) -> f64 {
    if interaction_count == 0 {
        return 0.0;
    }
    mean_rating * (1.0 + interaction_count as f64 * POPULARITY_BOOST)
}

// == Weighted Sample ==
/// Samples without replacement from the top of a ranked list.
///
/// Takes the first `3 * count` items and draws `min(2 * count, pool)` of them.
/// On every draw the item at position `i` of the remaining pool has weight
/// `1 / (i + 1)`. The draws are returned in the order they were made.
pub fn weighted_sample<'r>(
    ranked: Vec<Scored<'r>>,
    count: usize,
    rng: &mut StdRng,
) -> Vec<Scored<'r>> {
    let mut pool: Vec<Scored<'r>> = ranked.into_iter().take(count.saturating_mul(3)).collect();
    let picks = count.saturating_mul(2).min(pool.len());
    let mut chosen = Vec::with_capacity(picks);

    while chosen.len() < picks {
        let weights = (0..pool.len()).map(|i| 1.0 / (i as f64 + 1.0));
        let Ok(dist) = WeightedIndex::new(weights) else {
            break;
        };
        chosen.push(pool.remove(dist.sample(rng)));
    }
    chosen
}

// == Selector ==
#[derive(Debug, Clone)]
pub struct Selector {
    pipeline: FilterPipeline,
    scorer: Scorer,
}

impl Selector {
    pub fn new(pipeline: FilterPipeline, scorer: Scorer) -> Self {
        Self { pipeline, scorer }
    }

    pub fn pipeline(&self) -> &FilterPipeline {
        &self.pipeline
    }

    // == Warm Path ==
    /// Personalized top-K for a customer with history.
    ///
    /// Recipes already in the history are never candidates. With a seed the
    /// ranked list is perturbed and weight-sampled before the soft stages run.
    ///
    /// # Arguments
    /// * `catalog` - Recipe source
    /// * `customer_id` - Customer being served
    /// * `history` - The customer's interactions
    /// * `filters` - Dietary and soft constraints
    /// * `count` - Maximum number of results
    /// * `seed` - Randomization seed, `None` for a deterministic ranking
    pub fn select_warm(
        &self,
        catalog: &CatalogStore,
        customer_id: &str,
        history: &[Interaction],
        filters: &FilterSpec,
        count: usize,
        seed: Option<u64>,
    ) -> RecommendationSet {
        let mut report = FilterReport::default();
        let seen: HashSet<&str> = history.iter().map(|i| i.recipe_id.as_str()).collect();
        let candidates: Vec<&Recipe> = catalog
            .recipes()
            .iter()
            .filter(|recipe| !seen.contains(recipe.id.as_str()))
            .collect();

        if candidates.is_empty() {
            info!("Customer '{}' has interacted with every recipe", customer_id);
            report.empty_reason = Some(EmptyReason::NoCandidates);
            return RecommendationSet::new(Vec::new(), false, report);
        }

        let eligible = self
            .pipeline
            .dietary(&candidates, &filters.dietary, &mut report);
        if eligible.is_empty() {
            report.empty_reason = Some(EmptyReason::DietaryExcludedAll {
                restrictions: filters.dietary.clone(),
            });
            return RecommendationSet::new(Vec::new(), false, report);
        }

        let mut rng = seed.map(StdRng::seed_from_u64);
        let ranked = self
            .scorer
            .rank(Some(customer_id), &eligible, rng.as_mut());
        let pool = match rng.as_mut() {
            Some(rng) => weighted_sample(ranked, count, rng),
            None => ranked,
        };

        let scores: HashMap<&str, f64> = pool
            .iter()
            .map(|scored| (scored.recipe.id.as_str(), scored.score))
            .collect();
        let pooled: Vec<&Recipe> = pool.iter().map(|scored| scored.recipe).collect();
        let kept = self
            .pipeline
            .soft(pooled, &filters.soft_stages(), &mut report);

        let items = kept
            .into_iter()
            .take(count)
            .map(|recipe| {
                let score = scores.get(recipe.id.as_str()).copied().unwrap_or(0.0);
                Recommendation::personalized(recipe, score)
            })
            .collect();

        RecommendationSet::new(items, false, report)
    }

    // == Cold Path ==
    /// Popularity ranking for customers without history.
    ///
    /// Only the dietary, meal-time and difficulty constraints apply. With a
    /// seed, the final top-K is shuffled.
    pub fn select_cold(
        &self,
        catalog: &CatalogStore,
        filters: &FilterSpec,
        count: usize,
        seed: Option<u64>,
    ) -> RecommendationSet {
        let summaries = catalog.rating_summaries();
        let all: Vec<&Recipe> = catalog.recipes().iter().collect();
        let filtered = self
            .pipeline
            .run_stages(&all, &filters.dietary, &filters.cold_start_stages());

        let mut ranked: Vec<(&Recipe, f64, usize)> = filtered
            .recipes
            .into_iter()
            .map(|recipe| {
                let summary = summaries.get(recipe.id.as_str()).copied().unwrap_or_default();
                (recipe, popularity(summary.mean(), summary.count), summary.count)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(count);

        if let Some(seed) = seed {
            ranked.shuffle(&mut StdRng::seed_from_u64(seed));
        }
        debug!("Cold start selected {} recipes", ranked.len());

        let items = ranked
            .into_iter()
            .map(|(recipe, score, interactions)| Recommendation::popular(recipe, score, interactions))
            .collect();
        RecommendationSet::new(items, true, filtered.report)
    }
}
