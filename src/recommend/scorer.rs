//! Scorer
//!
//! Turns candidates into ranked, scored items. The rank value is a model
//! prediction when a model is installed, otherwise the precomputed
//! collaborative plus content score.

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;

use crate::catalog::Recipe;

/// Bounds of the multiplicative perturbation applied when randomizing.
pub const PERTURBATION: (f64, f64) = (0.95, 1.05);

// == Rating Model ==
/// A trained predictor of how a customer would rate a recipe.
pub trait RatingModel: Send + Sync {
    /// Predicted rating, or `None` when the model cannot score this pair.
    fn predict(&self, customer_id: &str, recipe: &Recipe) -> Option<f64>;
}

/// A recipe with its rank value.
#[derive(Debug, Clone, Copy)]
pub struct Scored<'r> {
    pub recipe: &'r Recipe,
    pub score: f64,
}

// == Scorer ==
#[derive(Clone, Default)]
pub struct Scorer {
    model: Option<Arc<dyn RatingModel>>,
}

impl fmt::Debug for Scorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scorer")
            .field("has_model", &self.has_model())
            .finish()
    }
}

impl Scorer {
    /// A scorer that ranks by precomputed scores only.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(model: Arc<dyn RatingModel>) -> Self {
        Self { model: Some(model) }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    // == Rank ==
    /// Scores and sorts candidates, highest first.
    ///
    /// With `rng`, every score is multiplied by a factor drawn uniformly
    /// from [0.95, 1.05]. The sort is stable, so equal scores keep their
    /// input order.
    ///
    /// # Arguments
    /// * `customer_id` - Customer the model predicts for, if any
    /// * `candidates` - Recipes to rank, in first-seen order
    /// * `rng` - Seeded generator for the perturbation
    pub fn rank<'r>(
        &self,
        customer_id: Option<&str>,
        candidates: &[&'r Recipe],
        mut rng: Option<&mut StdRng>,
    ) -> Vec<Scored<'r>> {
        let model = match (&self.model, customer_id) {
            (Some(model), Some(customer)) => Some((model.as_ref(), customer)),
            _ => None,
        };

        let mut scored: Vec<Scored<'r>> = candidates
            .iter()
            .map(|&recipe| {
                let base = match model {
                    Some((model, customer)) => model
                        .predict(customer, recipe)
                        .filter(|p| p.is_finite())
                        .unwrap_or_else(|| recipe.base_score()),
                    None => recipe.base_score(),
                };
                let score = match rng.as_deref_mut() {
                    Some(rng) => base * rng.gen_range(PERTURBATION.0..=PERTURBATION.1),
                    None => base,
                };
                Scored { recipe, score }
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::catalog::recipe::fixtures::recipe;

    struct FixedModel;

    impl RatingModel for FixedModel {
        fn predict(&self, _customer_id: &str, recipe: &Recipe) -> Option<f64> {
            (recipe.id == "R1").then_some(9.0)
        }
    }

    fn ids(scored: &[Scored<'_>]) -> Vec<String> {
        scored.iter().map(|s| s.recipe.id.clone()).collect()
    }

    #[test]
    fn test_rank_by_base_score() {
        let r1 = recipe("R1", "Đậu hũ", 0.2, 0.3);
        let r2 = recipe("R2", "Thịt kho", 0.5, 0.5);
        let ranked = Scorer::new().rank(None, &[&r1, &r2], None);
        assert_eq!(ids(&ranked), vec!["R2", "R1"]);
        assert!((ranked[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let a = recipe("A", "Món A", 0.1, 0.1);
        let b = recipe("B", "Món B", 0.1, 0.1);
        let c = recipe("C", "Món C", 0.1, 0.1);
        let ranked = Scorer::new().rank(None, &[&b, &c, &a], None);
        assert_eq!(ids(&ranked), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_same_seed_same_scores() {
        let a = recipe("A", "Món A", 0.3, 0.1);
        let b = recipe("B", "Món B", 0.2, 0.1);
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);
        let first = Scorer::new().rank(None, &[&a, &b], Some(&mut rng1));
        let second = Scorer::new().rank(None, &[&a, &b], Some(&mut rng2));
        for (x, y) in first.iter().zip(&second) {
            assert_eq!(x.recipe.id, y.recipe.id);
            assert_eq!(x.score, y.score);
        }
    }

    #[test]
    fn test_perturbation_stays_in_bounds() {
        let a = recipe("A", "Món A", 0.5, 0.5);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let scored = Scorer::new().rank(None, &[&a], Some(&mut rng));
            assert!(scored[0].score >= 0.95 && scored[0].score <= 1.05);
        }
    }

    #[test]
    fn test_model_prediction_with_fallback() {
        let r1 = recipe("R1", "Đậu hũ", 0.0, 0.0);
        let r2 = recipe("R2", "Thịt kho", 0.5, 0.5);
        let scorer = Scorer::with_model(Arc::new(FixedModel));
        assert!(scorer.has_model());
        let ranked = scorer.rank(Some("C1"), &[&r2, &r1], None);
        assert_eq!(ids(&ranked), vec!["R1", "R2"]);
        assert!((ranked[1].score - 1.0).abs() < 1e-9);
    }
}
