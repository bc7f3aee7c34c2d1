//! Dietary stage: the hard constraint of the pipeline.

use tracing::{debug, warn};

use crate::catalog::Recipe;
use crate::classify::DietaryOracle;
use crate::filter::DietaryRestriction;

/// Result of running the dietary stage over a candidate set.
#[derive(Debug, Default)]
pub struct DietaryOutcome<'r> {
    pub kept: Vec<&'r Recipe>,
    /// Candidates classified from their name because the oracle had no entry
    pub degraded: usize,
}

/// Keeps the candidates that satisfy every restriction.
///
/// Each recipe is classified once. A missing profile degrades to keyword
/// classification of the name; this is logged and never fails.
///
/// # Arguments
/// * `oracle` - Profile table used for classification
/// * `candidates` - Recipes to check, in rank order
/// * `restrictions` - Restrictions that must all hold
pub fn apply_dietary<'r>(
    oracle: &DietaryOracle,
    candidates: &[&'r Recipe],
    restrictions: &[DietaryRestriction],
) -> DietaryOutcome<'r> {
    if restrictions.is_empty() {
        return DietaryOutcome {
            kept: candidates.to_vec(),
            degraded: 0,
        };
    }

    let mut outcome = DietaryOutcome::default();
    for &recipe in candidates {
        let classified = oracle.classify(recipe);
        if classified.is_degraded() {
            debug!("No dietary profile for '{}', using keywords", recipe.id);
            outcome.degraded += 1;
        }
        let name = recipe.normalized_name();
        if restrictions
            .iter()
            .all(|restriction| restriction.admits(&classified.profile, &name))
        {
            outcome.kept.push(recipe);
        }
    }

    if outcome.degraded > 0 {
        warn!(
            "Dietary stage ran in degraded mode for {} of {} recipes",
            outcome.degraded,
            candidates.len()
        );
    }
    outcome
}
