//! Recommendation results.

use serde::{Deserialize, Serialize};

use crate::catalog::{Difficulty, MealTime, Recipe};
use crate::filter::{EmptyReason, FilterReport};

/// Reason attached to popularity-based results.
pub const COLD_START_REASON: &str = "Popular with other customers";

// == Recommendation ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recipe_id: String,
    pub name: String,
    pub difficulty: Difficulty,
    pub meal_time: MealTime,
    /// Rank value: predicted score on the warm path, popularity when cold
    pub score: f64,
    pub avg_rating: f64,
    pub cold_start: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Ratings recorded for the recipe, reported on the cold path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_count: Option<usize>,
}

impl Recommendation {
    /// A personalized result.
    pub fn personalized(recipe: &Recipe, score: f64) -> Self {
        Self {
            recipe_id: recipe.id.clone(),
            name: recipe.name.clone(),
            difficulty: recipe.difficulty,
            meal_time: recipe.meal_time,
            score,
            avg_rating: recipe.avg_rating,
            cold_start: false,
            reason: None,
            interaction_count: None,
        }
    }

    /// A popularity result, always flagged as cold start.
    pub fn popular(recipe: &Recipe, popularity: f64, interaction_count: usize) -> Self {
        Self {
            cold_start: true,
            reason: Some(COLD_START_REASON.to_string()),
            interaction_count: Some(interaction_count),
            ..Self::personalized(recipe, popularity)
        }
    }
}

// == Recommendation Set ==
/// Ordered results of one request plus how the filters behaved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub items: Vec<Recommendation>,
    pub cold_start: bool,
    pub filter_report: FilterReport,
    /// Set when no recipe could be returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_reason: Option<EmptyReason>,
}

impl RecommendationSet {
    pub fn new(items: Vec<Recommendation>, cold_start: bool, filter_report: FilterReport) -> Self {
        let empty_reason = if items.is_empty() {
            Some(
                filter_report
                    .empty_reason
                    .clone()
                    .unwrap_or(EmptyReason::NoCandidates),
            )
        } else {
            None
        };
        Self {
            items,
            cold_start,
            filter_report,
            empty_reason,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.recipe_id.as_str()).collect()
    }
}
