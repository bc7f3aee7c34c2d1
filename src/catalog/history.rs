//! Customer interaction history.

use serde::{Deserialize, Serialize};

use crate::catalog::{Difficulty, MealTime};

/// One recorded interaction between a customer and a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub recipe_id: String,
    pub rating: f64,
    #[serde(default = "default_interaction_type")]
    pub interaction_type: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub meal_time: Option<MealTime>,
}

impl Interaction {
    pub fn rated(recipe_id: impl Into<String>, rating: f64) -> Self {
        Self {
            recipe_id: recipe_id.into(),
            rating,
            interaction_type: default_interaction_type(),
            difficulty: None,
            meal_time: None,
        }
    }
}

fn default_interaction_type() -> String {
    "rating".to_string()
}

/// Interaction row as it appears in a catalog document.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionRecord {
    pub customer_id: String,
    #[serde(flatten)]
    pub interaction: Interaction,
}
