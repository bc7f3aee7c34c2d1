//! Recipe Module
//!
//! Immutable recipe records and their categorical attributes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RecommendError, Result};

// == Difficulty ==
/// Preparation difficulty of a recipe.
///
/// Deserializes from the English labels and from the source catalog labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[serde(alias = "Easy", alias = "Dễ")]
    Easy,
    #[serde(alias = "Medium", alias = "Trung bình")]
    Medium,
    #[serde(alias = "Hard", alias = "Khó")]
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = RecommendError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "dễ" => Ok(Difficulty::Easy),
            "medium" | "trung bình" => Ok(Difficulty::Medium),
            "hard" | "khó" => Ok(Difficulty::Hard),
            other => Err(RecommendError::InvalidRequest(format!(
                "Unknown difficulty '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Meal Time ==
/// Meal slot a recipe is intended for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealTime {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealTime {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealTime::Breakfast => "breakfast",
            MealTime::Lunch => "lunch",
            MealTime::Dinner => "dinner",
        }
    }
}

impl FromStr for MealTime {
    type Err = RecommendError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealTime::Breakfast),
            "lunch" => Ok(MealTime::Lunch),
            "dinner" => Ok(MealTime::Dinner),
            other => Err(RecommendError::InvalidRequest(format!(
                "Unknown meal time '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for MealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Recipe ==
/// A catalog recipe. Immutable after load.
///
/// Every numeric field is required; a row missing one is rejected as
/// malformed input when the catalog is deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub difficulty: Difficulty,
    pub meal_time: MealTime,
    #[serde(default)]
    pub nutrition_category: Option<String>,
    pub estimated_calories: u32,
    pub preparation_time_minutes: u32,
    pub ingredient_count: u32,
    pub estimated_price_vnd: u64,
    pub content_score: f64,
    #[serde(alias = "cf_score")]
    pub collaborative_score: f64,
    pub avg_rating: f64,
}

impl Recipe {
    /// Precomputed relevance: collaborative plus content score.
    pub fn base_score(&self) -> f64 {
        self.collaborative_score + self.content_score
    }

    /// Lowercased name used for keyword matching.
    pub fn normalized_name(&self) -> String {
        self.name.to_lowercase()
    }

    /// Checks the invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(RecommendError::MalformedInput(
                "Recipe id cannot be empty".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(RecommendError::MalformedInput(format!(
                "Recipe '{}' has an empty name",
                self.id
            )));
        }
        for (field, value) in [
            ("content_score", self.content_score),
            ("collaborative_score", self.collaborative_score),
            ("avg_rating", self.avg_rating),
        ] {
            if !value.is_finite() {
                return Err(RecommendError::MalformedInput(format!(
                    "Recipe '{}' has a non-finite {}",
                    self.id, field
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Builds a recipe with neutral numeric fields for tests.
    pub fn recipe(id: &str, name: &str, content: f64, cf: f64) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: name.to_string(),
            difficulty: Difficulty::Easy,
            meal_time: MealTime::Lunch,
            nutrition_category: None,
            estimated_calories: 400,
            preparation_time_minutes: 30,
            ingredient_count: 6,
            estimated_price_vnd: 50_000,
            content_score: content,
            collaborative_score: cf,
            avg_rating: 4.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::recipe;
    use super::*;

    #[test]
    fn test_base_score_sums_signals() {
        let r = recipe("R1", "Canh chua", 0.2, 0.3);
        assert!((r.base_score() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_difficulty_accepts_source_labels() {
        let easy: Difficulty = serde_json::from_str("\"Dễ\"").unwrap();
        let medium: Difficulty = serde_json::from_str("\"Trung bình\"").unwrap();
        let hard: Difficulty = serde_json::from_str("\"hard\"").unwrap();
        assert_eq!(easy, Difficulty::Easy);
        assert_eq!(medium, Difficulty::Medium);
        assert_eq!(hard, Difficulty::Hard);
        assert_eq!("Khó".parse::<Difficulty>().unwrap(), Difficulty::Hard);
    }

    #[test]
    fn test_meal_time_parse_rejects_unknown() {
        assert_eq!("Dinner".parse::<MealTime>().unwrap(), MealTime::Dinner);
        assert!(matches!(
            "brunch".parse::<MealTime>(),
            Err(RecommendError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_missing_numeric_field_is_rejected() {
        let json = r#"{
            "id": "R1", "name": "Phở bò", "difficulty": "easy", "meal_time": "lunch",
            "estimated_calories": 500, "preparation_time_minutes": 40,
            "ingredient_count": 8, "estimated_price_vnd": 60000,
            "content_score": 0.4, "avg_rating": 4.2
        }"#;
        assert!(serde_json::from_str::<Recipe>(json).is_err());
    }

    #[test]
    fn test_cf_score_alias() {
        let json = r#"{
            "id": "R1", "name": "Phở bò", "difficulty": "easy", "meal_time": "lunch",
            "estimated_calories": 500, "preparation_time_minutes": 40,
            "ingredient_count": 8, "estimated_price_vnd": 60000,
            "content_score": 0.4, "cf_score": 0.1, "avg_rating": 4.2
        }"#;
        let r: Recipe = serde_json::from_str(json).unwrap();
        assert!((r.collaborative_score - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_non_finite_scores() {
        let r = recipe("R1", "Gỏi cuốn", f64::NAN, 0.3);
        assert!(matches!(r.validate(), Err(RecommendError::MalformedInput(_))));
    }
}
