//! Soft filter stages.
//!
//! A soft stage narrows the working set but is allowed to give up: the
//! pipeline skips any stage whose result would be empty.

use std::collections::HashSet;

use crate::catalog::{Difficulty, MealTime, Recipe};
use crate::classify::keywords::{
    age_group_keywords, matches_any, meal_time_keywords, nutrition_keywords,
};
use crate::filter::{AgeGroup, NutritionType};

/// How an age-group stage widens a thin match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeFallback {
    /// Keep whatever matched
    Strict,
    /// Below `min_matches`, add the first `take` recipes of the input
    ExtendWithLeading { min_matches: usize, take: usize },
    /// Below `min_matches`, keep the whole input
    WholeInputBelow { min_matches: usize },
}

impl AgeGroup {
    /// Per-group widening policy applied after the age predicate.
    pub fn fallback_policy(&self) -> AgeFallback {
        match self {
            AgeGroup::Teenagers => AgeFallback::ExtendWithLeading {
                min_matches: 5,
                take: 10,
            },
            AgeGroup::Adults => AgeFallback::WholeInputBelow { min_matches: 5 },
            AgeGroup::Children | AgeGroup::Elderly => AgeFallback::Strict,
        }
    }

    /// Whether a single recipe suits this age group.
    pub fn admits(&self, recipe: &Recipe) -> bool {
        let name = recipe.normalized_name();
        let by_name = matches_any(&name, age_group_keywords(*self));
        match self {
            AgeGroup::Children => recipe.difficulty == Difficulty::Easy || by_name,
            AgeGroup::Teenagers => {
                by_name || matches!(recipe.meal_time, MealTime::Lunch | MealTime::Dinner)
            }
            AgeGroup::Adults => {
                by_name || matches!(recipe.difficulty, Difficulty::Medium | Difficulty::Hard)
            }
            AgeGroup::Elderly => {
                matches!(recipe.difficulty, Difficulty::Easy | Difficulty::Medium)
                    && (by_name
                        || matches!(recipe.meal_time, MealTime::Breakfast | MealTime::Lunch))
            }
        }
    }
}

// == Soft Stage ==
/// One relaxable narrowing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftStage {
    AgeGroup(AgeGroup),
    MealTime(MealTime),
    Nutrition(NutritionType),
    Difficulty(Difficulty),
}

impl SoftStage {
    /// Label used in logs and filter reports.
    pub fn name(&self) -> String {
        match self {
            SoftStage::AgeGroup(group) => format!("age_group:{}", group.as_str()),
            SoftStage::MealTime(meal) => format!("meal_time:{}", meal.as_str()),
            SoftStage::Nutrition(nutrition) => format!("nutrition:{}", nutrition.as_str()),
            SoftStage::Difficulty(difficulty) => format!("difficulty:{}", difficulty.as_str()),
        }
    }

    // == Apply ==
    /// Narrows `input`, preserving its order. May return an empty vector;
    /// deciding whether to skip is the pipeline's job.
    pub fn apply<'r>(&self, input: &[&'r Recipe]) -> Vec<&'r Recipe> {
        match self {
            SoftStage::AgeGroup(group) => apply_age_group(*group, input),
            SoftStage::MealTime(meal) => input
                .iter()
                .copied()
                .filter(|recipe| meal_time_matches(*meal, recipe))
                .collect(),
            SoftStage::Nutrition(nutrition) => apply_nutrition(*nutrition, input),
            SoftStage::Difficulty(difficulty) => input
                .iter()
                .copied()
                .filter(|recipe| recipe.difficulty == *difficulty)
                .collect(),
        }
    }
}

/// A recipe matches a meal time by its field or by a name keyword.
fn meal_time_matches(meal: MealTime, recipe: &Recipe) -> bool {
    recipe.meal_time == meal || matches_any(&recipe.normalized_name(), meal_time_keywords(meal))
}

fn apply_age_group<'r>(group: AgeGroup, input: &[&'r Recipe]) -> Vec<&'r Recipe> {
    let matched: Vec<&'r Recipe> = input
        .iter()
        .copied()
        .filter(|recipe| group.admits(recipe))
        .collect();

    match group.fallback_policy() {
        AgeFallback::Strict => matched,
        AgeFallback::WholeInputBelow { min_matches } if matched.len() < min_matches => {
            input.to_vec()
        }
        AgeFallback::ExtendWithLeading { min_matches, take } if matched.len() < min_matches => {
            let keep: HashSet<&str> = matched
                .iter()
                .chain(input.iter().take(take))
                .map(|recipe| recipe.id.as_str())
                .collect();
            input
                .iter()
                .copied()
                .filter(|recipe| keep.contains(recipe.id.as_str()))
                .collect()
        }
        _ => matched,
    }
}

fn apply_nutrition<'r>(nutrition: NutritionType, input: &[&'r Recipe]) -> Vec<&'r Recipe> {
    let by_category: Vec<&'r Recipe> = input
        .iter()
        .copied()
        .filter(|recipe| {
            recipe
                .nutrition_category
                .as_deref()
                .map(|category| category.eq_ignore_ascii_case(nutrition.as_str()))
                .unwrap_or(false)
        })
        .collect();
    if !by_category.is_empty() {
        return by_category;
    }

    // No recipe carries the category: fall back to name keywords.
    let keywords = nutrition_keywords(nutrition);
    input
        .iter()
        .copied()
        .filter(|recipe| match nutrition {
            NutritionType::Balanced => true,
            NutritionType::WeightLoss | NutritionType::DigestiveSupport => {
                recipe.difficulty == Difficulty::Easy
                    || matches_any(&recipe.normalized_name(), keywords)
            }
            NutritionType::BloodBoost | NutritionType::BrainBoost => {
                matches_any(&recipe.normalized_name(), keywords)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::recipe::fixtures::recipe;

    fn with(id: &str, name: &str, difficulty: Difficulty, meal_time: MealTime) -> Recipe {
        Recipe {
            difficulty,
            meal_time,
            ..recipe(id, name, 0.1, 0.1)
        }
    }

    fn ids(recipes: &[&Recipe]) -> Vec<String> {
        recipes.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_meal_time_matches_field_or_keyword() {
        let a = with("A", "Xôi sáng", Difficulty::Easy, MealTime::Dinner);
        let b = with("B", "Cơm tấm", Difficulty::Easy, MealTime::Breakfast);
        let c = with("C", "Lẩu", Difficulty::Easy, MealTime::Dinner);
        let out = SoftStage::MealTime(MealTime::Breakfast).apply(&[&a, &b, &c]);
        assert_eq!(ids(&out), vec!["A", "B"]);
    }

    #[test]
    fn test_children_accept_easy_or_keyword() {
        let a = with("A", "Bò lúc lắc", Difficulty::Hard, MealTime::Dinner);
        let b = with("B", "Cháo gà", Difficulty::Hard, MealTime::Dinner);
        let c = with("C", "Đậu hũ", Difficulty::Easy, MealTime::Dinner);
        let out = SoftStage::AgeGroup(AgeGroup::Children).apply(&[&a, &b, &c]);
        assert_eq!(ids(&out), vec!["B", "C"]);
    }

    #[test]
    fn test_adults_thin_match_keeps_whole_input() {
        let a = with("A", "Đậu hũ", Difficulty::Hard, MealTime::Lunch);
        let b = with("B", "Rau luộc", Difficulty::Easy, MealTime::Lunch);
        let out = SoftStage::AgeGroup(AgeGroup::Adults).apply(&[&a, &b]);
        assert_eq!(ids(&out), vec!["A", "B"]);
    }

    #[test]
    fn test_teenagers_thin_match_extends_in_input_order() {
        let pool: Vec<Recipe> = (0..14)
            .map(|i| with(&format!("R{}", i), &format!("Món {}", i), Difficulty::Easy, MealTime::Breakfast))
            .chain(std::iter::once(with("PZ", "Pizza", Difficulty::Easy, MealTime::Breakfast)))
            .collect();
        let refs: Vec<&Recipe> = pool.iter().collect();
        let out = SoftStage::AgeGroup(AgeGroup::Teenagers).apply(&refs);
        assert_eq!(out.len(), 11);
        assert_eq!(out[0].id, "R0");
        assert_eq!(out[10].id, "PZ");
    }

    #[test]
    fn test_elderly_requires_gentle_difficulty() {
        let a = with("A", "Canh bí", Difficulty::Hard, MealTime::Lunch);
        let b = with("B", "Canh bí đỏ", Difficulty::Medium, MealTime::Dinner);
        let out = SoftStage::AgeGroup(AgeGroup::Elderly).apply(&[&a, &b]);
        assert_eq!(ids(&out), vec!["B"]);
    }

    #[test]
    fn test_nutrition_prefers_category_then_keywords() {
        let mut a = with("A", "Cơm chiên", Difficulty::Hard, MealTime::Lunch);
        a.nutrition_category = Some("brain-boost".to_string());
        let b = with("B", "Cá hồi áp chảo", Difficulty::Hard, MealTime::Lunch);
        let out = SoftStage::Nutrition(NutritionType::BrainBoost).apply(&[&a, &b]);
        assert_eq!(ids(&out), vec!["A"]);

        let out = SoftStage::Nutrition(NutritionType::BrainBoost).apply(&[&b]);
        assert_eq!(ids(&out), vec!["B"]);
    }

    #[test]
    fn test_weight_loss_keyword_rule_accepts_easy() {
        let a = with("A", "Bánh xèo", Difficulty::Easy, MealTime::Lunch);
        let b = with("B", "Bánh xèo tôm", Difficulty::Hard, MealTime::Lunch);
        let out = SoftStage::Nutrition(NutritionType::WeightLoss).apply(&[&a, &b]);
        assert_eq!(ids(&out), vec!["A"]);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(SoftStage::Difficulty(Difficulty::Easy).name(), "difficulty:easy");
        assert_eq!(
            SoftStage::Nutrition(NutritionType::WeightLoss).name(),
            "nutrition:weight-loss"
        );
    }
}
