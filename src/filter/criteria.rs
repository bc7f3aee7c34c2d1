//! Filter criteria: dietary restrictions, age groups, nutrition types and
//! the request-level filter specification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::{Difficulty, MealTime};
use crate::classify::keywords::{keywords_for, matches_any};
use crate::classify::{Category, DietaryProfile};
use crate::error::{RecommendError, Result};
use crate::filter::SoftStage;

// == Dietary Restriction ==
/// A hard constraint a recipe must (inclusion) or must not (exclusion) satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryRestriction {
    Vegetarian,
    Vegan,
    BuddhistVegetarian,
    NoSeafood,
    NoPork,
    NoBeef,
    NoSpicy,
    Diabetic,
}

impl DietaryRestriction {
    /// Parses a restriction token, accepting `-` or spaces for `_`.
    pub fn parse(token: &str) -> Option<Self> {
        let normalized = token.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "vegetarian" => Some(Self::Vegetarian),
            "vegan" => Some(Self::Vegan),
            "buddhist_vegetarian" => Some(Self::BuddhistVegetarian),
            "no_seafood" => Some(Self::NoSeafood),
            "no_pork" => Some(Self::NoPork),
            "no_beef" => Some(Self::NoBeef),
            "no_spicy" => Some(Self::NoSpicy),
            "diabetic" => Some(Self::Diabetic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::BuddhistVegetarian => "buddhist_vegetarian",
            Self::NoSeafood => "no_seafood",
            Self::NoPork => "no_pork",
            Self::NoBeef => "no_beef",
            Self::NoSpicy => "no_spicy",
            Self::Diabetic => "diabetic",
        }
    }

    /// Inclusion restrictions keep matching recipes; the rest exclude them.
    pub fn is_inclusion(&self) -> bool {
        matches!(
            self,
            Self::Vegetarian | Self::Vegan | Self::BuddhistVegetarian
        )
    }

    // == Admits ==
    /// Whether a recipe with this profile and lowercased name satisfies the
    /// restriction.
    ///
    /// Inclusion restrictions also check the meat and seafood flags so a
    /// contradictory profile can never slip through. Pork and beef are
    /// detected from tags by keyword, and from the name of any recipe the
    /// profile marks as containing meat.
    pub fn admits(&self, profile: &DietaryProfile, lowercase_name: &str) -> bool {
        if self.is_inclusion() && (profile.contains_meat || profile.contains_seafood) {
            return false;
        }
        match self {
            Self::Vegetarian => profile.is_vegetarian,
            Self::Vegan => profile.is_vegan,
            Self::BuddhistVegetarian => profile.is_buddhist_vegetarian,
            Self::NoSeafood => !profile.contains_seafood,
            Self::NoPork => !mentions(profile, lowercase_name, Category::Pork),
            Self::NoBeef => !mentions(profile, lowercase_name, Category::Beef),
            Self::NoSpicy => !profile.is_spicy,
            Self::Diabetic => !profile.is_sweet,
        }
    }
}

/// True when a tag or, for meat dishes, the name names the category.
fn mentions(profile: &DietaryProfile, lowercase_name: &str, category: Category) -> bool {
    let keywords = keywords_for(category);
    profile
        .tags
        .iter()
        .any(|tag| matches_any(&tag.to_lowercase(), keywords))
        || (profile.contains_meat && matches_any(lowercase_name, keywords))
}

impl fmt::Display for DietaryRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Age Group ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    Children,
    Teenagers,
    Adults,
    Elderly,
}

impl AgeGroup {
    /// Maps an age in years to its group.
    pub fn from_age(age: u32) -> Self {
        match age {
            0..=12 => AgeGroup::Children,
            13..=19 => AgeGroup::Teenagers,
            20..=59 => AgeGroup::Adults,
            _ => AgeGroup::Elderly,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Children => "children",
            AgeGroup::Teenagers => "teenagers",
            AgeGroup::Adults => "adults",
            AgeGroup::Elderly => "elderly",
        }
    }

    /// Nutrition focus shown alongside age-based results.
    pub fn nutrition_focus(&self) -> &'static str {
        match self {
            AgeGroup::Children => "Growth, brain development, bone strength",
            AgeGroup::Teenagers => "Energy, muscle development, brain function",
            AgeGroup::Adults => "Balanced nutrition, energy, heart health",
            AgeGroup::Elderly => "Bone health, heart health, easy digestion",
        }
    }
}

impl FromStr for AgeGroup {
    type Err = RecommendError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "children" => Ok(AgeGroup::Children),
            "teenagers" => Ok(AgeGroup::Teenagers),
            "adults" => Ok(AgeGroup::Adults),
            "elderly" => Ok(AgeGroup::Elderly),
            other => Err(RecommendError::InvalidRequest(format!(
                "Unknown age group '{}'",
                other
            ))),
        }
    }
}

// == Nutrition Type ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NutritionType {
    WeightLoss,
    Balanced,
    BloodBoost,
    BrainBoost,
    DigestiveSupport,
}

impl NutritionType {
    /// Category label as stored on recipes.
    pub fn as_str(&self) -> &'static str {
        match self {
            NutritionType::WeightLoss => "weight-loss",
            NutritionType::Balanced => "balanced",
            NutritionType::BloodBoost => "blood-boost",
            NutritionType::BrainBoost => "brain-boost",
            NutritionType::DigestiveSupport => "digestive-support",
        }
    }
}

impl FromStr for NutritionType {
    type Err = RecommendError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "weight-loss" => Ok(NutritionType::WeightLoss),
            "balanced" => Ok(NutritionType::Balanced),
            "blood-boost" => Ok(NutritionType::BloodBoost),
            "brain-boost" => Ok(NutritionType::BrainBoost),
            "digestive-support" => Ok(NutritionType::DigestiveSupport),
            other => Err(RecommendError::InvalidRequest(format!(
                "Unknown nutrition type '{}'",
                other
            ))),
        }
    }
}

// == Filter Spec ==
/// Constraints attached to one recommendation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub dietary: Vec<DietaryRestriction>,
    #[serde(default)]
    pub age_group: Option<AgeGroup>,
    #[serde(default)]
    pub meal_time: Option<MealTime>,
    #[serde(default)]
    pub nutrition_type: Option<NutritionType>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds restrictions from raw tokens. Unknown tokens are ignored with a
    /// warning.
    pub fn with_dietary_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for token in tokens {
            let token = token.as_ref();
            if token.trim().is_empty() {
                continue;
            }
            match DietaryRestriction::parse(token) {
                Some(restriction) => self.dietary.push(restriction),
                None => warn!("Ignoring unknown dietary restriction '{}'", token),
            }
        }
        self
    }

    pub fn with_restriction(mut self, restriction: DietaryRestriction) -> Self {
        self.dietary.push(restriction);
        self
    }

    pub fn with_age_group(mut self, age_group: AgeGroup) -> Self {
        self.age_group = Some(age_group);
        self
    }

    pub fn with_meal_time(mut self, meal_time: MealTime) -> Self {
        self.meal_time = Some(meal_time);
        self
    }

    pub fn with_nutrition_type(mut self, nutrition_type: NutritionType) -> Self {
        self.nutrition_type = Some(nutrition_type);
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Same constraints with restrictions sorted and deduplicated, so that
    /// equivalent requests share one cache key.
    pub fn normalized(&self) -> Self {
        let mut spec = self.clone();
        spec.dietary.sort_unstable();
        spec.dietary.dedup();
        spec
    }

    // == Stage Lists ==
    /// Soft stages for a personalized request, in application order.
    pub fn soft_stages(&self) -> Vec<SoftStage> {
        let mut stages = Vec::with_capacity(4);
        if let Some(age_group) = self.age_group {
            stages.push(SoftStage::AgeGroup(age_group));
        }
        if let Some(meal_time) = self.meal_time {
            stages.push(SoftStage::MealTime(meal_time));
        }
        if let Some(nutrition) = self.nutrition_type {
            stages.push(SoftStage::Nutrition(nutrition));
        }
        if let Some(difficulty) = self.difficulty {
            stages.push(SoftStage::Difficulty(difficulty));
        }
        stages
    }

    /// Soft stages applied to popularity results: meal time and difficulty only.
    pub fn cold_start_stages(&self) -> Vec<SoftStage> {
        self.soft_stages()
            .into_iter()
            .filter(|stage| matches!(stage, SoftStage::MealTime(_) | SoftStage::Difficulty(_)))
            .collect()
    }
}
