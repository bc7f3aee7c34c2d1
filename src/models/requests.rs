//! Request DTOs for the recommendation API
//!
//! Query-string parameters of `GET /recommend` and `GET /popular`.

use serde::Deserialize;

use crate::error::{RecommendError, Result};
use crate::filter::{AgeGroup, FilterSpec};

/// Number of results when the request does not say.
pub const DEFAULT_COUNT: usize = 5;

fn default_count() -> usize {
    DEFAULT_COUNT
}

/// Query parameters shared by both recommendation endpoints.
///
/// `dietary` is a comma-separated list of restriction tokens; unknown tokens
/// are ignored. Every other filter value must parse.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendQuery {
    /// Required by `/recommend`, ignored by `/popular`
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub randomize: bool,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub dietary: Option<String>,
    #[serde(default)]
    pub age_group: Option<String>,
    /// Age in years, used when `age_group` is absent
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub meal_time: Option<String>,
    #[serde(default)]
    pub nutrition_type: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl RecommendQuery {
    /// The customer id, or `InvalidRequest` when missing or blank.
    pub fn customer_id(&self) -> Result<&str> {
        match self.customer_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(RecommendError::InvalidRequest(
                "customer_id is required".to_string(),
            )),
        }
    }

    // == Filters ==
    /// Builds the filter specification from the raw parameters.
    pub fn filters(&self) -> Result<FilterSpec> {
        let mut spec = FilterSpec::new();
        if let Some(dietary) = &self.dietary {
            spec = spec.with_dietary_tokens(dietary.split(','));
        }
        if let Some(group) = self.age_group()? {
            spec = spec.with_age_group(group);
        }
        if let Some(meal_time) = non_blank(&self.meal_time) {
            spec = spec.with_meal_time(meal_time.parse()?);
        }
        if let Some(nutrition) = non_blank(&self.nutrition_type) {
            spec = spec.with_nutrition_type(nutrition.parse()?);
        }
        if let Some(difficulty) = non_blank(&self.difficulty) {
            spec = spec.with_difficulty(difficulty.parse()?);
        }
        Ok(spec)
    }

    /// Explicit group first, then the group derived from `age`.
    pub fn age_group(&self) -> Result<Option<AgeGroup>> {
        match non_blank(&self.age_group) {
            Some(group) => group.parse().map(Some),
            None => Ok(self.age.map(AgeGroup::from_age)),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
