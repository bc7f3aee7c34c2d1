//! Catalog Store Module
//!
//! Read-only in-memory index of recipes and per-customer interaction history.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::catalog::{Interaction, Recipe};
use crate::error::{RecommendError, Result};

// == Rating Summary ==
/// Aggregated ratings for one recipe across every customer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatingSummary {
    pub total: f64,
    pub count: usize,
}

impl RatingSummary {
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

// == Catalog Store ==
/// Recipes in load order plus the interaction history of every customer.
///
/// Built once at startup and shared behind an `Arc`; the recommender only
/// ever reads it.
#[derive(Debug, Default)]
pub struct CatalogStore {
    /// Recipes in first-seen order
    recipes: Vec<Recipe>,
    /// Recipe id -> position in `recipes`
    by_id: HashMap<String, usize>,
    /// Recipe names already taken
    names: HashSet<String>,
    /// Customer id -> ordered interactions
    histories: HashMap<String, Vec<Interaction>>,
    /// Total interactions across all customers
    interaction_count: usize,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    // == Insert Recipe ==
    /// Adds a recipe after validating it.
    ///
    /// Ids and names must both be unique.
    pub fn insert_recipe(&mut self, recipe: Recipe) -> Result<()> {
        recipe.validate()?;
        if self.by_id.contains_key(&recipe.id) {
            return Err(RecommendError::MalformedInput(format!(
                "Duplicate recipe id '{}'",
                recipe.id
            )));
        }
        if !self.names.insert(recipe.name.clone()) {
            return Err(RecommendError::MalformedInput(format!(
                "Duplicate recipe name '{}'",
                recipe.name
            )));
        }
        self.by_id.insert(recipe.id.clone(), self.recipes.len());
        self.recipes.push(recipe);
        Ok(())
    }

    // == Append Interaction ==
    /// Appends an interaction to a customer's history.
    ///
    /// Histories are append-only; a recipe that is not in the catalog yields
    /// `NotFound` and nothing is recorded.
    pub fn append_interaction(&mut self, customer_id: &str, interaction: Interaction) -> Result<()> {
        if !self.by_id.contains_key(&interaction.recipe_id) {
            return Err(RecommendError::NotFound(format!(
                "recipe '{}'",
                interaction.recipe_id
            )));
        }
        if !interaction.rating.is_finite() {
            return Err(RecommendError::MalformedInput(format!(
                "Non-finite rating for recipe '{}'",
                interaction.recipe_id
            )));
        }
        self.histories
            .entry(customer_id.to_string())
            .or_default()
            .push(interaction);
        self.interaction_count += 1;
        Ok(())
    }

    /// All recipes in load order.
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn recipe(&self, id: &str) -> Result<&Recipe> {
        self.by_id
            .get(id)
            .map(|&idx| &self.recipes[idx])
            .ok_or_else(|| RecommendError::NotFound(format!("recipe '{}'", id)))
    }

    // == History ==
    /// Returns a customer's interactions in recorded order.
    ///
    /// A customer without interactions is reported as `NotFound`, which
    /// callers treat as a cold start.
    pub fn history(&self, customer_id: &str) -> Result<&[Interaction]> {
        match self.histories.get(customer_id) {
            Some(history) if !history.is_empty() => Ok(history),
            _ => Err(RecommendError::NotFound(format!(
                "customer '{}'",
                customer_id
            ))),
        }
    }

    pub fn has_customer(&self, customer_id: &str) -> bool {
        self.history(customer_id).is_ok()
    }

    /// Customer ids in sorted order.
    pub fn customers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.histories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn interaction_count(&self) -> usize {
        self.interaction_count
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    // == Rating Summaries ==
    /// Aggregates every customer's ratings per recipe id.
    pub fn rating_summaries(&self) -> HashMap<&str, RatingSummary> {
        let mut summaries: HashMap<&str, RatingSummary> = HashMap::new();
        for interaction in self.histories.values().flatten() {
            let summary = summaries.entry(interaction.recipe_id.as_str()).or_default();
            summary.total += interaction.rating;
            summary.count += 1;
        }
        summaries
    }

    /// Builds a store from recipes and interaction rows.
    ///
    /// Interactions pointing at unknown recipes are skipped with a warning.
    pub fn build<R, I>(recipes: R, interactions: I) -> Result<Self>
    where
        R: IntoIterator<Item = Recipe>,
        I: IntoIterator<Item = (String, Interaction)>,
    {
        let mut store = Self::new();
        for recipe in recipes {
            store.insert_recipe(recipe)?;
        }
        for (customer_id, interaction) in interactions {
            match store.append_interaction(&customer_id, interaction) {
                Ok(()) => {}
                Err(RecommendError::NotFound(what)) => {
                    warn!("Skipping interaction of '{}': unknown {}", customer_id, what);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(store)
    }
}
