//! Classification Oracle
//!
//! Maps recipe ids to dietary profiles, falling back to keyword inference
//! when a recipe has no recorded profile.

use std::borrow::Cow;
use std::collections::HashMap;

use tracing::warn;

use crate::catalog::Recipe;
use crate::classify::{classify_name, DietaryProfile};
use crate::error::{RecommendError, Result};

/// Where a profile came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSource {
    /// Recorded in the classification table
    Oracle,
    /// Inferred from the recipe name (degraded mode)
    Keywords,
}

/// A profile resolved for one recipe.
#[derive(Debug, Clone)]
pub struct Classified<'a> {
    pub profile: Cow<'a, DietaryProfile>,
    pub source: ProfileSource,
}

impl Classified<'_> {
    pub fn is_degraded(&self) -> bool {
        self.source == ProfileSource::Keywords
    }
}

// == Dietary Oracle ==
/// Read-only recipe-id -> profile table.
#[derive(Debug, Default)]
pub struct DietaryOracle {
    profiles: HashMap<String, DietaryProfile>,
}

impl DietaryOracle {
    /// Builds the oracle, repairing profiles that contradict the invariant.
    pub fn new(profiles: HashMap<String, DietaryProfile>) -> Self {
        let profiles = profiles
            .into_iter()
            .map(|(id, profile)| {
                let (profile, changed) = profile.normalized();
                if changed {
                    warn!("Dietary profile for '{}' was inconsistent and has been corrected", id);
                }
                (id, profile)
            })
            .collect();
        Self { profiles }
    }

    /// An oracle with no entries: every lookup degrades to keywords.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Recorded profile for a recipe id.
    pub fn profile(&self, recipe_id: &str) -> Result<&DietaryProfile> {
        self.profiles
            .get(recipe_id)
            .ok_or_else(|| RecommendError::OracleUnavailable(recipe_id.to_string()))
    }

    // == Classify ==
    /// Resolves a recipe's profile, inferring it from the name when the
    /// table has no entry.
    pub fn classify<'a>(&'a self, recipe: &Recipe) -> Classified<'a> {
        match self.profile(&recipe.id) {
            Ok(profile) => Classified {
                profile: Cow::Borrowed(profile),
                source: ProfileSource::Oracle,
            },
            Err(_) => Classified {
                profile: Cow::Owned(classify_name(&recipe.name)),
                source: ProfileSource::Keywords,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
