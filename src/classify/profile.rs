//! Dietary profile of a single recipe.

use serde::{Deserialize, Serialize};

/// Dietary, allergen and taste attributes of a recipe.
///
/// Invariant (enforced by [`DietaryProfile::normalized`]): a profile that
/// contains meat or seafood is never vegetarian, vegan or Buddhist-vegetarian,
/// and a profile with dairy or eggs is never vegan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietaryProfile {
    pub is_vegetarian: bool,
    pub is_vegan: bool,
    pub is_buddhist_vegetarian: bool,
    pub contains_meat: bool,
    pub contains_seafood: bool,
    pub contains_dairy: bool,
    pub contains_eggs: bool,
    pub is_spicy: bool,
    pub is_sweet: bool,
    #[serde(default, alias = "dietary_tags")]
    pub tags: Vec<String>,
}

impl Default for DietaryProfile {
    /// Plant-based with no flagged ingredients.
    fn default() -> Self {
        Self {
            is_vegetarian: true,
            is_vegan: true,
            is_buddhist_vegetarian: true,
            contains_meat: false,
            contains_seafood: false,
            contains_dairy: false,
            contains_eggs: false,
            is_spicy: false,
            is_sweet: false,
            tags: Vec::new(),
        }
    }
}

impl DietaryProfile {
    /// Returns the profile with contradicting flags cleared, and whether
    /// anything had to change.
    pub fn normalized(mut self) -> (Self, bool) {
        let before = self.clone();
        if self.contains_meat || self.contains_seafood {
            self.is_vegetarian = false;
            self.is_vegan = false;
            self.is_buddhist_vegetarian = false;
        }
        if self.contains_dairy || self.contains_eggs {
            self.is_vegan = false;
        }
        let changed = self != before;
        (self, changed)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub(crate) fn add_tag(&mut self, tag: &str) {
        if !self.has_tag(tag) {
            self.tags.push(tag.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meat_clears_vegetarian_flags() {
        let profile = DietaryProfile {
            contains_meat: true,
            ..DietaryProfile::default()
        };
        let (normalized, changed) = profile.normalized();
        assert!(changed);
        assert!(!normalized.is_vegetarian);
        assert!(!normalized.is_vegan);
        assert!(!normalized.is_buddhist_vegetarian);
    }

    #[test]
    fn test_eggs_only_clear_vegan() {
        let profile = DietaryProfile {
            contains_eggs: true,
            ..DietaryProfile::default()
        };
        let (normalized, _) = profile.normalized();
        assert!(normalized.is_vegetarian);
        assert!(!normalized.is_vegan);
    }

    #[test]
    fn test_consistent_profile_is_unchanged() {
        let (_, changed) = DietaryProfile::default().normalized();
        assert!(!changed);
    }

    #[test]
    fn test_dietary_tags_alias() {
        let json = r#"{
            "is_vegetarian": false, "is_vegan": false, "is_buddhist_vegetarian": false,
            "contains_meat": true, "contains_seafood": false, "contains_dairy": false,
            "contains_eggs": false, "is_spicy": false, "is_sweet": false,
            "dietary_tags": ["contains_meat"]
        }"#;
        let profile: DietaryProfile = serde_json::from_str(json).unwrap();
        assert!(profile.has_tag("contains_meat"));
    }
}
