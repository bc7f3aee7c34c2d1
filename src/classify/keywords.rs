//! Keyword Tables
//!
//! Finite category -> keyword-set tables used for name-based classification.
//! Every classifier in the crate matches lowercased recipe names against
//! these tables with the same substring rule.

use crate::catalog::MealTime;
use crate::classify::DietaryProfile;
use crate::filter::{AgeGroup, NutritionType};

// == Dietary Categories ==
/// Ingredient or taste category detectable from a recipe name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Meat,
    Pork,
    Beef,
    Seafood,
    Dairy,
    Eggs,
    Spicy,
    Sweet,
    Pungent,
}

impl Category {
    /// Tag recorded on inferred profiles.
    pub fn tag(&self) -> &'static str {
        match self {
            Category::Meat => "contains_meat",
            Category::Pork => "pork",
            Category::Beef => "beef",
            Category::Seafood => "contains_seafood",
            Category::Dairy => "contains_dairy",
            Category::Eggs => "contains_eggs",
            Category::Spicy => "spicy",
            Category::Sweet => "sweet",
            Category::Pungent => "contains_pungent",
        }
    }
}

pub const DIETARY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Meat,
        &[
            "thịt", "heo", "lợn", "bò", "gà", "vịt", "sườn", "nem", "chả", "lạp xưởng",
            "xúc xích", "thăn", "ba chỉ", "meat", "pork", "beef", "chicken", "duck", "bacon",
        ],
    ),
    (
        Category::Pork,
        &["heo", "lợn", "ba chỉ", "lạp xưởng", "pork", "bacon"],
    ),
    (Category::Beef, &["bò", "beef"]),
    (
        Category::Seafood,
        &[
            "tôm", "cua", "cá", "mực", "nghêu", "sò", "ốc", "hàu", "tép", "hải sản", "shrimp",
            "crab", "fish", "squid", "seafood", "oyster",
        ],
    ),
    (
        Category::Dairy,
        &[
            "sữa", "kem", "phô mai", "bơ", "yaourt", "sữa chua", "cheese", "cream", "milk",
            "yogurt", "butter",
        ],
    ),
    (
        Category::Eggs,
        &["trứng", "ốp la", "bánh flan", "egg"],
    ),
    (
        Category::Spicy,
        &[
            "cay", "ớt", "tiêu", "tắc", "kim chi", "bún bò huế", "mì quảng", "spicy", "chili",
        ],
    ),
    (
        Category::Sweet,
        &[
            "bánh ngọt", "kẹo", "đường", "mật ong", "bánh kem", "chocolate", "bánh quy ngọt",
            "bánh su kem", "bánh flan", "chè", "kem", "sweet", "cake", "dessert",
        ],
    ),
    (
        Category::Pungent,
        &["hành", "tỏi", "kiệu", "răm", "onion", "garlic"],
    ),
];

/// True when the lowercased name contains any keyword.
pub fn matches_any(lowercase_name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| lowercase_name.contains(kw))
}

/// Keyword set of one category.
pub fn keywords_for(category: Category) -> &'static [&'static str] {
    DIETARY_KEYWORDS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, keywords)| *keywords)
        .unwrap_or(&[])
}

/// Categories whose keywords occur in the name.
pub fn categories_for(name: &str) -> Vec<Category> {
    let lower = name.to_lowercase();
    DIETARY_KEYWORDS
        .iter()
        .filter(|(_, keywords)| matches_any(&lower, keywords))
        .map(|(category, _)| *category)
        .collect()
}

// == Classify Name ==
/// Infers a dietary profile from a recipe name alone.
///
/// Starts from a plant-based profile and clears flags for every detected
/// category. The result always satisfies the profile invariant.
pub fn classify_name(name: &str) -> DietaryProfile {
    let mut profile = DietaryProfile::default();
    for category in categories_for(name) {
        match category {
            Category::Meat | Category::Pork | Category::Beef => profile.contains_meat = true,
            Category::Seafood => profile.contains_seafood = true,
            Category::Dairy => profile.contains_dairy = true,
            Category::Eggs => profile.contains_eggs = true,
            Category::Spicy => profile.is_spicy = true,
            Category::Sweet => profile.is_sweet = true,
            Category::Pungent => profile.is_buddhist_vegetarian = false,
        }
        profile.add_tag(category.tag());
    }
    let (profile, _) = profile.normalized();
    profile
}

// == Meal Time Keywords ==
pub fn meal_time_keywords(meal_time: MealTime) -> &'static [&'static str] {
    match meal_time {
        MealTime::Breakfast => &["sáng", "điểm tâm", "breakfast"],
        MealTime::Lunch => &["trưa", "lunch"],
        MealTime::Dinner => &["tối", "chiều", "dinner"],
    }
}

// == Age Group Keywords ==
pub fn age_group_keywords(group: AgeGroup) -> &'static [&'static str] {
    match group {
        AgeGroup::Children => &["trứng", "cháo", "soup", "canh", "bánh", "sữa", "rau củ"],
        AgeGroup::Teenagers => &[
            "nướng", "chiên", "pizza", "burger", "mì", "bánh mì", "snack", "fast",
        ],
        AgeGroup::Adults => &[
            "salad", "gỏi", "nướng", "xào", "hầm", "curry", "thịt", "cá", "tôm",
        ],
        AgeGroup::Elderly => &["canh", "soup", "cháo", "hầm", "luộc", "hấp", "rau", "cá"],
    }
}

// == Nutrition Keywords ==
/// Name keywords used when no recipe carries the requested nutrition category.
/// `Balanced` has no keywords: it accepts every recipe.
pub fn nutrition_keywords(nutrition: NutritionType) -> &'static [&'static str] {
    match nutrition {
        NutritionType::WeightLoss => &[
            "salad", "gỏi", "canh", "soup", "luộc", "hấp", "nướng", "thịt nạc", "rau", "cá",
        ],
        NutritionType::Balanced => &[],
        NutritionType::BloodBoost => &[
            "thịt đỏ", "gan", "rau dền", "rau chân vịt", "đậu", "trứng", "cà chua",
        ],
        NutritionType::BrainBoost => &["cá", "hạt", "trứng", "bơ", "chocolate", "óc chó", "cà phê"],
        NutritionType::DigestiveSupport => &[
            "cháo", "soup", "canh", "yogurt", "gừng", "nghệ", "yến mạch",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_vegetable_dish_is_vegan() {
        let profile = classify_name("Rau muống xào");
        assert!(profile.is_vegetarian);
        assert!(profile.is_vegan);
        assert!(profile.tags.is_empty());
    }

    #[test]
    fn test_beef_noodle_soup_is_meat_beef_and_spicy() {
        let profile = classify_name("Bún bò Huế");
        assert!(profile.contains_meat);
        assert!(!profile.is_vegetarian);
        assert!(profile.has_tag("beef"));
        assert!(profile.is_spicy);
    }

    #[test]
    fn test_pork_dish_carries_pork_tag() {
        let profile = classify_name("Thịt heo quay");
        assert!(profile.has_tag("pork"));
        assert!(!profile.has_tag("beef"));
    }

    #[test]
    fn test_seafood_is_not_vegetarian() {
        let profile = classify_name("Tôm nướng");
        assert!(profile.contains_seafood);
        assert!(!profile.is_vegetarian);
        assert!(!profile.contains_meat);
    }

    #[test]
    fn test_flan_is_sweet_with_eggs() {
        let profile = classify_name("Bánh flan");
        assert!(profile.is_sweet);
        assert!(profile.contains_eggs);
        assert!(profile.is_vegetarian);
        assert!(!profile.is_vegan);
    }

    #[test]
    fn test_garlic_breaks_buddhist_vegetarian_only() {
        let profile = classify_name("Đậu phụ sốt tỏi");
        assert!(profile.is_vegetarian);
        assert!(!profile.is_buddhist_vegetarian);
    }

    #[test]
    fn test_meal_time_keywords() {
        assert!(matches_any("xôi sáng", meal_time_keywords(MealTime::Breakfast)));
        assert!(!matches_any("xôi sáng", meal_time_keywords(MealTime::Dinner)));
    }
}
