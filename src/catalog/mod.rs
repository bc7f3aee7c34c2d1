//! Catalog Module
//!
//! Recipes, customer interaction history and the read-only store that
//! indexes them.

mod history;
mod loader;
pub(crate) mod recipe;
mod store;

pub use history::{Interaction, InteractionRecord};
pub use loader::{load_catalog, load_catalog_file, LoadedCatalog};
pub use recipe::{Difficulty, MealTime, Recipe};
pub use store::{CatalogStore, RatingSummary};
