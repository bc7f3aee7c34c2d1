//! Classification Module
//!
//! Dietary profiles, the keyword tables used to infer them, and the oracle
//! that resolves a profile for each recipe.

pub mod keywords;
mod oracle;
mod profile;

pub use keywords::{classify_name, Category};
pub use oracle::{Classified, DietaryOracle, ProfileSource};
pub use profile::DietaryProfile;
