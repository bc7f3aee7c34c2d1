//! Filter Module
//!
//! Constraint filter pipeline: a hard dietary stage followed by relaxable
//! age-group, meal-time, nutrition and difficulty stages.

mod criteria;
mod dietary;
mod pipeline;
mod soft;

pub use criteria::{AgeGroup, DietaryRestriction, FilterSpec, NutritionType};
pub use dietary::{apply_dietary, DietaryOutcome};
pub use pipeline::{EmptyReason, FilterPipeline, FilterReport, Filtered};
pub use soft::{AgeFallback, SoftStage};
