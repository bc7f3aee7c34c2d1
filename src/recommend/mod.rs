//! Recommend Module
//!
//! Scoring, top-K selection with cold start, and the cached service facade.

mod scorer;
mod selector;
mod service;
mod set;


pub use scorer::{RatingModel, Scored, Scorer, PERTURBATION};
pub use selector::{popularity, weighted_sample, Selector, POPULARITY_BOOST};
pub use service::RecommendationService;
pub use set::{Recommendation, RecommendationSet, COLD_START_REASON};
