//! Constraint Filter Pipeline
//!
//! Runs the hard dietary stage followed by the soft stages. A soft stage is
//! skipped when it would empty the working set, and the dietary stage is
//! never relaxed.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::Recipe;
use crate::classify::DietaryOracle;
use crate::filter::{apply_dietary, DietaryRestriction, FilterSpec, SoftStage};

// == Empty Reason ==
/// Why a request produced no recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmptyReason {
    /// Nothing was left to filter
    NoCandidates,
    /// The dietary restrictions excluded every candidate
    DietaryExcludedAll {
        restrictions: Vec<DietaryRestriction>,
    },
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::NoCandidates => write!(f, "no candidate recipes"),
            EmptyReason::DietaryExcludedAll { restrictions } => {
                let names: Vec<&str> = restrictions.iter().map(|r| r.as_str()).collect();
                write!(f, "no recipe satisfies dietary restrictions: {}", names.join(", "))
            }
        }
    }
}

/// What the pipeline did to a candidate set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterReport {
    /// Soft stages skipped because they would have emptied the set
    pub skipped_stages: Vec<String>,
    /// Recipes classified from their name instead of the oracle
    pub degraded_profiles: usize,
    /// Whether the terminal fallback to the dietary result was used
    pub fallback_used: bool,
    pub empty_reason: Option<EmptyReason>,
}

/// Recipes surviving the pipeline, in input order.
#[derive(Debug)]
pub struct Filtered<'r> {
    pub recipes: Vec<&'r Recipe>,
    pub report: FilterReport,
}

// == Filter Pipeline ==
#[derive(Debug, Clone)]
pub struct FilterPipeline {
    oracle: Arc<DietaryOracle>,
    /// Size bound of the terminal fallback result
    fallback_cap: usize,
}

impl FilterPipeline {
    pub fn new(oracle: Arc<DietaryOracle>, fallback_cap: usize) -> Self {
        Self {
            oracle,
            fallback_cap,
        }
    }

    pub fn oracle(&self) -> &DietaryOracle {
        &self.oracle
    }

    // == Dietary ==
    /// Applies only the hard stage.
    pub fn dietary<'r>(
        &self,
        candidates: &[&'r Recipe],
        restrictions: &[DietaryRestriction],
        report: &mut FilterReport,
    ) -> Vec<&'r Recipe> {
        let outcome = apply_dietary(&self.oracle, candidates, restrictions);
        report.degraded_profiles += outcome.degraded;
        outcome.kept
    }

    // == Soft ==
    /// Applies soft stages in order, skipping any that would empty the set.
    /// An empty input is returned unchanged.
    pub fn soft<'r>(
        &self,
        working: Vec<&'r Recipe>,
        stages: &[SoftStage],
        report: &mut FilterReport,
    ) -> Vec<&'r Recipe> {
        let mut working = working;
        for stage in stages {
            if working.is_empty() {
                break;
            }
            let narrowed = stage.apply(&working);
            if narrowed.is_empty() {
                let name = stage.name();
                info!("Skipping soft stage {}: it would empty the candidate set", name);
                report.skipped_stages.push(name);
            } else {
                working = narrowed;
            }
        }
        working
    }

    // == Run ==
    /// Runs the whole pipeline for a filter specification.
    ///
    /// If the soft stages leave nothing, the dietary result is returned
    /// capped at `fallback_cap`.
    pub fn run<'r>(&self, candidates: &[&'r Recipe], spec: &FilterSpec) -> Filtered<'r> {
        self.run_stages(candidates, &spec.dietary, &spec.soft_stages())
    }

    /// Like [`run`](Self::run) with an explicit soft stage list.
    pub fn run_stages<'r>(
        &self,
        candidates: &[&'r Recipe],
        restrictions: &[DietaryRestriction],
        stages: &[SoftStage],
    ) -> Filtered<'r> {
        let mut report = FilterReport::default();

        if candidates.is_empty() {
            report.empty_reason = Some(EmptyReason::NoCandidates);
            return Filtered {
                recipes: Vec::new(),
                report,
            };
        }

        let dietary = self.dietary(candidates, restrictions, &mut report);
        if dietary.is_empty() {
            let reason = EmptyReason::DietaryExcludedAll {
                restrictions: restrictions.to_vec(),
            };
            warn!("Empty result: {}", reason);
            report.empty_reason = Some(reason);
            return Filtered {
                recipes: Vec::new(),
                report,
            };
        }

        let soft = self.soft(dietary.clone(), stages, &mut report);
        let recipes = if soft.is_empty() {
            report.fallback_used = true;
            let mut fallback = dietary;
            fallback.truncate(self.fallback_cap);
            fallback
        } else {
            soft
        };

        Filtered { recipes, report }
    }
}
