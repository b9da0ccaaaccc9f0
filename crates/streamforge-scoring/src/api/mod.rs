//! Constraint definition entry point, weight overrides and explanation types.

pub mod analysis;
pub mod provider;
pub mod weight_overrides;

#[cfg(test)]
mod analysis_tests;
#[cfg(test)]
mod tests;

pub use analysis::{
    ConstraintAnalysis, ConstraintJustification, ConstraintMatchTotal, DetailedConstraintMatch,
    EntityRef, Indictment, IndictmentMap, ScoreExplanation,
};
pub use provider::ConstraintProvider;
pub use weight_overrides::{ConstraintWeightOverrides, WeightProvider};
