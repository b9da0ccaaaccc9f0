//! Incremental constraint stream scoring for StreamForge.
//!
//! This crate provides:
//! - A tuple propagation network (join, exists, filter, map, flatten,
//!   group-by and distinct nodes) kept up to date one fact change at a time
//! - Incrementally retractable collectors for group-by aggregates
//! - A typed, fluent constraint stream API of arity 1 to 4
//! - Score directors (`StreamScoreDirector`, `ScratchScoreDirector`)
//! - Score explanation and indictments
//!
//! # Architecture
//!
//! Constraint definitions are interpreted once into an explicit node graph.
//! Each working solution gets its own network; propagation is synchronous
//! and depth-first, and every node owns the tuples it emits.

// Typed closures over tuples make for long boxed types
#![allow(clippy::type_complexity)]

// Core modules
pub mod api;
pub mod director;
pub(crate) mod network;
pub mod stream;

// ============================================================================
// Constraint Definition
// ============================================================================

pub use api::provider::ConstraintProvider;
pub use api::weight_overrides::{ConstraintWeightOverrides, WeightProvider};
pub use stream::{
    BiConstraintStream, Constraint, ConstraintBuilder, ConstraintFactory, QuadConstraintStream,
    TriConstraintStream, UniConstraintStream,
};

// ============================================================================
// Score Directors
// ============================================================================

pub use director::{ScoreDirector, ScoreDirectorFactory, ScratchScoreDirector, StreamScoreDirector};

// ============================================================================
// Analysis (for score explanation)
// ============================================================================

pub use api::analysis::{
    ConstraintAnalysis, ConstraintJustification, ConstraintMatchTotal, DetailedConstraintMatch,
    EntityRef, Indictment, IndictmentMap, ScoreExplanation,
};
