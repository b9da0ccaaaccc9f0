//! StreamForge Core - Core types and traits for incremental constraint scoring
//!
//! This crate provides the fundamental abstractions shared by the StreamForge crates:
//! - Score types for representing solution quality
//! - Domain traits and descriptors for the working solution
//! - Constraint identity types
//! - The common error type

pub mod constraint;
pub mod domain;
pub mod error;
pub mod score;

pub use constraint::{ConstraintRef, ImpactType};
pub use domain::{
    FactClass, FactDescriptor, FactExtractor, FactKind, FactValue, PlanningSolution,
    SolutionDescriptor, TypedFactExtractor,
};
pub use error::{Result, StreamForgeError};
pub use score::{HardSoftScore, ParseableScore, Score, ScoreLevel, ScoreParseError, SimpleScore};
