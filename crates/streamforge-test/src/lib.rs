//! Shared test fixtures for StreamForge crates.
//!
//! This crate provides domain types, descriptors and generators for tests.
//! It does NOT depend on `streamforge-scoring`, so the scoring crate can
//! use it as a dev-dependency.
//!
//! - [`lavish`] - A domain with many fact classes and cross references
//! - [`schedule`] - Shift scheduling with a hard/soft score
//! - [`logging`] - Test subscriber for `tracing` output
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! streamforge-test = { workspace = true }
//! ```
//!
//! ```
//! use streamforge_test::lavish::generate_solution;
//!
//! let solution = generate_solution(2, 5, 1, 7);
//! assert_eq!(solution.entities.len(), 7);
//! ```

pub mod lavish;
pub mod logging;
pub mod schedule;

pub use lavish::{LavishEntity, LavishEntityGroup, LavishSolution, LavishValue, LavishValueGroup};
pub use logging::init_test_logging;
pub use schedule::{Employee, Schedule, Shift};
