//! Score types for representing solution quality
//!
//! Scores are totally ordered, commutative and invertible under addition,
//! which is what lets the scoring network add a match's delta on insert and
//! subtract exactly the same delta on retract.

#[macro_use]
mod macros;

mod hard_soft;
mod simple;
mod traits;

#[cfg(test)]
mod tests;

pub use hard_soft::HardSoftScore;
pub use simple::SimpleScore;
pub use traits::{ParseableScore, Score, ScoreLevel, ScoreParseError};
