//! Domain model traits and runtime descriptors
//!
//! - `PlanningSolution`: the container for facts, entities and the score
//! - `SolutionDescriptor`: which fact classes the solution exposes to the scoring network
//! - `FactExtractor`: type-erased access to one fact class

mod descriptor;
mod extractor;
mod traits;

#[cfg(test)]
mod tests;

pub use descriptor::{FactClass, FactDescriptor, FactKind, SolutionDescriptor};
pub use extractor::{FactExtractor, FactValue, TypedFactExtractor};
pub use traits::PlanningSolution;
