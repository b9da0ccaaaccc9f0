//! Score directors.
//!
//! A score director owns a working solution and keeps its score current as
//! the caller mutates it between paired before/after hooks.
//!
//! # Score Director Types
//!
//! - [`StreamScoreDirector`] - Incremental; keeps the constraint network alive
//! - [`ScratchScoreDirector`] - Reference; rebuilds the network on every score

mod factory;
mod hooks;
mod model;
mod scratch;
mod stream;
mod traits;


pub use factory::ScoreDirectorFactory;
pub use scratch::ScratchScoreDirector;
pub use stream::StreamScoreDirector;
pub use traits::ScoreDirector;
