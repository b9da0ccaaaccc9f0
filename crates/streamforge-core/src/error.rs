//! Error types for StreamForge

use thiserror::Error;

/// Main error type for StreamForge operations
#[derive(Debug, Error)]
pub enum StreamForgeError {
    /// Invalid constraint network or domain configuration, detected at build time
    #[error("Configuration error: {0}")]
    Config(String),

    /// A lifecycle hook addressed a fact that the domain model does not know
    #[error("Domain model error: {0}")]
    DomainModel(String),

    /// A tuple or fact lifecycle contract was broken (double insert, retract of a
    /// tuple that is not live, after-hook without before-hook)
    #[error("Lifecycle violation: {0}")]
    LifecycleViolation(String),

    /// Error while computing a match impact
    #[error("Score calculation error: {0}")]
    ScoreCalculation(String),

    /// Incremental score diverged from a from-scratch recalculation
    #[error("Score corruption: {0}")]
    ScoreCorruption(String),

    /// Invalid operation for the current director state
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type alias for StreamForge operations
pub type Result<T> = std::result::Result<T, StreamForgeError>;
