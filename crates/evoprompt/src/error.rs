//! Error types for the evolutionary prompt engine

use thiserror::Error;

/// Result alias used throughout the crate
pub type EvoPromptResult<T> = Result<T, EvoPromptError>;

/// Errors produced by the evolutionary prompt engine
#[derive(Error, Debug)]
pub enum EvoPromptError {
    /// Invalid construction or initialization parameters
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// The caller-supplied fitness function failed
    #[error("Fitness evaluation failed for target '{target}': {reason}")]
    FitnessEvaluationFailed { target: String, reason: String },

    /// Operation requires an initialized, non-empty population
    #[error("Population empty")]
    PopulationEmpty,

    /// No best prompt recorded yet
    #[error("No best prompt available; evolve at least one generation")]
    BestUnavailable,

    /// Catch-all for embedder-supplied failures
    #[error("{0}")]
    Other(String),
}
