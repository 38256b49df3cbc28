//! Evolutionary prompt optimization engine
//!
//! This crate evolves a population of prompt candidates toward higher scores
//! under a caller-supplied, possibly multi-target fitness function:
//! - tournament selection with elitism
//! - segment-based single-point crossover with lineage tracking
//! - five text mutation operators behind a closed enum
//! - a convergence controller that raises the mutation rate on stagnation
//!
//! The engine is single-threaded and synchronous; the fitness function is a
//! blocking call and all randomness flows through one seeded RNG, so runs
//! are reproducible for a fixed seed.

#![warn(missing_docs)]

pub mod conductor;
pub mod config;
pub mod crossover;
pub mod engine;
pub mod error;
pub mod fitness;
pub mod metrics;
pub mod mutation;
pub mod prompt;
pub mod selection;

pub use conductor::ConvergenceController;
pub use config::{EngineConfig, EngineConfigBuilder};
pub use crossover::crossover;
pub use engine::EvoPromptEngine;
pub use error::{EvoPromptError, EvoPromptResult};
pub use fitness::{ConstantFitnessFunction, FitnessFunction, FnFitness, KeywordFitnessFunction};
pub use metrics::{EngineStatus, EvolutionHistory, GenerationStat};
pub use mutation::MutationKind;
pub use prompt::{fingerprint, PromptRecord};
pub use selection::select_parents;
