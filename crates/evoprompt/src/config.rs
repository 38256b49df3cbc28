//! Configuration for the evolutionary prompt engine

use crate::error::{EvoPromptError, EvoPromptResult};
use serde::{Deserialize, Serialize};

/// Engine configuration
///
/// `mutation_rate` is the only parameter that may change after construction;
/// the [`ConvergenceController`](crate::conductor::ConvergenceController)
/// raises it when evolution stagnates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of prompts per generation
    pub population_size: usize,
    /// Probability of mutating an offspring (0-1)
    pub mutation_rate: f64,
    /// Probability of performing crossover on a parent pair (0-1)
    pub crossover_rate: f64,
    /// Number of top prompts carried unchanged into the next generation
    pub elite_count: usize,
    /// Number of candidates sampled per selection tournament
    pub tournament_size: usize,
    /// Evaluation targets; each prompt is scored once per target
    pub targets: Vec<String>,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            mutation_rate: 0.3,
            crossover_rate: 0.5,
            elite_count: 2,
            tournament_size: 3,
            targets: vec![
                "claude".to_string(),
                "gemini".to_string(),
                "grok".to_string(),
            ],
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Validate configuration
    pub fn validate(&self) -> EvoPromptResult<()> {
        if self.population_size == 0 {
            return Err(EvoPromptError::InvalidConfiguration {
                message: "Population size must be greater than 0".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(EvoPromptError::InvalidConfiguration {
                message: "Mutation rate must be between 0 and 1".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(EvoPromptError::InvalidConfiguration {
                message: "Crossover rate must be between 0 and 1".to_string(),
            });
        }

        if self.elite_count > self.population_size {
            return Err(EvoPromptError::InvalidConfiguration {
                message: "Elite count must not exceed population size".to_string(),
            });
        }

        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(EvoPromptError::InvalidConfiguration {
                message: "Tournament size must be between 1 and population size".to_string(),
            });
        }

        if self.targets.is_empty() {
            return Err(EvoPromptError::InvalidConfiguration {
                message: "At least one evaluation target is required".to_string(),
            });
        }

        Ok(())
    }

    /// Create a builder for the configuration
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

/// Builder for [`EngineConfig`]
#[derive(Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set population size
    pub fn population_size(mut self, size: usize) -> Self {
        self.config.population_size = size;
        self
    }

    /// Set mutation rate
    pub fn mutation_rate(mut self, rate: f64) -> Self {
        self.config.mutation_rate = rate;
        self
    }

    /// Set crossover rate
    pub fn crossover_rate(mut self, rate: f64) -> Self {
        self.config.crossover_rate = rate;
        self
    }

    /// Set elite count
    pub fn elite_count(mut self, count: usize) -> Self {
        self.config.elite_count = count;
        self
    }

    /// Set tournament size
    pub fn tournament_size(mut self, size: usize) -> Self {
        self.config.tournament_size = size;
        self
    }

    /// Set evaluation targets
    pub fn targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Set random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Build the configuration
    pub fn build(self) -> EvoPromptResult<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
