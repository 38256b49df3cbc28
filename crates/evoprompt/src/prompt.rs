//! Prompt candidates and content fingerprinting

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Compute a stable fingerprint for prompt content.
///
/// Used for lineage references and cross-run identity tracking; two records
/// with equal content share a fingerprint without being the same record.
pub fn fingerprint(content: &str) -> String {
    blake3::hash(content.as_bytes()).to_hex().to_string()
}

/// One prompt candidate in the evolutionary population.
///
/// Records are immutable values: mutation and crossover produce new records
/// rather than editing in place, so lineage and history stay trustworthy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    content: String,
    generation: u32,
    fitness_scores: HashMap<String, f64>,
    lineage: Vec<String>,
    mutation_count: u32,
}

impl PromptRecord {
    /// Create a generation-0 seed record with no lineage and no scores
    pub fn seed(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            generation: 0,
            fitness_scores: HashMap::new(),
            lineage: Vec::new(),
            mutation_count: 0,
        }
    }

    /// Create a crossover offspring with the given lineage pair
    pub fn offspring(content: impl Into<String>, generation: u32, lineage: Vec<String>) -> Self {
        Self {
            content: content.into(),
            generation,
            fitness_scores: HashMap::new(),
            lineage,
            mutation_count: 0,
        }
    }

    /// Derive a mutated record: new content, scores reset, counter bumped.
    ///
    /// Generation and lineage carry over unchanged; a mutation does not
    /// create a new ancestry step.
    pub fn mutated(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            generation: self.generation,
            fitness_scores: HashMap::new(),
            lineage: self.lineage.clone(),
            mutation_count: self.mutation_count + 1,
        }
    }

    /// Derive a record with a fitness score recorded for `target`
    pub fn with_score(&self, target: impl Into<String>, score: f64) -> Self {
        let mut next = self.clone();
        next.fitness_scores.insert(target.into(), score);
        next
    }

    /// Derive a record with its score map replaced wholesale
    pub fn with_scores(&self, scores: HashMap<String, f64>) -> Self {
        let mut next = self.clone();
        next.fitness_scores = scores;
        next
    }

    /// Prompt text
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Generation this record was created in
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Per-target fitness scores recorded so far
    #[inline]
    pub fn fitness_scores(&self) -> &HashMap<String, f64> {
        &self.fitness_scores
    }

    /// Parent fingerprints, empty for seeds
    #[inline]
    pub fn lineage(&self) -> &[String] {
        &self.lineage
    }

    /// Number of mutations applied along this record's content history
    #[inline]
    pub fn mutation_count(&self) -> u32 {
        self.mutation_count
    }

    /// Whether any fitness score has been recorded
    #[inline]
    pub fn is_evaluated(&self) -> bool {
        !self.fitness_scores.is_empty()
    }

    /// Fingerprint of this record's content
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.content)
    }

    /// Mean fitness across recorded targets, 0.0 when unevaluated
    pub fn average_fitness(&self) -> f64 {
        if self.fitness_scores.is_empty() {
            return 0.0;
        }
        self.fitness_scores.values().sum::<f64>() / self.fitness_scores.len() as f64
    }
}
