//! Generation statistics and engine status reporting

use serde::{Deserialize, Serialize};

/// Number of characters of the best prompt retained in a stat entry
const PREVIEW_LEN: usize = 50;

/// Aggregate statistics for one completed generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationStat {
    /// Generation index the stats describe
    pub generation: u32,
    /// Mean of average fitness across the evaluated population
    pub avg_fitness: f64,
    /// Average fitness of the generation's best record
    pub best_fitness: f64,
    /// Truncated preview of the best record's content
    pub best_preview: String,
}

impl GenerationStat {
    /// Build a stat entry, truncating the best content to a short preview
    pub fn new(generation: u32, avg_fitness: f64, best_fitness: f64, best_content: &str) -> Self {
        let mut best_preview: String = best_content.chars().take(PREVIEW_LEN).collect();
        best_preview.push_str("...");
        Self {
            generation,
            avg_fitness,
            best_fitness,
            best_preview,
        }
    }
}

/// Append-only history of per-generation statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionHistory {
    entries: Vec<GenerationStat>,
}

impl EvolutionHistory {
    /// Append a generation's statistics
    pub fn record(&mut self, stat: GenerationStat) {
        self.entries.push(stat);
    }

    /// All recorded entries, oldest first
    #[inline]
    pub fn entries(&self) -> &[GenerationStat] {
        &self.entries
    }

    /// Number of recorded generations
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any generation has been recorded
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&GenerationStat> {
        self.entries.last()
    }

    /// Spread of average fitness over the trailing `window` generations.
    ///
    /// `None` until at least `window` generations have been recorded.
    pub fn fitness_range(&self, window: usize) -> Option<f64> {
        let trailing = self.trailing(window)?;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for stat in trailing {
            min = min.min(stat.avg_fitness);
            max = max.max(stat.avg_fitness);
        }
        Some(max - min)
    }

    /// Whether the latest average fitness exceeds the oldest in the window
    pub fn is_improving(&self, window: usize) -> Option<bool> {
        let trailing = self.trailing(window)?;
        let first = trailing.first()?.avg_fitness;
        let last = trailing.last()?.avg_fitness;
        Some(last > first)
    }

    fn trailing(&self, window: usize) -> Option<&[GenerationStat]> {
        if window == 0 || self.entries.len() < window {
            return None;
        }
        Some(&self.entries[self.entries.len() - window..])
    }
}

/// Snapshot of engine state for observability
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineStatus {
    /// Completed generation count
    pub generation: u32,
    /// Current population size
    pub population_size: usize,
    /// Average fitness of the most recent completed generation
    pub avg_fitness: f64,
    /// Best fitness of the most recent completed generation
    pub best_fitness: f64,
    /// Current mutation rate
    pub mutation_rate: f64,
}
