//! Convergence controller for adaptive mutation-rate tuning
//!
//! Policy lives here, mechanism in the engine: the controller is invoked
//! explicitly by the caller between generations, reads the engine's history,
//! and only ever touches the mutation rate.

use crate::engine::EvoPromptEngine;
use crate::metrics::EvolutionHistory;
use serde::{Deserialize, Serialize};

/// Raises the mutation rate when average fitness stagnates.
///
/// Stagnation means the spread of average fitness over the trailing
/// `window` generations falls below `stagnation_epsilon`; the rate is then
/// multiplied by `escalation_factor` and capped at `max_mutation_rate`.
/// An improving window leaves all parameters unchanged. Elite count and
/// crossover rate are never touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergenceController {
    /// Trailing generation window inspected for stagnation
    pub window: usize,
    /// Fitness spread below which the window counts as stagnant
    pub stagnation_epsilon: f64,
    /// Multiplier applied to the mutation rate on stagnation
    pub escalation_factor: f64,
    /// Upper bound for the adjusted mutation rate
    pub max_mutation_rate: f64,
}

impl Default for ConvergenceController {
    fn default() -> Self {
        Self {
            window: 3,
            stagnation_epsilon: 0.01,
            escalation_factor: 1.2,
            max_mutation_rate: 0.5,
        }
    }
}

impl ConvergenceController {
    /// Decide on an adjusted mutation rate for the given history.
    ///
    /// Returns `None` while fewer than `window` generations are recorded,
    /// and whenever the window is not stagnant.
    pub fn evaluate(&self, history: &EvolutionHistory, current_rate: f64) -> Option<f64> {
        let range = history.fitness_range(self.window)?;
        if range < self.stagnation_epsilon {
            return Some((current_rate * self.escalation_factor).min(self.max_mutation_rate));
        }
        None
    }

    /// Inspect the engine's history and apply an adjustment if stagnating.
    ///
    /// Returns the new mutation rate when one was applied.
    pub fn adjust(&self, engine: &mut EvoPromptEngine) -> Option<f64> {
        match self.evaluate(engine.history(), engine.mutation_rate()) {
            Some(adjusted) => {
                engine.set_mutation_rate(adjusted);
                tracing::info!(
                    mutation_rate = adjusted,
                    "Stagnation detected, mutation rate increased"
                );
                Some(adjusted)
            }
            None => {
                if engine.history().is_improving(self.window) == Some(true) {
                    tracing::debug!("Evolution progressing, parameters unchanged");
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::GenerationStat;

    fn history_of(avgs: &[f64]) -> EvolutionHistory {
        let mut history = EvolutionHistory::default();
        for (i, avg) in avgs.iter().enumerate() {
            history.record(GenerationStat::new(i as u32, *avg, *avg, "content"));
        }
        history
    }

    #[test]
    fn test_stagnation_raises_rate() {
        let controller = ConvergenceController::default();
        let history = history_of(&[0.50, 0.505, 0.503]);

        let adjusted = controller.evaluate(&history, 0.3).unwrap();
        assert!((adjusted - 0.36).abs() < 1e-9);
    }

    #[test]
    fn test_stagnation_respects_cap() {
        let controller = ConvergenceController::default();
        let history = history_of(&[0.50, 0.505, 0.503]);

        let adjusted = controller.evaluate(&history, 0.45).unwrap();
        assert_eq!(adjusted, 0.5);
    }

    #[test]
    fn test_improving_window_leaves_rate_alone() {
        let controller = ConvergenceController::default();
        let history = history_of(&[0.40, 0.48, 0.55]);
        assert!(controller.evaluate(&history, 0.3).is_none());
    }

    #[test]
    fn test_short_history_is_ignored() {
        let controller = ConvergenceController::default();
        let history = history_of(&[0.50, 0.505]);
        assert!(controller.evaluate(&history, 0.3).is_none());
    }

    #[test]
    fn test_only_trailing_window_counts() {
        let controller = ConvergenceController::default();
        // Early spread is large; the last three generations are flat.
        let history = history_of(&[0.1, 0.9, 0.50, 0.505, 0.503]);
        assert!(controller.evaluate(&history, 0.3).is_some());
    }
}
