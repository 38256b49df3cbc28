//! Population manager and per-generation evolution protocol

use crate::config::EngineConfig;
use crate::crossover::crossover;
use crate::error::{EvoPromptError, EvoPromptResult};
use crate::fitness::FitnessFunction;
use crate::metrics::{EngineStatus, EvolutionHistory, GenerationStat};
use crate::mutation::MutationKind;
use crate::prompt::PromptRecord;
use crate::selection::{rank_by_fitness, select_parents};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Evolutionary prompt optimization engine.
///
/// Owns the population, generation counter, best-ever record and the
/// append-only history. One call to [`evolve_generation`] runs the full
/// evaluate → select → recombine → mutate → replace protocol; the step is
/// transactional, so a propagated fitness error leaves all engine state
/// exactly as it was before the call.
///
/// [`evolve_generation`]: EvoPromptEngine::evolve_generation
pub struct EvoPromptEngine {
    config: EngineConfig,
    population: Vec<PromptRecord>,
    generation_count: u32,
    best_prompt: Option<PromptRecord>,
    history: EvolutionHistory,
    rng: StdRng,
}

impl EvoPromptEngine {
    /// Create an engine from a validated configuration
    pub fn new(config: EngineConfig) -> EvoPromptResult<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            population: Vec::new(),
            generation_count: 0,
            best_prompt: None,
            history: EvolutionHistory::default(),
            rng,
        })
    }

    /// Build generation 0 from seed prompts.
    ///
    /// The first `population_size` seeds are used verbatim; if fewer seeds
    /// are given, the remaining slots are filled with variations: a random
    /// seed run through one random mutation operator, unconditionally (the
    /// mutation-rate gate does not apply during bootstrap).
    ///
    /// Re-initializing resets the population, generation counter, best
    /// record and history.
    pub fn initialize_population(&mut self, seeds: &[&str]) -> EvoPromptResult<()> {
        if seeds.is_empty() {
            return Err(EvoPromptError::InvalidConfiguration {
                message: "At least one seed prompt is required".to_string(),
            });
        }

        let mut population: Vec<PromptRecord> = seeds
            .iter()
            .take(self.config.population_size)
            .map(|seed| PromptRecord::seed(*seed))
            .collect();

        while population.len() < self.config.population_size {
            let base = seeds[self.rng.gen_range(0..seeds.len())];
            let variation = MutationKind::random(&mut self.rng).apply(base, &mut self.rng);
            population.push(PromptRecord::seed(variation));
        }

        self.population = population;
        self.generation_count = 0;
        self.best_prompt = None;
        self.history = EvolutionHistory::default();

        tracing::info!(size = self.population.len(), "Population initialized");
        Ok(())
    }

    /// Score a record against every configured target.
    ///
    /// A record whose scores are already non-empty is returned unchanged:
    /// caching is presence-based, not keyed on which targets were requested,
    /// so a record scored against a subset of targets is never re-scored.
    /// The first fitness error propagates and no partial scores are kept.
    pub fn evaluate_fitness(
        &self,
        record: &PromptRecord,
        fitness_fn: &dyn FitnessFunction,
    ) -> EvoPromptResult<PromptRecord> {
        if record.is_evaluated() {
            return Ok(record.clone());
        }

        let mut scores = HashMap::new();
        for target in &self.config.targets {
            let score = fitness_fn.evaluate(record.content(), target)?;
            scores.insert(target.clone(), score);
        }

        Ok(record.with_scores(scores))
    }

    /// Run one generation step: evaluate, select, recombine, mutate, replace.
    pub fn evolve_generation(&mut self, fitness_fn: &dyn FitnessFunction) -> EvoPromptResult<()> {
        if self.population.is_empty() {
            return Err(EvoPromptError::PopulationEmpty);
        }

        // Evaluate into a scratch vector first; a propagated fitness error
        // must leave population, history and counters untouched.
        let evaluated: Vec<PromptRecord> = self
            .population
            .iter()
            .map(|record| self.evaluate_fitness(record, fitness_fn))
            .collect::<EvoPromptResult<_>>()?;

        let mut current_best = &evaluated[0];
        for candidate in &evaluated[1..] {
            if candidate.average_fitness() > current_best.average_fitness() {
                current_best = candidate;
            }
        }

        let parents = select_parents(
            &evaluated,
            self.config.elite_count,
            self.config.tournament_size,
            &mut self.rng,
        )?;

        // Elites go through unchanged; the rest of the next generation comes
        // from crossover over uniformly drawn parent pairs, each child then
        // passing the mutation gate.
        let ranked = rank_by_fitness(&parents);
        let mut next_generation: Vec<PromptRecord> = ranked
            .iter()
            .take(self.config.elite_count)
            .map(|&idx| parents[idx].clone())
            .collect();

        while next_generation.len() < self.config.population_size {
            let parent_a = &parents[self.rng.gen_range(0..parents.len())];
            let parent_b = &parents[self.rng.gen_range(0..parents.len())];

            let (child_a, child_b) = crossover(
                parent_a,
                parent_b,
                self.config.crossover_rate,
                self.generation_count,
                &mut self.rng,
            );

            let child_a = self.maybe_mutate(child_a);
            let child_b = self.maybe_mutate(child_b);

            next_generation.push(child_a);
            if next_generation.len() < self.config.population_size {
                next_generation.push(child_b);
            }
        }

        let avg_fitness = evaluated.iter().map(|r| r.average_fitness()).sum::<f64>()
            / evaluated.len() as f64;
        let stat = GenerationStat::new(
            self.generation_count,
            avg_fitness,
            current_best.average_fitness(),
            current_best.content(),
        );

        tracing::info!(
            generation = self.generation_count,
            avg_fitness,
            best_fitness = current_best.average_fitness(),
            "Generation complete"
        );

        let improved = self
            .best_prompt
            .as_ref()
            .map(|best| current_best.average_fitness() > best.average_fitness())
            .unwrap_or(true);
        if improved {
            self.best_prompt = Some(current_best.clone());
        }

        self.history.record(stat);
        self.population = next_generation;
        self.generation_count += 1;

        Ok(())
    }

    /// Evolve `generations` steps and return the best record seen
    pub fn run_evolution(
        &mut self,
        fitness_fn: &dyn FitnessFunction,
        generations: u32,
    ) -> EvoPromptResult<PromptRecord> {
        self.run_evolution_until(fitness_fn, generations, || false)
    }

    /// Evolve up to `generations` steps, checking `cancel` between steps.
    ///
    /// Cancellation is cooperative: an in-progress generation always runs to
    /// completion before the check fires.
    pub fn run_evolution_until(
        &mut self,
        fitness_fn: &dyn FitnessFunction,
        generations: u32,
        mut cancel: impl FnMut() -> bool,
    ) -> EvoPromptResult<PromptRecord> {
        for _ in 0..generations {
            if cancel() {
                tracing::info!(
                    generation = self.generation_count,
                    "Evolution run cancelled"
                );
                break;
            }
            self.evolve_generation(fitness_fn)?;
        }

        self.best_prompt.clone().ok_or(EvoPromptError::BestUnavailable)
    }

    /// Snapshot of current engine state
    pub fn status(&self) -> EngineStatus {
        let (avg_fitness, best_fitness) = self
            .history
            .latest()
            .map(|stat| (stat.avg_fitness, stat.best_fitness))
            .unwrap_or((0.0, 0.0));

        EngineStatus {
            generation: self.generation_count,
            population_size: self.population.len(),
            avg_fitness,
            best_fitness,
            mutation_rate: self.config.mutation_rate,
        }
    }

    /// Current population
    #[inline]
    pub fn population(&self) -> &[PromptRecord] {
        &self.population
    }

    /// Completed generation count
    #[inline]
    pub fn generation_count(&self) -> u32 {
        self.generation_count
    }

    /// Best record across all completed generations
    #[inline]
    pub fn best_prompt(&self) -> Option<&PromptRecord> {
        self.best_prompt.as_ref()
    }

    /// Per-generation statistics, oldest first
    #[inline]
    pub fn history(&self) -> &EvolutionHistory {
        &self.history
    }

    /// Engine configuration
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current mutation rate
    #[inline]
    pub fn mutation_rate(&self) -> f64 {
        self.config.mutation_rate
    }

    /// Set the mutation rate, clamped to `[0, 1]`
    pub fn set_mutation_rate(&mut self, rate: f64) {
        self.config.mutation_rate = rate.clamp(0.0, 1.0);
    }

    fn maybe_mutate(&mut self, record: PromptRecord) -> PromptRecord {
        if self.rng.gen::<f64>() > self.config.mutation_rate {
            return record;
        }

        let kind = MutationKind::random(&mut self.rng);
        let content = kind.apply(record.content(), &mut self.rng);
        record.mutated(content)
    }
}
