//! Tournament selection with elitism

use crate::error::{EvoPromptError, EvoPromptResult};
use crate::prompt::PromptRecord;
use rand::Rng;
use rayon::prelude::*;

/// Population size above which fitness ranking sorts in parallel
const PAR_SORT_THRESHOLD: usize = 100;

/// Rank population indices by descending average fitness.
///
/// Stable: records with equal fitness keep their population order.
pub(crate) fn rank_by_fitness(population: &[PromptRecord]) -> Vec<usize> {
    let mut indexed: Vec<(usize, f64)> = population
        .iter()
        .enumerate()
        .map(|(idx, record)| (idx, record.average_fitness()))
        .collect();

    if indexed.len() > PAR_SORT_THRESHOLD {
        indexed.par_sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    } else {
        indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    }

    indexed.into_iter().map(|(idx, _)| idx).collect()
}

/// Select a full parent pool from a scored population.
///
/// The top `elite_count` records are cloned in directly; the remaining slots
/// are filled by tournaments of `tournament_size` distinct records drawn
/// uniformly from the whole population, highest average fitness winning.
/// Ties inside a tournament go to the earliest-drawn candidate, which keeps
/// selection deterministic for a fixed seed.
pub fn select_parents<R: Rng + ?Sized>(
    population: &[PromptRecord],
    elite_count: usize,
    tournament_size: usize,
    rng: &mut R,
) -> EvoPromptResult<Vec<PromptRecord>> {
    if population.is_empty() {
        return Err(EvoPromptError::PopulationEmpty);
    }

    if tournament_size == 0 || tournament_size > population.len() {
        return Err(EvoPromptError::InvalidConfiguration {
            message: format!(
                "Tournament size {} invalid for population of {}",
                tournament_size,
                population.len()
            ),
        });
    }

    let ranked = rank_by_fitness(population);
    let mut parents: Vec<PromptRecord> = ranked
        .iter()
        .take(elite_count.min(population.len()))
        .map(|&idx| population[idx].clone())
        .collect();

    while parents.len() < population.len() {
        let winner = run_tournament(population, tournament_size, rng);
        parents.push(winner.clone());
    }

    Ok(parents)
}

fn run_tournament<'a, R: Rng + ?Sized>(
    population: &'a [PromptRecord],
    tournament_size: usize,
    rng: &mut R,
) -> &'a PromptRecord {
    let drawn = rand::seq::index::sample(rng, population.len(), tournament_size);

    let mut winner = &population[drawn.index(0)];
    for i in 1..drawn.len() {
        let candidate = &population[drawn.index(i)];
        if candidate.average_fitness() > winner.average_fitness() {
            winner = candidate;
        }
    }

    winner
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scored(content: &str, fitness: f64) -> PromptRecord {
        PromptRecord::seed(content).with_score("claude", fitness)
    }

    fn test_population() -> Vec<PromptRecord> {
        vec![
            scored("low fitness prompt", 0.1),
            scored("top fitness prompt", 0.9),
            scored("mid fitness prompt", 0.5),
            scored("second best prompt", 0.8),
        ]
    }

    #[test]
    fn test_parent_pool_matches_population_size() {
        let population = test_population();
        let mut rng = StdRng::seed_from_u64(11);
        let parents = select_parents(&population, 2, 2, &mut rng).unwrap();
        assert_eq!(parents.len(), population.len());
    }

    #[test]
    fn test_elites_lead_the_pool() {
        let population = test_population();
        let mut rng = StdRng::seed_from_u64(11);
        let parents = select_parents(&population, 2, 2, &mut rng).unwrap();

        assert_eq!(parents[0].content(), "top fitness prompt");
        assert_eq!(parents[1].content(), "second best prompt");
    }

    #[test]
    fn test_elite_clones_are_independent() {
        let population = test_population();
        let mut rng = StdRng::seed_from_u64(11);
        let parents = select_parents(&population, 1, 2, &mut rng).unwrap();

        let mutated = parents[0].mutated("changed content");
        assert_eq!(population[1].content(), "top fitness prompt");
        assert_ne!(mutated.content(), population[1].content());
    }

    #[test]
    fn test_tournament_size_exceeding_population_is_error() {
        let population = test_population();
        let mut rng = StdRng::seed_from_u64(11);
        assert!(select_parents(&population, 1, 5, &mut rng).is_err());
        assert!(select_parents(&population, 1, 0, &mut rng).is_err());
    }

    #[test]
    fn test_empty_population_is_error() {
        let mut rng = StdRng::seed_from_u64(11);
        assert!(select_parents(&[], 0, 1, &mut rng).is_err());
    }

    #[test]
    fn test_selection_deterministic_for_seed() {
        let population = test_population();
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);

        let parents_a = select_parents(&population, 1, 3, &mut rng_a).unwrap();
        let parents_b = select_parents(&population, 1, 3, &mut rng_b).unwrap();

        let contents_a: Vec<&str> = parents_a.iter().map(|p| p.content()).collect();
        let contents_b: Vec<&str> = parents_b.iter().map(|p| p.content()).collect();
        assert_eq!(contents_a, contents_b);
    }

    #[test]
    fn test_rank_stable_on_ties() {
        let population = vec![
            scored("first equal", 0.5),
            scored("second equal", 0.5),
            scored("third equal", 0.5),
        ];
        assert_eq!(rank_by_fitness(&population), vec![0, 1, 2]);
    }
}
