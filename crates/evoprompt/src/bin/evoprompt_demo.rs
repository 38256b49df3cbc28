//! Demonstration run of the evolutionary prompt engine
//!
//! Evolves a small population for five generations under a keyword-based
//! fitness heuristic, letting the convergence controller adjust the
//! mutation rate between generations, then prints the final status as JSON.

use evoprompt::{
    ConvergenceController, EngineConfig, EvoPromptEngine, EvoPromptError, EvoPromptResult,
    KeywordFitnessFunction,
};
use tracing_subscriber::EnvFilter;

fn main() -> EvoPromptResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = EngineConfig::builder()
        .population_size(10)
        .mutation_rate(0.3)
        .seed(42)
        .build()?;

    let mut engine = EvoPromptEngine::new(config)?;
    engine.initialize_population(&[
        "Analyze the symbolic reasoning framework.",
        "Explain the verification protocol step by step.",
        "Describe the evidence anchoring mechanism.",
        "Detail the evaluation pipeline.",
        "Outline the consensus approach.",
    ])?;

    let fitness = KeywordFitnessFunction::new(["framework", "verification", "evidence"]);
    let controller = ConvergenceController::default();

    for _ in 0..5 {
        engine.evolve_generation(&fitness)?;
        controller.adjust(&mut engine);
    }

    let best = engine
        .best_prompt()
        .cloned()
        .ok_or(EvoPromptError::BestUnavailable)?;
    tracing::info!(
        fitness = best.average_fitness(),
        generation = best.generation(),
        mutations = best.mutation_count(),
        "Best evolved prompt: {}",
        best.content()
    );

    let status = serde_json::to_string_pretty(&engine.status())
        .map_err(|e| EvoPromptError::Other(e.to_string()))?;
    println!("{status}");

    Ok(())
}
