use anyhow::{Context, Result};
use clap::{App, ArgMatches};
use tracing::info;

use cem_core::cross_entropy::CrossEntropy;
use cem_core::optimizer::{Optimizer, Termination};
use cem_core::sim::Simulatable;
use cem_models::checkpoint::FileCheckpoint;
use cem_models::PolicyEvaluator;

use cem::bin_utils::args::{ArgAugmenter, TrainingArgs};
use cem::bin_utils::logging::init_logging;
use cem::bin_utils::model_params::PolicyArgs;
use cem::bin_utils::report::write_scores;
use cem::gym::MountainCarContinuous;

fn parse<'a>() -> ArgMatches<'a> {
    let base = App::new("cem-train")
        .version("0.1.0")
        .about("Trains a mountain car policy with the cross-entropy method");

    let base = TrainingArgs.add_args(base);
    PolicyArgs.add_args(base).get_matches()
}

fn main() -> Result<()> {
    init_logging();
    let args = parse();
    let config = TrainingArgs.load_from_args(&args)?;
    let policy = PolicyArgs.load_from_args(&args)?;

    let sim = MountainCarContinuous::new(config.seed);
    let obs = sim.observation_space();
    let act = sim.action_space();
    info!("observation space: low {:?}, high {:?}", obs.low, obs.high);
    info!("action space: low {:?}, high {:?}", act.low, act.high);

    let evaluator = PolicyEvaluator::new(sim, policy.hidden);
    let mut checkpoint = FileCheckpoint::new(policy.checkpoint.clone(), evaluator.layout());

    let optimizer = CrossEntropy::new(config)?;
    let report = optimizer
        .run(&evaluator, &mut checkpoint)
        .context("training aborted")?;

    match report.termination {
        Termination::Converged => info!(
            "Converged after {} iterations, best average score {:.2}",
            report.iterations, report.best_mean
        ),
        Termination::BudgetExhausted => info!(
            "Stopped after {} iterations without converging, best average score {:.2}",
            report.iterations, report.best_mean
        ),
    }
    info!("Best policy written to {}", checkpoint.path().display());

    if let Some(path) = policy.scores {
        write_scores(&path, &report.scores)
            .with_context(|| format!("failed to write scores to {}", path.display()))?;
        info!("Scores written to {}", path.display());
    }
    Ok(())
}
