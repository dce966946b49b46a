#[macro_use]
extern crate clap;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{App, Arg, ArgMatches};
use tracing::info;

use cem_core::model::WeightUpdater;
use cem_core::optimizer::Environment;
use cem_core::sim::Simulatable;
use cem_models::checkpoint::read_model;
use cem_models::PolicyEvaluator;

use cem::bin_utils::logging::init_logging;
use cem::gym::MountainCarContinuous;

fn parse<'a>() -> ArgMatches<'a> {
    App::new("cem-replay")
        .version("0.1.0")
        .about("Runs a checkpointed mountain car policy")
        .arg(
            Arg::with_name("checkpoint")
                .index(1)
                .required(true)
                .help("Checkpoint written by cem-train"),
        )
        .arg(
            Arg::with_name("episodes")
                .short("n")
                .long("episodes")
                .takes_value(true)
                .default_value("1")
                .help("Number of episodes to run"),
        )
        .arg(
            Arg::with_name("max_t")
                .long("max-t")
                .takes_value(true)
                .default_value("5000")
                .help("Maximum number of steps per episode"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .default_value("101")
                .help("Seed for the first episode; later episodes count up from it"),
        )
        .get_matches()
}

fn main() -> Result<()> {
    init_logging();
    let args = parse();
    let path = PathBuf::from(args.value_of("checkpoint").unwrap_or_default());
    let episodes = value_t!(args, "episodes", usize)?;
    let max_t = value_t!(args, "max_t", usize)?;
    let seed = value_t!(args, "seed", u64)?;

    let network = read_model(&path, None)
        .with_context(|| format!("failed to load checkpoint {}", path.display()))?;
    let layout = network.layout();

    let sim = MountainCarContinuous::new(seed);
    let (s_size, a_size) = (sim.observation_space().dims(), sim.action_space().dims());
    if (layout.s_size, layout.a_size) != (s_size, a_size) {
        bail!(
            "checkpoint maps {} observations to {} actions, the simulator needs {} to {}",
            layout.s_size,
            layout.a_size,
            s_size,
            a_size
        );
    }

    let weights = network.get_weights();
    let mut evaluator = PolicyEvaluator::new(sim, layout.h_size);
    let mut total = 0f32;
    for ep in 0..episodes {
        evaluator.reseed(seed.wrapping_add(ep as u64));
        let episode = evaluator.evaluate_episode(&weights, 1.0, max_t)?;
        info!("Episode {}\tScore: {:.2}\tSteps: {}", ep + 1, episode.ret, episode.steps);
        total += episode.ret;
    }
    if episodes > 0 {
        info!("Average Score: {:.2}", total / episodes as f32);
    }
    Ok(())
}
