use anyhow::Result;
use clap::{App, Arg, ArgMatches};

use cem_core::config::TrainingConfig;

/// Trait to add new arguments to the current app
pub trait ArgAugmenter {
    /// Type of struct to output from this parser
    type Output;

    /// Specifies arguments to add
    fn add_args<'a, 'b>(&self, app: App<'a, 'b>) -> App<'a, 'b>;

    /// Parses the arguments
    fn load_from_args<'a>(&self, args: &ArgMatches<'a>) -> Result<Self::Output>;
}

/// Struct defining the cross-entropy arguments using ArgAugmenter
pub struct TrainingArgs;

impl ArgAugmenter for TrainingArgs {
    type Output = TrainingConfig;

    /// Specifies arguments to add for the optimizer
    fn add_args<'a, 'b>(&self, app: App<'a, 'b>) -> App<'a, 'b> {
        app
      .arg(Arg::with_name("iters")
           .short("i")
           .long("iters")
           .takes_value(true)
           .default_value("500")
           .help("Number of iterations to run before exiting"))
      .arg(Arg::with_name("max_t")
           .long("max-t")
           .takes_value(true)
           .default_value("1000")
           .help("Maximum number of steps per candidate episode"))
      .arg(Arg::with_name("eval_max_t")
           .long("eval-max-t")
           .takes_value(true)
           .default_value("5000")
           .help("Maximum number of steps when scoring the incumbent"))
      .arg(Arg::with_name("gamma")
           .long("gamma")
           .takes_value(true)
           .default_value("1.0")
           .help("Discount rate for candidate returns"))
      .arg(Arg::with_name("report_iters")
           .short("r")
           .long("report")
           .takes_value(true)
           .default_value("1")
           .help("How often to report progress."))
      .arg(Arg::with_name("pop_size")
           .short("p")
           .long("pop-size")
           .takes_value(true)
           .default_value("50")
           .help("Number of candidates sampled each iteration"))
      .arg(Arg::with_name("elite_frac")
           .short("e")
           .long("elite-frac")
           .takes_value(true)
           .default_value("0.2")
           .help("Fraction of the population averaged into the next incumbent"))
      .arg(Arg::with_name("sigma")
           .short("s")
           .long("sigma")
           .takes_value(true)
           .default_value("0.5")
           .help("Standard deviation of the additive noise"))
      .arg(Arg::with_name("threshold")
           .long("threshold")
           .takes_value(true)
           .default_value("90.0")
           .help("Rolling average score at which the environment counts as solved"))
      .arg(Arg::with_name("window")
           .long("window")
           .takes_value(true)
           .default_value("100")
           .help("Number of recent scores in the rolling average"))
      .arg(Arg::with_name("seed")
           .long("seed")
           .takes_value(true)
           .default_value("101")
           .help("Random seed for noise and simulator resets"))
      .arg(Arg::with_name("sequential")
           .long("sequential")
           .help("Evaluates candidates one at a time instead of on the thread pool"))
    }

    /// Parses the arguments for the optimizer
    fn load_from_args<'a>(&self, args: &ArgMatches<'a>) -> Result<Self::Output> {
        let config = TrainingConfig {
            n_iterations: value_t!(args, "iters", usize)?,
            max_t: value_t!(args, "max_t", usize)?,
            eval_max_t: value_t!(args, "eval_max_t", usize)?,
            gamma: value_t!(args, "gamma", f32)?,
            print_every: value_t!(args, "report_iters", usize)?,
            pop_size: value_t!(args, "pop_size", usize)?,
            elite_frac: value_t!(args, "elite_frac", f32)?,
            sigma: value_t!(args, "sigma", f32)?,
            success_threshold: value_t!(args, "threshold", f32)?,
            window: value_t!(args, "window", usize)?,
            seed: value_t!(args, "seed", u64)?,
            parallel: !args.is_present("sequential"),
        };
        config.validate()?;
        Ok(config)
    }
}
