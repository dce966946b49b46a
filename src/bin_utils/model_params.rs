use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{App, Arg, ArgMatches};

use super::args::ArgAugmenter;

/// Capture the policy network and output parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyParams {
    /// Width of the hidden layer
    pub hidden: usize,
    /// Where the best incumbent is checkpointed
    pub checkpoint: PathBuf,
    /// Optional path to write the per-iteration scores
    pub scores: Option<PathBuf>,
}

/// Struct defining the policy arguments using ArgAugmenter
pub struct PolicyArgs;

impl ArgAugmenter for PolicyArgs {
    type Output = PolicyParams;

    fn add_args<'a, 'b>(&self, app: App<'a, 'b>) -> App<'a, 'b> {
        app.arg(
            Arg::with_name("hidden")
                .long("hidden")
                .takes_value(true)
                .default_value("16")
                .help("Number of hidden units in the policy network"),
        )
        .arg(
            Arg::with_name("checkpoint")
                .short("c")
                .long("checkpoint")
                .takes_value(true)
                .default_value("checkpoint.json")
                .help("Where to write the best policy"),
        )
        .arg(
            Arg::with_name("scores")
                .long("scores")
                .takes_value(true)
                .help("If provided, writes the score of every iteration as csv"),
        )
    }

    fn load_from_args<'a>(&self, args: &ArgMatches<'a>) -> Result<Self::Output> {
        let hidden = value_t!(args, "hidden", usize)?;
        if hidden == 0 {
            bail!("--hidden needs to be at least 1");
        }
        Ok(PolicyParams {
            hidden: hidden,
            checkpoint: PathBuf::from(args.value_of("checkpoint").unwrap_or("checkpoint.json")),
            scores: args.value_of("scores").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<PolicyParams> {
        let app = PolicyArgs.add_args(App::new("cem-train"));
        let mut full = vec!["cem-train"];
        full.extend_from_slice(argv);
        PolicyArgs.load_from_args(&app.get_matches_from_safe(full)?)
    }

    #[test]
    fn test_policy_params() {
        let p = parse(&[]).unwrap();
        assert_eq!(p.hidden, 16);
        assert_eq!(p.checkpoint, PathBuf::from("checkpoint.json"));
        assert_eq!(p.scores, None);

        let p = parse(&["--hidden", "8", "-c", "out/best.json", "--scores", "scores.csv"]).unwrap();
        assert_eq!(p.hidden, 8);
        assert_eq!(p.checkpoint, PathBuf::from("out/best.json"));
        assert_eq!(p.scores, Some(PathBuf::from("scores.csv")));

        assert!(parse(&["--hidden", "0"]).is_err());
    }
}
