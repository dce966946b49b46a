use std::fmt;

use crate::errors::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How long an episode ran
pub enum Steps {
    /// The simulator signaled `done` after this many steps
    Done(usize),
    /// `max_t` was reached before the simulator signaled `done`
    Capped,
}

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Steps::Done(n) => write!(f, "{}", n),
            Steps::Capped => write!(f, "capped"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Result of rolling out a single episode
pub struct Episode {
    /// Discounted sum of rewards
    pub ret: f32,
    /// Length of the episode
    pub steps: Steps,
}

/// Fitness function which scores flat parameter vectors by running them.
///
/// Implementations own mutable simulation state, so the optimizer clones one per
/// worker and reseeds it before every episode.
pub trait Environment: Clone + Send + Sync {
    /// Length of the parameter vectors this environment accepts
    fn num_params(&self) -> usize;

    /// Reseeds the underlying simulator
    fn reseed(&mut self, seed: u64) -> ();

    /// Runs one episode with the given parameters.  Higher returns are better.
    fn evaluate(&mut self, params: &[f32], gamma: f32, max_t: usize) -> Result<Episode>;
}

/// Persists the incumbent whenever the rolling average improves
pub trait Checkpoint {
    /// Saves the given parameters, replacing whatever was saved before
    fn save(&mut self, params: &[f32]) -> Result<()>;
}

impl<F> Checkpoint for F
where
    F: FnMut(&[f32]) -> Result<()>,
{
    fn save(&mut self, params: &[f32]) -> Result<()> {
        self(params)
    }
}

/// Discards every checkpoint
pub struct NoCheckpoint;

impl Checkpoint for NoCheckpoint {
    fn save(&mut self, _params: &[f32]) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Why the optimizer stopped
pub enum Termination {
    /// The rolling average reached the success threshold
    Converged,
    /// Every iteration ran without reaching the threshold
    BudgetExhausted,
}

#[derive(Debug, Clone)]
/// Output of a training run
pub struct TrainingReport {
    /// Reported (undiscounted) score of the incumbent after each iteration
    pub scores: Vec<f32>,
    /// Last iteration that ran, 1-based
    pub iterations: usize,
    /// Terminal state reached
    pub termination: Termination,
    /// Best rolling average seen
    pub best_mean: f32,
    /// Final incumbent
    pub incumbent: Vec<f32>,
}

/// Trait to define optimizer methods
pub trait Optimizer {
    /// Runs the optimizer against an environment, handing improved incumbents to the
    /// checkpoint.  Any environment or checkpoint failure aborts the run.
    fn run<E, C>(&self, env: &E, checkpoint: &mut C) -> Result<TrainingReport>
    where
        E: Environment,
        C: Checkpoint;
}
