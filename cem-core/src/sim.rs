//! Interface for simulators that a policy can be rolled out in.
//!
//! The optimizer never looks at the physics; it only needs to reset a simulator,
//! push actions into it and read back observations and rewards.  Anything that
//! implements [`Simulatable`] can be substituted, including the deterministic fakes
//! used in tests.

use crate::errors::Result;

#[derive(Debug, Clone, PartialEq)]
/// A box shaped space: one closed interval per dimension
pub struct BoxSpace {
    /// Lower bound for each dimension
    pub low: Vec<f32>,
    /// Upper bound for each dimension
    pub high: Vec<f32>,
}

impl BoxSpace {
    /// Creates a new space.  Panics when the bounds have different lengths.
    pub fn new(low: Vec<f32>, high: Vec<f32>) -> Self {
        assert_eq!(low.len(), high.len());
        BoxSpace { low, high }
    }

    /// Space where every dimension shares the same bounds
    pub fn uniform(dims: usize, low: f32, high: f32) -> Self {
        BoxSpace::new(vec![low; dims], vec![high; dims])
    }

    #[inline]
    /// Number of dimensions
    pub fn dims(&self) -> usize {
        self.low.len()
    }

    /// Whether the point lies within the bounds
    pub fn contains(&self, x: &[f32]) -> bool {
        x.len() == self.dims()
            && x
                .iter()
                .zip(self.low.iter().zip(self.high.iter()))
                .all(|(v, (l, h))| v >= l && v <= h)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Outcome of a single simulator step
pub struct Transition {
    /// Observation after the step
    pub state: Vec<f32>,
    /// Reward collected by the step
    pub reward: f32,
    /// Whether the episode is over
    pub done: bool,
    /// Set when the episode ended because of a time limit rather than reaching a
    /// terminal state
    pub truncated: bool,
}

/// A simulator with reset/step dynamics and fixed shaped spaces
pub trait Simulatable: Clone + Send + Sync {
    /// Shape of the observations returned by `reset` and `step`
    fn observation_space(&self) -> BoxSpace;

    /// Shape and bounds of the accepted actions
    fn action_space(&self) -> BoxSpace;

    /// Reseeds the simulator's internal randomness
    fn seed(&mut self, seed: u64) -> ();

    /// Starts a new episode, returning the initial observation
    fn reset(&mut self) -> Result<Vec<f32>>;

    /// Advances the simulation by one action
    fn step(&mut self, action: &[f32]) -> Result<Transition>;
}
