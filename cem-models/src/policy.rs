//! Rolls a policy network out in a simulator
use cem_core::errors::{CemError, Result};
use cem_core::model::{Evaluator, WeightUpdater};
use cem_core::optimizer::{Environment, Episode, Steps};
use cem_core::sim::Simulatable;

use crate::layout::WeightLayout;
use crate::nn::PolicyNetwork;

/// Owns a policy network and a simulator, and turns flat parameter vectors into
/// episode returns.  Loading new parameters overwrites the network in place.
#[derive(Clone, Debug)]
pub struct PolicyEvaluator<S> {
    network: PolicyNetwork,
    sim: S,
}

impl<S: Simulatable> PolicyEvaluator<S> {
    /// Builds a network sized from the simulator's observation and action spaces
    pub fn new(sim: S, h_size: usize) -> Self {
        let s_size = sim.observation_space().dims();
        let a_size = sim.action_space().dims();
        PolicyEvaluator {
            network: PolicyNetwork::new(s_size, h_size, a_size),
            sim: sim,
        }
    }

    /// Layout of the parameter vectors this evaluator accepts
    pub fn layout(&self) -> WeightLayout {
        self.network.layout()
    }

    /// Replaces the network's weights
    pub fn load_weights(&mut self, weights: &[f32]) -> Result<()> {
        self.network.set_weights(weights)
    }

    /// Reads the network's weights back out as a flat vector
    pub fn weights(&self) -> Vec<f32> {
        self.network.get_weights()
    }

    /// Maps a state to an action with every component in [-1, 1]
    pub fn compute_action(&self, state: &[f32]) -> Result<Vec<f32>> {
        let expected = self.layout().s_size;
        if state.len() != expected {
            return Err(CemError::DimensionMismatch {
                expected: expected,
                actual: state.len(),
            });
        }
        Ok(self.network.evaluate(state))
    }

    /// Loads `weights`, resets the simulator and steps it until it signals `done` or
    /// `max_t` steps have run, summing `reward * gamma^t`.
    pub fn evaluate_episode(
        &mut self,
        weights: &[f32],
        gamma: f32,
        max_t: usize,
    ) -> Result<Episode> {
        self.load_weights(weights)?;

        let mut state = self.sim.reset()?;
        let mut ret = 0f32;
        let mut discount = 1f32;
        for t in 0..max_t {
            let action = self.compute_action(&state)?;
            let tr = self.sim.step(&action)?;
            ret += tr.reward * discount;
            discount *= gamma;
            if tr.done {
                return Ok(Episode {
                    ret: ret,
                    steps: Steps::Done(t + 1),
                });
            }
            state = tr.state;
        }

        Ok(Episode {
            ret: ret,
            steps: Steps::Capped,
        })
    }
}

impl<S: Simulatable> Environment for PolicyEvaluator<S> {
    fn num_params(&self) -> usize {
        self.layout().dims()
    }

    fn reseed(&mut self, seed: u64) -> () {
        self.sim.seed(seed);
    }

    fn evaluate(&mut self, params: &[f32], gamma: f32, max_t: usize) -> Result<Episode> {
        self.evaluate_episode(params, gamma, max_t)
    }
}
