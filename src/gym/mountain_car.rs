//! Continuous mountain car.
//!
//! An underpowered car sits in a valley and has to rock back and forth to build
//! enough momentum to reach the flag on the right hill.  Actions are a single force
//! in [-1, 1]; every step costs `0.1 * action^2` and reaching the goal pays 100.

use cem_core::errors::{CemError, Result};
use cem_core::sim::{BoxSpace, Simulatable, Transition};

use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

const MIN_ACTION: f32 = -1.0;
const MAX_ACTION: f32 = 1.0;
const MIN_POSITION: f32 = -1.2;
const MAX_POSITION: f32 = 0.6;
const MAX_SPEED: f32 = 0.07;
const GOAL_POSITION: f32 = 0.45;
const GOAL_VELOCITY: f32 = 0.0;
const POWER: f32 = 0.0015;
const GRAVITY: f32 = 0.0025;

/// Episode length after which the simulator reports `done`
pub const MAX_EPISODE_STEPS: usize = 999;

#[derive(Clone)]
/// Simulator state plus its own seeded randomness for resets
pub struct MountainCarContinuous {
    position: f32,
    velocity: f32,
    elapsed: usize,
    time_limit: Option<usize>,
    started: bool,
    rng: XorShiftRng,
    start: Uniform<f32>,
}

impl MountainCarContinuous {
    /// Creates a new simulator with the standard 999 step time limit
    pub fn new(seed: u64) -> Self {
        MountainCarContinuous {
            position: 0.,
            velocity: 0.,
            elapsed: 0,
            time_limit: Some(MAX_EPISODE_STEPS),
            started: false,
            rng: XorShiftRng::seed_from_u64(seed),
            start: Uniform::new(-0.6, -0.4),
        }
    }

    /// Replaces the time limit.  `None` lets episodes run until the goal is reached.
    pub fn with_time_limit(mut self, limit: Option<usize>) -> Self {
        self.time_limit = limit;
        self
    }

    /// Current (position, velocity)
    pub fn state(&self) -> [f32; 2] {
        [self.position, self.velocity]
    }

    #[cfg(test)]
    fn set_state(&mut self, position: f32, velocity: f32) {
        self.position = position;
        self.velocity = velocity;
        self.started = true;
    }
}

impl Simulatable for MountainCarContinuous {
    fn observation_space(&self) -> BoxSpace {
        BoxSpace::new(vec![MIN_POSITION, -MAX_SPEED], vec![MAX_POSITION, MAX_SPEED])
    }

    fn action_space(&self) -> BoxSpace {
        BoxSpace::uniform(1, MIN_ACTION, MAX_ACTION)
    }

    fn seed(&mut self, seed: u64) -> () {
        self.rng = XorShiftRng::seed_from_u64(seed);
    }

    fn reset(&mut self) -> Result<Vec<f32>> {
        self.position = self.start.sample(&mut self.rng);
        self.velocity = 0.;
        self.elapsed = 0;
        self.started = true;
        Ok(self.state().to_vec())
    }

    fn step(&mut self, action: &[f32]) -> Result<Transition> {
        if !self.started {
            return Err(CemError::Environment(
                "step called before reset".to_string(),
            ));
        }
        if action.len() != 1 {
            return Err(CemError::Environment(format!(
                "expected a single action, got {}",
                action.len()
            )));
        }
        if !action[0].is_finite() {
            return Err(CemError::Environment(format!(
                "non-finite action: {}",
                action[0]
            )));
        }

        let force = action[0].max(MIN_ACTION).min(MAX_ACTION);
        self.velocity += force * POWER - GRAVITY * (3. * self.position).cos();
        self.velocity = self.velocity.max(-MAX_SPEED).min(MAX_SPEED);
        self.position += self.velocity;
        self.position = self.position.max(MIN_POSITION).min(MAX_POSITION);
        // Inelastic wall on the left
        if self.position == MIN_POSITION && self.velocity < 0. {
            self.velocity = 0.;
        }
        self.elapsed += 1;

        let terminal = self.position >= GOAL_POSITION && self.velocity >= GOAL_VELOCITY;
        let mut reward = if terminal { 100. } else { 0. };
        reward -= action[0].powi(2) * 0.1;

        let truncated = !terminal && self.time_limit.map_or(false, |l| self.elapsed >= l);
        let done = terminal || truncated;
        if done {
            self.started = false;
        }

        Ok(Transition {
            state: self.state().to_vec(),
            reward: reward,
            done: done,
            truncated: truncated,
        })
    }
}
