//! Training configuration
use crate::errors::{CemError, Result};

#[derive(Debug, Clone, PartialEq)]
/// Settings for a cross-entropy training run.  Defaults match the values the method
/// was tuned with on continuous mountain car.
pub struct TrainingConfig {
    /// Maximum number of iterations before giving up
    pub n_iterations: usize,

    /// Step cap for each candidate episode
    pub max_t: usize,

    /// Step cap for the undiscounted evaluation of the incumbent
    pub eval_max_t: usize,

    /// Discount applied to candidate returns
    pub gamma: f32,

    /// Number of iterations between progress reports
    pub print_every: usize,

    /// Number of candidates sampled per iteration
    pub pop_size: usize,

    /// Fraction of the population averaged into the next incumbent
    pub elite_frac: f32,

    /// Standard deviation of the additive noise
    pub sigma: f32,

    /// Rolling average at which training stops
    pub success_threshold: f32,

    /// Number of recent scores in the rolling average
    pub window: usize,

    /// Seed for the noise and episode streams
    pub seed: u64,

    /// Evaluate candidates on the rayon thread pool
    pub parallel: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            n_iterations: 500,
            max_t: 1000,
            eval_max_t: 5000,
            gamma: 1.0,
            print_every: 1,
            pop_size: 50,
            elite_frac: 0.2,
            sigma: 0.5,
            success_threshold: 90.0,
            window: 100,
            seed: 101,
            parallel: true,
        }
    }
}

impl TrainingConfig {
    /// Number of elites per iteration: `floor(pop_size * elite_frac)`
    pub fn n_elite(&self) -> usize {
        (self.pop_size as f32 * self.elite_frac).floor() as usize
    }

    /// Checks that the configuration describes a runnable search
    pub fn validate(&self) -> Result<()> {
        if self.pop_size == 0 {
            return Err(CemError::Config("pop_size must be at least 1".into()));
        }
        if !(self.elite_frac > 0.0 && self.elite_frac <= 1.0) {
            return Err(CemError::Config(format!(
                "elite_frac must be in (0, 1], got {}",
                self.elite_frac
            )));
        }
        if self.n_elite() == 0 {
            return Err(CemError::Config(format!(
                "pop_size {} with elite_frac {} selects no elites",
                self.pop_size, self.elite_frac
            )));
        }
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(CemError::Config(format!(
                "sigma must be positive, got {}",
                self.sigma
            )));
        }
        if !(self.gamma >= 0.0 && self.gamma <= 1.0) {
            return Err(CemError::Config(format!(
                "gamma must be in [0, 1], got {}",
                self.gamma
            )));
        }
        if self.window == 0 {
            return Err(CemError::Config("window must be at least 1".into()));
        }
        if self.print_every == 0 {
            return Err(CemError::Config("print_every must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let c = TrainingConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.n_elite(), 10);
    }

    #[test]
    fn test_elite_floor() {
        let mut c = TrainingConfig::default();
        c.pop_size = 7;
        c.elite_frac = 0.5;
        assert_eq!(c.n_elite(), 3);
        c.pop_size = 4;
        c.elite_frac = 0.2;
        assert_eq!(c.n_elite(), 0);
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad = vec![
            TrainingConfig {
                pop_size: 0,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                sigma: 0.0,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                gamma: 1.5,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                elite_frac: 1.2,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                window: 0,
                ..TrainingConfig::default()
            },
        ];
        for c in bad {
            match c.validate() {
                Err(CemError::Config(_)) => (),
                other => panic!("expected config error for {:?}, got {:?}", c, other),
            }
        }
    }
}
