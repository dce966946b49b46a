//! Optimizer for the Cross-Entropy Method
//!
//! Each iteration samples a population around the incumbent, scores every candidate
//! and replaces the incumbent with the mean of the top fraction.  The incumbent is
//! then rolled out once, undiscounted, and that score feeds a rolling average which
//! drives both checkpointing and the stopping criterion.

use std::f32;
use std::time::Instant;

use float_ord::FloatOrd;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::TrainingConfig;
use crate::errors::Result;
use crate::model::sampler::GaussianSampler;
use crate::optimizer::*;
use crate::window::RollingWindow;

/// Settings for the cross-entropy optimizer
#[derive(Debug, Clone, PartialEq)]
pub struct CrossEntropy {
    /// Hyperparameters of the run
    pub config: TrainingConfig,
}

impl CrossEntropy {
    /// Creates a new optimizer, rejecting configurations that can't run
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        Ok(CrossEntropy { config: config })
    }

    // Scores every candidate.  Each one gets a pre-drawn episode seed so the result
    // doesn't depend on which worker picked it up.
    fn evaluate_population<E: Environment>(
        &self,
        env: &E,
        population: &[Vec<f32>],
        seeds: &[u64],
    ) -> Result<Vec<f32>> {
        let gamma = self.config.gamma;
        let max_t = self.config.max_t;
        let eval = |worker: &mut E, (candidate, seed): (&Vec<f32>, &u64)| -> Result<f32> {
            worker.reseed(*seed);
            worker.evaluate(candidate, gamma, max_t).map(|e| e.ret)
        };

        if self.config.parallel {
            population
                .par_iter()
                .zip(seeds.par_iter())
                .map_init(|| env.clone(), eval)
                .collect()
        } else {
            let mut worker = env.clone();
            population
                .iter()
                .zip(seeds.iter())
                .map(|pair| eval(&mut worker, pair))
                .collect()
        }
    }
}

// NaN returns rank below everything else
#[inline]
fn rank_key(ret: f32) -> FloatOrd<f32> {
    if ret.is_nan() {
        FloatOrd(f32::NEG_INFINITY)
    } else {
        FloatOrd(ret)
    }
}

/// Indices of the `n_elite` highest returns, best first.  The sort is stable so
/// ties keep their sampling order.
pub fn elite_indices(returns: &[f32], n_elite: usize) -> Vec<usize> {
    let mut idxs: Vec<usize> = (0..returns.len()).collect();
    idxs.sort_by(|a, b| rank_key(returns[*b]).cmp(&rank_key(returns[*a])));
    idxs.truncate(n_elite);
    idxs
}

/// Component-wise mean of the selected candidates, summed in the order given
pub fn elite_mean(population: &[Vec<f32>], elites: &[usize]) -> Vec<f32> {
    assert!(!elites.is_empty());
    let mut mean = vec![0f32; population[elites[0]].len()];
    for &i in elites {
        for (m, w) in mean.iter_mut().zip(population[i].iter()) {
            *m += w;
        }
    }

    let n = elites.len() as f32;
    for m in mean.iter_mut() {
        *m /= n;
    }
    mean
}

impl Optimizer for CrossEntropy {
    fn run<E, C>(&self, env: &E, checkpoint: &mut C) -> Result<TrainingReport>
    where
        E: Environment,
        C: Checkpoint,
    {
        let cfg = &self.config;
        cfg.validate()?;

        let dims = env.num_params();
        let n_elite = cfg.n_elite();
        let mut gs = GaussianSampler::new(cfg.seed);

        // Initial incumbent
        let mut incumbent = gs.standard_vector(dims, cfg.sigma);
        let mut window = RollingWindow::new(cfg.window);
        let mut scores = Vec::with_capacity(cfg.n_iterations);
        let mut best_mean = f32::NEG_INFINITY;
        let mut scorer = env.clone();

        info!(
            "Starting cross-entropy method training: params={}, pop_size={}, elites={}",
            dims, cfg.pop_size, n_elite
        );

        let start = Instant::now();
        let mut termination = Termination::BudgetExhausted;
        let mut iterations = 0;

        for pass in 1..=cfg.n_iterations {
            iterations = pass;
            let now = Instant::now();

            let population = gs.population(&incumbent, cfg.sigma, cfg.pop_size);
            let seeds: Vec<u64> = (0..cfg.pop_size).map(|_| gs.episode_seed()).collect();
            let returns = self.evaluate_population(env, &population, &seeds)?;

            let elites = elite_indices(&returns, n_elite);
            debug!(
                "Iteration {}: best return {}, elite cutoff {}",
                pass,
                returns[elites[0]],
                returns[elites[elites.len() - 1]]
            );
            incumbent = elite_mean(&population, &elites);

            // Report the new incumbent undiscounted
            scorer.reseed(gs.episode_seed());
            let episode = scorer.evaluate(&incumbent, 1.0, cfg.eval_max_t)?;
            window.push(episode.ret);
            scores.push(episode.ret);
            let elapsed = now.elapsed();

            let mean = window.mean();
            if mean > best_mean {
                best_mean = mean;
                checkpoint.save(&incumbent)?;
                debug!("Checkpointed incumbent at average score {:.2}", mean);
            }

            if pass % cfg.print_every == 0 {
                info!(
                    "Iteration {}\tAverage Score: {:>5.2}  Steps: {}  Time: {:.1}s",
                    pass,
                    mean,
                    episode.steps,
                    elapsed.as_secs_f32()
                );
            }

            if mean >= cfg.success_threshold {
                info!(
                    "Environment solved in {} iterations!\tAverage Score: {:.2}",
                    pass.saturating_sub(cfg.window),
                    mean
                );
                termination = Termination::Converged;
                break;
            }
        }

        if termination == Termination::BudgetExhausted {
            info!(
                "Iteration budget of {} exhausted.\tBest Average Score: {:.2}",
                cfg.n_iterations, best_mean
            );
        }
        info!(
            "Training done in {:.1} min",
            start.elapsed().as_secs_f32() / 60.
        );

        Ok(TrainingReport {
            scores: scores,
            iterations: iterations,
            termination: termination,
            best_mean: best_mean,
            incumbent: incumbent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CemError;
    use rand::distributions::{Distribution, Uniform};
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;
    use std::sync::{Arc, Mutex};

    fn assert_vectors(expected: &[f32], actual: &[f32]) -> () {
        assert_eq!(expected.len(), actual.len());
        for (e, a) in expected.iter().zip(actual) {
            assert!((e - a).abs() < 1e-6, "{} != {}", e, a);
        }
    }

    // 100 - squared distance to a target, with a little seed dependent jitter so the
    // episode seeds matter
    #[derive(Clone)]
    struct SphereEnv {
        target: Vec<f32>,
        seed: u64,
    }

    impl SphereEnv {
        fn new(target: Vec<f32>) -> Self {
            SphereEnv { target, seed: 0 }
        }
    }

    impl Environment for SphereEnv {
        fn num_params(&self) -> usize {
            self.target.len()
        }

        fn reseed(&mut self, seed: u64) {
            self.seed = seed;
        }

        fn evaluate(&mut self, params: &[f32], gamma: f32, _max_t: usize) -> Result<Episode> {
            let dist: f32 = params
                .iter()
                .zip(self.target.iter())
                .map(|(p, t)| (p - t).powi(2))
                .sum();
            let jitter = (self.seed % 1000) as f32 * 1e-4;
            Ok(Episode {
                ret: gamma * (100. - dist) + jitter,
                steps: Steps::Done(1),
            })
        }
    }

    // Scores the n-th incumbent script[n - 1] and every candidate 0, recording the
    // incumbents it was shown
    #[derive(Clone)]
    struct ScriptedEnv {
        script: Vec<f32>,
        incumbents: Arc<Mutex<Vec<Vec<f32>>>>,
    }

    impl ScriptedEnv {
        fn new(script: Vec<f32>) -> Self {
            ScriptedEnv {
                script: script,
                incumbents: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn incumbents(&self) -> Vec<Vec<f32>> {
            self.incumbents.lock().unwrap().clone()
        }
    }

    impl Environment for ScriptedEnv {
        fn num_params(&self) -> usize {
            4
        }

        fn reseed(&mut self, _seed: u64) {}

        fn evaluate(&mut self, params: &[f32], _gamma: f32, max_t: usize) -> Result<Episode> {
            if max_t == 77 {
                let mut seen = self.incumbents.lock().unwrap();
                seen.push(params.to_vec());
                Ok(Episode {
                    ret: self.script[seen.len() - 1],
                    steps: Steps::Capped,
                })
            } else {
                Ok(Episode {
                    ret: 0.,
                    steps: Steps::Capped,
                })
            }
        }
    }

    fn scripted_config(n_iterations: usize) -> TrainingConfig {
        TrainingConfig {
            n_iterations: n_iterations,
            window: 1,
            eval_max_t: 77,
            max_t: 10,
            ..TrainingConfig::default()
        }
    }

    #[derive(Clone)]
    struct BrokenEnv;

    impl Environment for BrokenEnv {
        fn num_params(&self) -> usize {
            2
        }

        fn reseed(&mut self, _seed: u64) {}

        fn evaluate(&mut self, _params: &[f32], _gamma: f32, _max_t: usize) -> Result<Episode> {
            Err(CemError::Environment("simulator exploded".into()))
        }
    }

    fn small_config() -> TrainingConfig {
        TrainingConfig {
            n_iterations: 40,
            window: 5,
            success_threshold: 1000.,
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_elite_indices() {
        let returns = vec![0.5, -1.0, 3.0, 2.0, f32::NAN, 3.0, 0.0];
        let elites = elite_indices(&returns, 3);
        // Stable for the tie at 3.0
        assert_eq!(elites, vec![2, 5, 3]);
        assert_eq!(elite_indices(&returns, 7)[6], 4);
    }

    #[test]
    fn test_elite_dominates_rest() {
        let mut rng = XorShiftRng::seed_from_u64(2019);
        let dist = Uniform::new(-100f32, 100f32);
        for pop_size in [10usize, 50, 77].iter() {
            let returns: Vec<f32> = (0..*pop_size).map(|_| dist.sample(&mut rng)).collect();
            let cfg = TrainingConfig {
                pop_size: *pop_size,
                ..TrainingConfig::default()
            };
            let n_elite = cfg.n_elite();
            let elites = elite_indices(&returns, n_elite);
            assert_eq!(elites.len(), (*pop_size as f32 * 0.2).floor() as usize);

            let worst_elite = elites.iter().map(|i| returns[*i]).fold(f32::MAX, f32::min);
            for i in 0..*pop_size {
                if !elites.contains(&i) {
                    assert!(returns[i] <= worst_elite);
                }
            }
        }
    }

    #[test]
    fn test_elite_mean() {
        let pop = vec![vec![1., 2.], vec![3., 4.], vec![100., 100.], vec![5., 0.]];
        let mean = elite_mean(&pop, &[0, 1, 3]);
        assert_vectors(&[3., 2.], &mean);
    }

    #[test]
    fn test_converges_on_sphere() {
        let cfg = TrainingConfig {
            n_iterations: 200,
            success_threshold: 99.0,
            ..small_config()
        };
        let optimizer = CrossEntropy::new(cfg).unwrap();
        let env = SphereEnv::new(vec![1.0, -1.0, 0.5]);
        let report = optimizer.run(&env, &mut NoCheckpoint).unwrap();
        assert_eq!(report.termination, Termination::Converged);
        assert!(report.iterations < 200);
        assert_eq!(report.scores.len(), report.iterations);
        let dist: f32 = env
            .target
            .iter()
            .zip(report.incumbent.iter())
            .map(|(t, p)| (t - p).powi(2))
            .sum();
        assert!(dist < 4.0, "{:?}", report.incumbent);
    }

    #[test]
    fn test_halts_at_threshold() {
        let env = ScriptedEnv::new(vec![30., 60., 90., 120.]);

        let mut saves = 0;
        let mut ckpt = |_p: &[f32]| -> Result<()> {
            saves += 1;
            Ok(())
        };
        let report = CrossEntropy::new(scripted_config(50))
            .unwrap()
            .run(&env, &mut ckpt)
            .unwrap();

        assert_eq!(report.termination, Termination::Converged);
        assert_eq!(report.iterations, 3);
        assert_eq!(report.scores, vec![30., 60., 90.]);
        assert_eq!(env.incumbents().len(), 3);
        assert_eq!(saves, 3);
        assert_eq!(report.best_mean, 90.);
    }

    #[test]
    fn test_checkpoint_only_on_improvement() {
        let env = ScriptedEnv::new(vec![50., 10., 60.]);

        let mut saved: Vec<Vec<f32>> = Vec::new();
        let mut ckpt = |p: &[f32]| -> Result<()> {
            saved.push(p.to_vec());
            Ok(())
        };
        let report = CrossEntropy::new(scripted_config(3))
            .unwrap()
            .run(&env, &mut ckpt)
            .unwrap();

        assert_eq!(report.termination, Termination::BudgetExhausted);
        assert_eq!(report.scores, vec![50., 10., 60.]);
        assert_eq!(report.best_mean, 60.);

        let incumbents = env.incumbents();
        assert_eq!(incumbents.len(), 3);
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0], incumbents[0]);
        assert_eq!(saved[1], incumbents[2]);
        assert_eq!(saved[1], report.incumbent);
    }

    #[test]
    fn test_budget_exhausted() {
        let cfg = TrainingConfig {
            n_iterations: 7,
            ..small_config()
        };
        let env = SphereEnv::new(vec![0.0; 6]);
        let mut saved: Vec<Vec<f32>> = Vec::new();
        let mut ckpt = |p: &[f32]| -> Result<()> {
            saved.push(p.to_vec());
            Ok(())
        };
        let report = CrossEntropy::new(cfg).unwrap().run(&env, &mut ckpt).unwrap();
        assert_eq!(report.termination, Termination::BudgetExhausted);
        assert_eq!(report.iterations, 7);
        assert_eq!(report.scores.len(), 7);
        assert!(!saved.is_empty());
        assert!(saved.iter().all(|p| p.len() == 6));
    }

    #[test]
    fn test_deterministic_runs() {
        let env = SphereEnv::new(vec![2.0, -3.0, 0.0, 1.0]);
        let seq = TrainingConfig {
            parallel: false,
            ..small_config()
        };
        let par = TrainingConfig {
            parallel: true,
            ..small_config()
        };

        let a = CrossEntropy::new(seq.clone()).unwrap().run(&env, &mut NoCheckpoint).unwrap();
        let b = CrossEntropy::new(seq).unwrap().run(&env, &mut NoCheckpoint).unwrap();
        let c = CrossEntropy::new(par).unwrap().run(&env, &mut NoCheckpoint).unwrap();
        assert_eq!(a.scores, b.scores);
        assert_eq!(a.scores, c.scores);
        assert_eq!(a.incumbent, c.incumbent);

        let other = TrainingConfig {
            seed: 7,
            ..small_config()
        };
        let d = CrossEntropy::new(other).unwrap().run(&env, &mut NoCheckpoint).unwrap();
        assert!(a.scores != d.scores);
    }

    #[test]
    fn test_environment_error_aborts() {
        let res = CrossEntropy::new(small_config())
            .unwrap()
            .run(&BrokenEnv, &mut NoCheckpoint);
        match res {
            Err(CemError::Environment(msg)) => assert!(msg.contains("exploded")),
            other => panic!("expected environment error, got {:?}", other.map(|r| r.scores)),
        }
    }

    #[test]
    fn test_invalid_config() {
        let cfg = TrainingConfig {
            pop_size: 3,
            ..TrainingConfig::default()
        };
        assert!(CrossEntropy::new(cfg).is_err());
    }
}
