//! Simulators policies can be trained in
mod mountain_car;

pub use self::mountain_car::{MountainCarContinuous, MAX_EPISODE_STEPS};

#[cfg(test)]
mod test_training {
    use super::*;
    use cem_core::config::TrainingConfig;
    use cem_core::cross_entropy::CrossEntropy;
    use cem_core::optimizer::{NoCheckpoint, Optimizer, Termination, TrainingReport};
    use cem_models::checkpoint::{read_model, FileCheckpoint};
    use cem_models::{PolicyEvaluator, WeightLayout};

    fn config(parallel: bool) -> TrainingConfig {
        TrainingConfig {
            n_iterations: 3,
            max_t: 200,
            eval_max_t: 300,
            pop_size: 50,
            elite_frac: 0.2,
            sigma: 0.5,
            seed: 101,
            parallel: parallel,
            ..TrainingConfig::default()
        }
    }

    fn train(parallel: bool) -> TrainingReport {
        let evaluator = PolicyEvaluator::new(MountainCarContinuous::new(101), 16);
        CrossEntropy::new(config(parallel))
            .unwrap()
            .run(&evaluator, &mut NoCheckpoint)
            .unwrap()
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let a = train(false);
        let b = train(false);
        assert_eq!(a.scores.len(), 3);
        assert_eq!(a.termination, Termination::BudgetExhausted);
        assert!(a.scores.iter().all(|s| s.is_finite()));
        assert_eq!(a.scores, b.scores);
        assert_eq!(a.incumbent, b.incumbent);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let a = train(false);
        let b = train(true);
        assert_eq!(a.scores, b.scores);
        assert_eq!(a.incumbent.len(), 65);
        assert_eq!(a.incumbent, b.incumbent);
    }

    #[test]
    fn test_checkpoint_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoint.json");
        let evaluator = PolicyEvaluator::new(MountainCarContinuous::new(101), 16);
        let layout = evaluator.layout();
        assert_eq!(layout, WeightLayout::new(2, 16, 1));

        let mut checkpoint = FileCheckpoint::new(&path, layout);
        let report = CrossEntropy::new(config(true))
            .unwrap()
            .run(&evaluator, &mut checkpoint)
            .unwrap();

        let network = read_model(&path, Some(layout)).unwrap();
        assert_eq!(network.layout(), layout);
        assert!(report.best_mean.is_finite());
    }
}
