//! Error conditions shared by the optimizer, the policy models and the simulators
use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
/// Everything that can go wrong while searching for a policy
pub enum CemError {
    /// A parameter vector or observation did not have the length the network expects
    #[error("dimension mismatch: expected {expected} values, got {actual}")]
    DimensionMismatch {
        /// Length required by the network
        expected: usize,
        /// Length that was provided
        actual: usize,
    },

    /// The simulator failed during reset or step.  There is no recovery path; the
    /// current training run is aborted.
    #[error("environment error: {0}")]
    Environment(String),

    /// Reading or writing a checkpoint failed
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] io::Error),

    /// The training configuration can't be run
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result alias used throughout the workspace
pub type Result<T> = std::result::Result<T, CemError>;
