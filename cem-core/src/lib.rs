//! CEM-Core
//! ===
//!
//! This library contains the components for searching policy parameters with the
//! Cross-Entropy Method (CEM), a black-box optimizer that needs nothing more than a
//! way to score a flat parameter vector.
//!
//! Cross-Entropy Method
//! ---
//! Each iteration perturbs a single incumbent with isotropic Gaussian noise, scores
//! the resulting population and replaces the incumbent with the mean of the elite
//! fraction.  The undiscounted score of each new incumbent is tracked in a rolling
//! window; improvements of the rolling average are checkpointed and reaching the
//! success threshold stops the search.
//!
//! Simulators
//! ---
//! Scoring usually means rolling a policy out in a simulator.  Simulators are
//! described by the [`sim::Simulatable`] trait so that any reset/step environment,
//! including deterministic fakes, can be plugged in.

#![warn(missing_docs, unused)]

/// Error types
pub mod errors;

/// Training configuration
pub mod config;

/// Defines the interfaces for models and noise sampling.
pub mod model;

/// Defines interfaces for Environments, checkpoints and optimizers
pub mod optimizer;

/// Defines the simulator interface
pub mod sim;

/// Rolling average over recent scores
pub mod window;

/// Defines the Cross-Entropy Method optimizer
pub mod cross_entropy;

pub use crate::config::TrainingConfig;
pub use crate::errors::{CemError, Result};
