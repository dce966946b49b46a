//! Library defining the policy network and how it is scored
#![warn(missing_docs, unused)]

#[macro_use]
extern crate serde_derive;

/// Reading and writing checkpoints
pub mod checkpoint;
/// Flat parameter vector layout
pub mod layout;
/// Defines the policy network
pub mod nn;
/// Rolls policies out in a simulator
pub mod policy;

pub use crate::layout::WeightLayout;
pub use crate::nn::PolicyNetwork;
pub use crate::policy::PolicyEvaluator;
