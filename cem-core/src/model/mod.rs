pub mod sampler;

use std::io::{Read, Write};

use crate::errors::Result;

/// Evaluates a model with a given payload to a given output
pub trait Evaluator<Payload: ?Sized, Output: ?Sized>: Sync {
    fn evaluate(&self, payload: &Payload) -> Output;
}

/// Moves a model's weights in and out of a flat parameter vector
pub trait WeightUpdater {
    /// Length of the flat parameter vector
    fn num_weights(&self) -> usize;

    /// Overwrites every weight from `weights`.  Fails without touching the model if
    /// the length doesn't match `num_weights`.
    fn set_weights(&mut self, weights: &[f32]) -> Result<()>;

    /// Reads the weights back out in the same order `set_weights` consumes them
    fn get_weights(&self) -> Vec<f32>;
}

/// Serialization for models
pub trait SerDe: Sized {
    /// Error conditions due to writing
    type Error;

    /// Writes out a model to writer
    fn save<A: Write>(&self, writer: &mut A) -> std::result::Result<(), Self::Error>;

    /// Loads a model from a reader.  All necessary metadata should be
    /// stored within the model
    fn load<A: Read>(reader: &mut A) -> std::result::Result<Self, Self::Error>;
}
