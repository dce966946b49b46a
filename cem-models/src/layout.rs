//! Maps between flat parameter vectors and the layers of a [`PolicyNetwork`].
//!
//! The flat layout is, in order:
//!
//! 1. layer 1 weights, an `s x h` matrix in row-major order, so the weight from
//!    input `i` to hidden unit `j` sits at `i * h + j`
//! 2. layer 1 biases (`h`)
//! 3. layer 2 weights, an `h x a` matrix in row-major order
//! 4. layer 2 biases (`a`)
//!
//! Layers store one row per output unit, so decoding transposes the matrices.

use std::ops::Range;

use cem_core::errors::{CemError, Result};

use crate::nn::PolicyNetwork;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Sizes of a state -> hidden -> action network
pub struct WeightLayout {
    /// Observation dimensions
    pub s_size: usize,
    /// Hidden units
    pub h_size: usize,
    /// Action dimensions
    pub a_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Offsets of the four sections within a flat parameter vector
pub struct Sections {
    /// Layer 1 weights
    pub fc1_w: Range<usize>,
    /// Layer 1 biases
    pub fc1_b: Range<usize>,
    /// Layer 2 weights
    pub fc2_w: Range<usize>,
    /// Layer 2 biases
    pub fc2_b: Range<usize>,
}

// Copies a row-major (inputs x outputs) matrix into rows per output
fn read_matrix(src: &[f32], outputs: usize, rows: &mut [Vec<f32>]) -> () {
    for (o, row) in rows.iter_mut().enumerate() {
        for (i, w) in row.iter_mut().enumerate() {
            *w = src[i * outputs + o];
        }
    }
}

// Inverse of `read_matrix`
fn write_matrix(rows: &[Vec<f32>], outputs: usize, dst: &mut [f32]) -> () {
    for (o, row) in rows.iter().enumerate() {
        for (i, w) in row.iter().enumerate() {
            dst[i * outputs + o] = *w;
        }
    }
}

impl WeightLayout {
    /// Creates a new layout
    pub fn new(s_size: usize, h_size: usize, a_size: usize) -> Self {
        WeightLayout {
            s_size,
            h_size,
            a_size,
        }
    }

    /// Total length `D = (s + 1) * h + (h + 1) * a`
    pub fn dims(&self) -> usize {
        (self.s_size + 1) * self.h_size + (self.h_size + 1) * self.a_size
    }

    /// Where each section starts and ends
    pub fn sections(&self) -> Sections {
        let fc1_w = 0..self.s_size * self.h_size;
        let fc1_b = fc1_w.end..fc1_w.end + self.h_size;
        let fc2_w = fc1_b.end..fc1_b.end + self.h_size * self.a_size;
        let fc2_b = fc2_w.end..fc2_w.end + self.a_size;
        Sections {
            fc1_w,
            fc1_b,
            fc2_w,
            fc2_b,
        }
    }

    /// Fails with `DimensionMismatch` unless `weights` has exactly `dims()` values
    pub fn check(&self, weights: &[f32]) -> Result<()> {
        if weights.len() != self.dims() {
            return Err(CemError::DimensionMismatch {
                expected: self.dims(),
                actual: weights.len(),
            });
        }
        Ok(())
    }

    /// Slices `weights` into the network's layers.  The network is left untouched when
    /// the length is wrong.
    pub fn decode(&self, weights: &[f32], network: &mut PolicyNetwork) -> Result<()> {
        self.check(weights)?;
        if network.layout() != *self {
            return Err(CemError::DimensionMismatch {
                expected: network.layout().dims(),
                actual: self.dims(),
            });
        }

        let sec = self.sections();
        let (fc1, fc2) = network.layers_mut();
        read_matrix(&weights[sec.fc1_w], self.h_size, &mut fc1.w);
        fc1.bias.copy_from_slice(&weights[sec.fc1_b]);
        read_matrix(&weights[sec.fc2_w], self.a_size, &mut fc2.w);
        fc2.bias.copy_from_slice(&weights[sec.fc2_b]);
        Ok(())
    }

    /// Flattens the network's layers back into a parameter vector
    pub fn encode(&self, network: &PolicyNetwork) -> Vec<f32> {
        let sec = self.sections();
        let mut out = vec![0f32; self.dims()];
        write_matrix(&network.fc1().w, self.h_size, &mut out[sec.fc1_w]);
        out[sec.fc1_b].copy_from_slice(&network.fc1().bias);
        write_matrix(&network.fc2().w, self.a_size, &mut out[sec.fc2_w]);
        out[sec.fc2_b].copy_from_slice(&network.fc2().bias);
        out
    }
}
