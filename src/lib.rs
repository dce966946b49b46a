//! CEM
//!
//! CEM is a library and a pair of executables to train small policy networks with the
//! cross-entropy method and replay the results.
#![warn(missing_docs, unused)]

#[macro_use]
extern crate clap;

/// Tools for binaries
pub mod bin_utils;
/// Simulators
pub mod gym;
