//! Defines methods that can be shared by the training and replay binaries

/// Methods for reading arguments
pub mod args;
/// Logging setup
pub mod logging;
/// Structs to capture model parameters
pub mod model_params;
/// Writes the learning curve
pub mod report;
