//! Reading and writing policy checkpoints.
//!
//! A checkpoint is the JSON form of a [`PolicyNetwork`]: its sizes plus the weights
//! and biases of both layers.  Writes go to a temporary file next to the target which
//! is then renamed over it, so a crash mid-write leaves the previous checkpoint intact.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use cem_core::errors::{CemError, Result};
use cem_core::model::{SerDe, WeightUpdater};
use cem_core::optimizer::Checkpoint;

use crate::layout::WeightLayout;
use crate::nn::PolicyNetwork;

impl SerDe for PolicyNetwork {
    type Error = CemError;

    fn save<A: Write>(&self, writer: &mut A) -> Result<()> {
        serde_json::to_writer(writer, &self).map_err(io::Error::from)?;
        Ok(())
    }

    fn load<A: Read>(reader: &mut A) -> Result<Self> {
        let network: PolicyNetwork = serde_json::from_reader(reader).map_err(io::Error::from)?;
        if !network.is_consistent() {
            return Err(CemError::Checkpoint(io::Error::new(
                io::ErrorKind::InvalidData,
                "layer shapes don't match the stored sizes",
            )));
        }
        Ok(network)
    }
}

// Temp files have to live on the same filesystem as the target for the rename
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Atomically replaces `path` with the serialized network
pub fn write_model(network: &PolicyNetwork, path: &Path) -> Result<()> {
    let mut tmp = NamedTempFile::new_in(parent_dir(path))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        network.save(&mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Reads a network from `path`.  When `expected` is given, a checkpoint saved with a
/// different layout is rejected.
pub fn read_model(path: &Path, expected: Option<WeightLayout>) -> Result<PolicyNetwork> {
    let mut reader = BufReader::new(File::open(path)?);
    let network = PolicyNetwork::load(&mut reader)?;
    match expected {
        Some(layout) if layout != network.layout() => Err(CemError::DimensionMismatch {
            expected: layout.dims(),
            actual: network.layout().dims(),
        }),
        _ => Ok(network),
    }
}

/// Writes the incumbent to a single file, overwriting it on every improvement
pub struct FileCheckpoint {
    path: PathBuf,
    network: PolicyNetwork,
}

impl FileCheckpoint {
    /// Creates a checkpoint for networks with the given layout
    pub fn new<P: Into<PathBuf>>(path: P, layout: WeightLayout) -> Self {
        FileCheckpoint {
            path: path.into(),
            network: PolicyNetwork::new(layout.s_size, layout.h_size, layout.a_size),
        }
    }

    /// Where the checkpoint is written
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Checkpoint for FileCheckpoint {
    fn save(&mut self, params: &[f32]) -> Result<()> {
        self.network.set_weights(params)?;
        write_model(&self.network, &self.path)?;
        debug!("Wrote checkpoint to {}", self.path.display());
        Ok(())
    }
}
