use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes `iteration,score` rows, 1-based, for plotting the learning curve
pub fn write_scores(path: &Path, scores: &[f32]) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "iteration,score")?;
    for (i, s) in scores.iter().enumerate() {
        writeln!(w, "{},{}", i + 1, s)?;
    }
    w.flush()
}
