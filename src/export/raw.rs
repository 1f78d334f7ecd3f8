//! Headerless PCM export
//!
//! Samples are written as consecutive signed 16-bit little-endian values,
//! interleaved when stereo.

use super::{prepare, ExportConfig};
use crate::{Result, Sn76489Error};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write rendered samples as raw 16-bit little-endian PCM
pub fn write_raw<P: AsRef<Path>>(path: P, samples: &[i16], config: &ExportConfig) -> Result<()> {
    let path = path.as_ref();
    let final_samples = prepare(samples, config)?;

    let write_err = |e: std::io::Error| {
        Sn76489Error::AudioFileError(format!("failed to write '{}': {}", path.display(), e))
    };

    let mut out = BufWriter::new(File::create(path).map_err(write_err)?);
    for sample in &final_samples {
        out.write_all(&sample.to_le_bytes()).map_err(write_err)?;
    }
    out.flush().map_err(write_err)?;

    log::info!(
        "Wrote {} bytes of raw PCM to {}",
        final_samples.len() * 2,
        path.display()
    );
    Ok(())
}
