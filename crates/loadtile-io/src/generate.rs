//! Path-based entry points: read a source file, run the pipeline, and
//! write (or just preview) the tiles.

use std::fs;
use std::path::{Path, PathBuf};

use loadtile_pipeline::{
    CanonicalImage, CleanupOutcome, ImageFormat, PipelineConfig, Preview, Progress,
};

use crate::error::GenerateError;
use crate::writer::TileWriter;

/// Result of a successful [`generate`] run.
#[derive(Debug, Clone)]
pub struct Generated {
    /// The canonical image the tiles were cut from, for reuse (preview).
    pub canonical: CanonicalImage,
    /// Final tile paths, in index order.
    pub written: Vec<PathBuf>,
    /// What happened to the staging directory.
    pub cleanup: CleanupOutcome,
}

/// Read a source image and guess its format from the extension.
fn read_source(path: &Path) -> Result<(Vec<u8>, Option<ImageFormat>), GenerateError> {
    let bytes = fs::read(path).map_err(|source| GenerateError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((bytes, ImageFormat::from_path(path).ok()))
}

/// Turn `source_path` into tiles under `output_dir`.
///
/// Decodes the source, stretches it to the canonical resolution, cuts
/// it into the configured grid and writes every tile under its mapped
/// name. Re-running with the same inputs overwrites the same files with
/// identical bytes.
///
/// # Errors
///
/// Returns [`GenerateError::Read`] or [`GenerateError::Pipeline`] if the
/// source cannot be read or decoded; nothing is written in that case.
/// Returns [`GenerateError::Write`] naming the first tile that could not
/// be written; tiles before it remain on disk.
pub fn generate(
    source_path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &PipelineConfig,
    progress: &mut impl Progress,
) -> Result<Generated, GenerateError> {
    let source_path = source_path.as_ref();
    let output_dir = output_dir.as_ref();

    log::info!("Opening image: {}", source_path.display());
    let (bytes, hint) = read_source(source_path)?;
    let sliced = loadtile_pipeline::run(bytes, hint, config, progress)?;
    let (canonical, written) = sliced.write_to(TileWriter::new(output_dir), progress)?;

    Ok(Generated {
        canonical,
        written: written.paths,
        cleanup: written.cleanup,
    })
}

/// Decode and slice `source_path` without touching the filesystem
/// beyond reading the source.
///
/// # Errors
///
/// Returns [`GenerateError::Read`] or [`GenerateError::Pipeline`] if the
/// source cannot be read or decoded.
pub fn preview(
    source_path: impl AsRef<Path>,
    config: &PipelineConfig,
    progress: &mut impl Progress,
) -> Result<Preview, GenerateError> {
    let (bytes, hint) = read_source(source_path.as_ref())?;
    Ok(loadtile_pipeline::preview(bytes, hint, config, progress)?)
}
