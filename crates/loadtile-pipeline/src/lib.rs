//! loadtile-pipeline: Pure tile generation pipeline (sans-IO).
//!
//! Turns a source image into the tiles of a GoldSrc loading background:
//! decode -> stretch to 1024x768 -> cut into a 4x3 grid of 256px tiles ->
//! name each tile `800_{row}_{column}_loading.tga`.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and hands tiles to a [`TileSink`]. Writing tiles to disk
//! lives in `loadtile-io`.

pub mod decode;
pub mod grid;
pub mod naming;
pub mod pipeline;
pub mod progress;
pub mod resize;
pub mod sink;
pub mod types;

pub use grid::{GridSpec, Tile, TileRect};
pub use naming::{TileNaming, column_letter};
pub use pipeline::{Pipeline, Preview, Sliced};
pub use progress::{CleanupOutcome, NoProgress, Progress, ProgressEvent};
pub use resize::ResizeFilter;
pub use sink::{CollectSink, TileSink};
pub use types::{
    CANONICAL_HEIGHT, CANONICAL_WIDTH, CanonicalImage, Dimensions, ImageFormat, PipelineConfig,
    PipelineError, RgbImage,
};

/// Decode, canonicalize and slice `image_bytes` without writing anything.
///
/// Returns the canonical image and the unwritten tiles with their
/// would-be file names, for display.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image cannot be decoded.
/// Returns [`PipelineError::Configuration`] if `config.grid` does not
/// partition `config.canonical`.
pub fn preview(
    image_bytes: Vec<u8>,
    hint: Option<ImageFormat>,
    config: &PipelineConfig,
    progress: &mut impl Progress,
) -> Result<Preview, PipelineError> {
    Ok(run(image_bytes, hint, config, progress)?.into_preview())
}

/// Run every stage up to and including slicing.
///
/// The returned [`Sliced`] stage can be written to any [`TileSink`].
///
/// # Errors
///
/// Same as [`preview`].
pub fn run(
    image_bytes: Vec<u8>,
    hint: Option<ImageFormat>,
    config: &PipelineConfig,
    progress: &mut impl Progress,
) -> Result<Sliced, PipelineError> {
    config.grid.validate(config.canonical)?;
    Pipeline::new(image_bytes, hint, config.clone())
        .decode(progress)?
        .canonicalize(progress)
        .slice(progress)
}
