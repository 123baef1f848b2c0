//! Incremental pipeline: advance stage-by-stage, inspecting each
//! intermediate result before continuing.
//!
//! ```rust
//! # use loadtile_pipeline::{NoProgress, Pipeline, PipelineConfig, PipelineError};
//! # fn run(png: Vec<u8>) -> Result<(), PipelineError> {
//! let mut progress = NoProgress;
//! let sliced = Pipeline::new(png, None, PipelineConfig::default())
//!     .decode(&mut progress)?
//!     .canonicalize(&mut progress)
//!     .slice(&mut progress)?;
//!
//! let preview = sliced.into_preview();
//! assert_eq!(preview.tiles.len(), 12);
//! # Ok(())
//! # }
//! ```
//!
//! Each stage method consumes `self` and returns the next pipeline state
//! (or `Result` for fallible stages). The final [`Sliced`] stage can
//! either hand its tiles to a [`TileSink`] or become a [`Preview`].

use image::{DynamicImage, ImageFormat};

use crate::grid::Tile;
use crate::progress::{Progress, ProgressEvent};
use crate::sink::{TileSink, emit};
use crate::types::{CanonicalImage, PipelineConfig, PipelineError};

/// Entry point for a staged run.
pub struct Pipeline;

impl Pipeline {
    /// Start a run over raw source bytes.
    ///
    /// `hint` is the format to assume when the bytes cannot be sniffed
    /// (TGA), typically taken from the file extension.
    #[allow(clippy::new_ret_no_self)]
    pub const fn new(
        source: Vec<u8>,
        hint: Option<ImageFormat>,
        config: PipelineConfig,
    ) -> Pending {
        Pending {
            config,
            source,
            hint,
        }
    }
}

// ───────────────────────── Stage 0: Pending ──────────────────────────

/// Pipeline state before any processing has occurred.
#[must_use = "pipeline stages are consumed by advancing — call .decode() to continue"]
pub struct Pending {
    config: PipelineConfig,
    source: Vec<u8>,
    hint: Option<ImageFormat>,
}

impl Pending {
    /// The raw source image bytes.
    #[must_use]
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// Decode the source image and advance to the [`Decoded`] stage.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] if the source bytes are
    /// empty. Returns [`PipelineError::ImageDecode`] if the image
    /// format is unrecognized or the data is corrupt.
    pub fn decode(self, progress: &mut impl Progress) -> Result<Decoded, PipelineError> {
        let image = crate::decode::decode(&self.source, self.hint)?;
        progress.report(&ProgressEvent::Decoded {
            width: image.width(),
            height: image.height(),
        });
        Ok(Decoded {
            config: self.config,
            image,
        })
    }
}

// ───────────────────────── Stage 1: Decoded ──────────────────────────

/// Pipeline state after decoding the source image.
#[must_use = "pipeline stages are consumed by advancing — call .canonicalize() to continue"]
pub struct Decoded {
    config: PipelineConfig,
    image: DynamicImage,
}

impl Decoded {
    /// The decoded source image, in its original color mode.
    #[must_use]
    pub const fn source(&self) -> &DynamicImage {
        &self.image
    }

    /// Stretch the source to the canonical resolution.
    pub fn canonicalize(self, progress: &mut impl Progress) -> Canonicalized {
        let canonical = crate::resize::canonicalize(
            &self.image,
            self.config.canonical,
            self.config.filter,
        );
        let dimensions = canonical.dimensions();
        progress.report(&ProgressEvent::Canonicalized {
            width: dimensions.width,
            height: dimensions.height,
        });
        Canonicalized {
            config: self.config,
            canonical,
        }
    }
}

// ───────────────────────── Stage 2: Canonicalized ────────────────────

/// Pipeline state after resizing to the canonical resolution.
#[must_use = "pipeline stages are consumed by advancing — call .slice() to continue"]
pub struct Canonicalized {
    config: PipelineConfig,
    canonical: CanonicalImage,
}

impl Canonicalized {
    /// The canonical image.
    #[must_use]
    pub const fn canonical(&self) -> &CanonicalImage {
        &self.canonical
    }

    /// Cut the canonical image into tiles.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] if the configured grid
    /// does not exactly partition the canonical image.
    pub fn slice(self, progress: &mut impl Progress) -> Result<Sliced, PipelineError> {
        let tiles = crate::grid::slice(&self.canonical, &self.config.grid)?;
        progress.report(&ProgressEvent::Sliced { tiles: tiles.len() });
        Ok(Sliced {
            config: self.config,
            canonical: self.canonical,
            tiles,
        })
    }
}

// ───────────────────────── Stage 3: Sliced ───────────────────────────

/// Pipeline state after slicing; tiles are ready for a sink.
#[must_use = "call .write_to() or .into_preview() to use the tiles"]
pub struct Sliced {
    config: PipelineConfig,
    canonical: CanonicalImage,
    tiles: Vec<Tile>,
}

impl Sliced {
    /// The canonical image the tiles were cut from.
    #[must_use]
    pub const fn canonical(&self) -> &CanonicalImage {
        &self.canonical
    }

    /// Tiles in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Hand every tile to `sink` under its mapped name.
    ///
    /// Returns the canonical image alongside the sink's output so the
    /// caller can reuse it without decoding the source again.
    ///
    /// # Errors
    ///
    /// Returns the sink's error from the first tile it rejects.
    pub fn write_to<S: TileSink>(
        self,
        sink: S,
        progress: &mut impl Progress,
    ) -> Result<(CanonicalImage, S::Output), S::Error> {
        let output = emit(
            &self.tiles,
            &self.config.grid,
            &self.config.naming,
            sink,
            progress,
        )?;
        Ok((self.canonical, output))
    }

    /// Keep the canonical image and tiles for display.
    pub fn into_preview(self) -> Preview {
        let names = self.config.naming.names(&self.config.grid);
        Preview {
            canonical: self.canonical,
            tiles: self.tiles,
            names,
        }
    }
}

/// Canonical image and unwritten tiles, owned by the caller.
#[derive(Debug, Clone)]
pub struct Preview {
    /// The canonical image.
    pub canonical: CanonicalImage,
    /// Tiles in row-major order.
    pub tiles: Vec<Tile>,
    /// File name each tile would be written under, index-aligned.
    pub names: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::ImageEncoder;

    use super::*;
    use crate::grid::GridSpec;
    use crate::progress::NoProgress;
    use crate::sink::CollectSink;
    use crate::types::Dimensions;

    fn gradient_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut buf = Vec::new();
        image::codecs::png::PngEncoder::new(&mut buf)
            .write_image(
                img.as_raw(),
                img.width(),
                img.height(),
                image::ExtendedColorType::Rgb8,
            )
            .unwrap();
        buf
    }

    #[test]
    fn stages_expose_intermediates() {
        let mut progress = NoProgress;
        let decoded = Pipeline::new(gradient_png(40, 30), None, PipelineConfig::default())
            .decode(&mut progress)
            .unwrap();
        assert_eq!(decoded.source().width(), 40);

        let canonicalized = decoded.canonicalize(&mut progress);
        assert_eq!(canonicalized.canonical().dimensions(), Dimensions::CANONICAL);

        let sliced = canonicalized.slice(&mut progress).unwrap();
        assert_eq!(sliced.tiles().len(), 12);
        assert_eq!(sliced.canonical().dimensions(), Dimensions::CANONICAL);
    }

    #[test]
    fn events_follow_stage_order() {
        let mut stages = Vec::new();
        let mut progress = |event: &ProgressEvent| stages.push(event.stage());
        Pipeline::new(gradient_png(8, 8), None, PipelineConfig::default())
            .decode(&mut progress)
            .unwrap()
            .canonicalize(&mut progress)
            .slice(&mut progress)
            .unwrap()
            .write_to(CollectSink::new(), &mut progress)
            .unwrap();

        let mut expected = vec!["decode", "resize", "slice"];
        expected.extend(std::iter::repeat_n("write", 12));
        assert_eq!(stages, expected);
    }

    #[test]
    fn write_to_returns_canonical_image() {
        let mut progress = NoProgress;
        let (canonical, collected) =
            Pipeline::new(gradient_png(8, 8), None, PipelineConfig::default())
                .decode(&mut progress)
                .unwrap()
                .canonicalize(&mut progress)
                .slice(&mut progress)
                .unwrap()
                .write_to(CollectSink::new(), &mut progress)
                .unwrap();
        assert_eq!(canonical.dimensions(), Dimensions::CANONICAL);
        assert_eq!(collected.len(), 12);
    }

    #[test]
    fn corrupt_source_stops_at_decode() {
        let mut events = 0;
        let result = Pipeline::new(vec![1, 2, 3, 4], None, PipelineConfig::default())
            .decode(&mut |_: &ProgressEvent| events += 1);
        assert!(matches!(result, Err(PipelineError::ImageDecode(_))));
        assert_eq!(events, 0);
    }

    #[test]
    fn broken_grid_stops_at_slice() {
        let config = PipelineConfig {
            grid: GridSpec {
                columns: 3,
                ..GridSpec::LOADING_BACKGROUND
            },
            ..PipelineConfig::default()
        };
        let mut progress = NoProgress;
        let result = Pipeline::new(gradient_png(8, 8), None, config)
            .decode(&mut progress)
            .unwrap()
            .canonicalize(&mut progress)
            .slice(&mut progress);
        assert!(matches!(result, Err(PipelineError::Configuration(_))));
    }

    #[test]
    fn preview_names_align_with_tiles() {
        let mut progress = NoProgress;
        let preview = Pipeline::new(gradient_png(16, 16), None, PipelineConfig::default())
            .decode(&mut progress)
            .unwrap()
            .canonicalize(&mut progress)
            .slice(&mut progress)
            .unwrap()
            .into_preview();
        assert_eq!(preview.names.len(), preview.tiles.len());
        assert_eq!(preview.names[4], "800_2_a_loading.tga");
        assert_eq!(preview.tiles[4].label(), "2a");
    }
}
