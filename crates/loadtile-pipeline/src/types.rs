//! Shared types for the loadtile pipeline.

use serde::{Deserialize, Serialize};

use crate::grid::GridSpec;
use crate::naming::TileNaming;
use crate::resize::ResizeFilter;

/// Re-export `RgbImage` so downstream crates can reference tile and
/// canonical pixel data without depending on `image` directly.
pub use image::RgbImage;

/// Re-export `ImageFormat` for decode hints.
pub use image::ImageFormat;

/// Width of every canonical image in pixels.
pub const CANONICAL_WIDTH: u32 = 1024;

/// Height of every canonical image in pixels.
pub const CANONICAL_HEIGHT: u32 = 768;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// The fixed resolution every source is stretched to before slicing.
    pub const CANONICAL: Self = Self {
        width: CANONICAL_WIDTH,
        height: CANONICAL_HEIGHT,
    };

    /// Create new dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A source image resampled to the canonical resolution.
///
/// Only [`canonicalize`](crate::resize::canonicalize) constructs this
/// type, so the pixel buffer always has the dimensions it was resized
/// to (1024x768 in every shipped configuration). Pixels are 8-bit RGB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalImage(RgbImage);

impl CanonicalImage {
    pub(crate) const fn new(image: RgbImage) -> Self {
        Self(image)
    }

    /// The underlying pixel buffer.
    #[must_use]
    pub const fn image(&self) -> &RgbImage {
        &self.0
    }

    /// Pixel dimensions.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.0.width(), self.0.height())
    }

    /// Consumes the canonical image and returns the pixel buffer.
    #[must_use]
    pub fn into_inner(self) -> RgbImage {
        self.0
    }
}

/// Configuration for the tile generation pipeline.
///
/// The default is the Counter-Strike 1.6 loading background scheme:
/// 1024x768 canonical image, 4x3 grid of 256px tiles, `800_*_loading.tga`
/// names, Lanczos resampling. Only the resampling filter is exposed to
/// users; the grid and naming scheme are dictated by the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Resolution the source is stretched to.
    pub canonical: Dimensions,

    /// How the canonical image is partitioned.
    pub grid: GridSpec,

    /// How tile positions map to file names.
    pub naming: TileNaming,

    /// Resampling filter for the canonical resize.
    pub filter: ResizeFilter,
}

impl PipelineConfig {
    /// Default resampling filter.
    pub const DEFAULT_FILTER: ResizeFilter = ResizeFilter::Lanczos3;
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            canonical: Dimensions::CANONICAL,
            grid: GridSpec::LOADING_BACKGROUND,
            naming: TileNaming::LOADING_BACKGROUND,
            filter: Self::DEFAULT_FILTER,
        }
    }
}

/// Errors that can occur in the tile generation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// The grid does not exactly partition the canonical image.
    ///
    /// Indicates broken constants rather than bad user input.
    #[error("invalid grid configuration: {0}")]
    Configuration(String),
}

impl PipelineError {
    /// Whether this error means the source could not be turned into pixels.
    #[must_use]
    pub const fn is_decode_failure(&self) -> bool {
        matches!(self, Self::ImageDecode(_) | Self::EmptyInput)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_loading_background() {
        let config = PipelineConfig::default();
        assert_eq!(config.canonical, Dimensions::new(1024, 768));
        assert_eq!(config.grid, GridSpec::LOADING_BACKGROUND);
        assert_eq!(config.naming, TileNaming::LOADING_BACKGROUND);
        assert_eq!(config.filter, ResizeFilter::Lanczos3);
    }

    #[test]
    fn config_serde_round_trip() {
        let config = PipelineConfig {
            filter: ResizeFilter::Triangle,
            ..PipelineConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn decode_failures_are_classified() {
        assert!(PipelineError::EmptyInput.is_decode_failure());
        assert!(!PipelineError::Configuration("x".into()).is_decode_failure());
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            PipelineError::EmptyInput.to_string(),
            "input image data is empty"
        );
        assert_eq!(
            PipelineError::Configuration("4 x 300 != 1024".into()).to_string(),
            "invalid grid configuration: 4 x 300 != 1024"
        );
    }
}
