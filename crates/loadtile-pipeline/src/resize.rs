//! Canonical resize: stretch any source to the fixed background resolution.
//!
//! The game expects a 1024x768 background, so every source is resampled
//! to exactly that size. Aspect ratio is not preserved; wide or tall
//! sources are squashed to fit.

use std::fmt;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::types::{CanonicalImage, Dimensions};

/// Resampling filter used for the canonical resize.
///
/// Ordered from fastest/lowest-quality to slowest/highest-quality.
/// All variants are deterministic, so re-running with the same input
/// and filter yields identical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeFilter {
    /// Nearest-neighbor: fastest, blocky artifacts.
    Nearest,
    /// Bilinear interpolation: fast, decent quality.
    Triangle,
    /// Bicubic (Catmull-Rom): moderate speed, good quality.
    CatmullRom,
    /// Gaussian: moderate speed, smooth output.
    Gaussian,
    /// Lanczos with 3 lobes: slowest, sharpest/best for photos.
    #[default]
    Lanczos3,
}

impl ResizeFilter {
    /// Convert to the `image` crate's `FilterType`.
    const fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            Self::Nearest => image::imageops::FilterType::Nearest,
            Self::Triangle => image::imageops::FilterType::Triangle,
            Self::CatmullRom => image::imageops::FilterType::CatmullRom,
            Self::Gaussian => image::imageops::FilterType::Gaussian,
            Self::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for ResizeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => f.write_str("Nearest"),
            Self::Triangle => f.write_str("Triangle"),
            Self::CatmullRom => f.write_str("CatmullRom"),
            Self::Gaussian => f.write_str("Gaussian"),
            Self::Lanczos3 => f.write_str("Lanczos3"),
        }
    }
}

/// Resample `image` to exactly `target`, converting to 8-bit RGB.
///
/// Alpha is dropped and 16-bit/float sources are narrowed so every tile
/// can be stored as a 24-bit TGA. A source that already has the target
/// size is only converted, not resampled.
#[must_use]
pub fn canonicalize(
    image: &DynamicImage,
    target: Dimensions,
    filter: ResizeFilter,
) -> CanonicalImage {
    let rgb = image.to_rgb8();
    if rgb.dimensions() == (target.width, target.height) {
        return CanonicalImage::new(rgb);
    }

    let resized = image::imageops::resize(
        &rgb,
        target.width,
        target.height,
        filter.to_image_filter(),
    );
    CanonicalImage::new(resized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            w,
            h,
            image::Rgba([128, 128, 128, 255]),
        ))
    }

    #[test]
    fn default_filter_is_lanczos() {
        assert_eq!(ResizeFilter::default(), ResizeFilter::Lanczos3);
    }

    #[test]
    fn any_source_becomes_canonical() {
        for (w, h) in [(1920, 1080), (512, 512), (100, 900), (1, 1)] {
            let canonical = canonicalize(
                &test_image(w, h),
                Dimensions::CANONICAL,
                ResizeFilter::Triangle,
            );
            assert_eq!(
                canonical.dimensions(),
                Dimensions::new(1024, 768),
                "source {w}x{h}",
            );
        }
    }

    #[test]
    fn lanczos_output_is_canonical() {
        let canonical = canonicalize(
            &test_image(300, 200),
            Dimensions::CANONICAL,
            ResizeFilter::Lanczos3,
        );
        assert_eq!(canonical.dimensions(), Dimensions::CANONICAL);
    }

    #[test]
    fn exact_size_source_is_not_resampled() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_fn(1024, 768, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 7])
        }));
        let canonical = canonicalize(&img, Dimensions::CANONICAL, ResizeFilter::Lanczos3);
        assert_eq!(canonical.image(), &img.to_rgb8());
    }

    #[test]
    fn stretch_does_not_letterbox() {
        // A tall red source must fill the whole canvas, corners included.
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            100,
            900,
            image::Rgb([200, 0, 0]),
        ));
        let canonical = canonicalize(&img, Dimensions::CANONICAL, ResizeFilter::Triangle);
        for (x, y) in [(0, 0), (1023, 0), (0, 767), (1023, 767), (512, 384)] {
            assert_eq!(canonical.image().get_pixel(x, y).0, [200, 0, 0]);
        }
    }

    #[test]
    fn alpha_is_dropped() {
        let canonical = canonicalize(
            &test_image(8, 8),
            Dimensions::new(4, 4),
            ResizeFilter::Nearest,
        );
        assert_eq!(canonical.image().get_pixel(0, 0).0, [128, 128, 128]);
    }

    #[test]
    fn resize_is_deterministic() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_fn(97, 53, |x, y| {
            image::Rgb([(x * 2) as u8, (y * 4) as u8, ((x + y) % 256) as u8])
        }));
        let a = canonicalize(&img, Dimensions::CANONICAL, ResizeFilter::Lanczos3);
        let b = canonicalize(&img, Dimensions::CANONICAL, ResizeFilter::Lanczos3);
        assert_eq!(a, b);
    }

    #[test]
    fn display_names() {
        assert_eq!(ResizeFilter::Lanczos3.to_string(), "Lanczos3");
        assert_eq!(ResizeFilter::CatmullRom.to_string(), "CatmullRom");
    }
}
