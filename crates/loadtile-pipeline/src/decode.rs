//! Image decoding.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, TGA, WebP, GIF) and produces a
//! [`DynamicImage`] in whatever color mode the source uses. This is the
//! first step in the pipeline: raw bytes in, pixels out.

use image::{DynamicImage, ImageFormat};

use crate::types::PipelineError;

/// Decode raw image bytes.
///
/// The format is sniffed from the leading bytes. TGA files carry no
/// magic number, so when sniffing fails the caller-supplied `hint`
/// (usually derived from the file extension) is tried instead.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the format is unrecognized
/// or the data is corrupt.
pub fn decode(bytes: &[u8], hint: Option<ImageFormat>) -> Result<DynamicImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let format = match (image::guess_format(bytes), hint) {
        (Ok(format), _) | (Err(_), Some(format)) => format,
        (Err(e), None) => return Err(e.into()),
    };
    Ok(image::load_from_memory_with_format(bytes, format)?)
}
