//! Writing tiles to disk.
//!
//! Each tile is encoded into `<output>/tiles/tile_NN.<ext>` and then
//! renamed to its final name directly under `<output>`, so a final name
//! never holds a half-written file. The staging directory is removed
//! once every tile is in place.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ExtendedColorType, ImageEncoder, ImageFormat};
use loadtile_pipeline::{CleanupOutcome, Progress, ProgressEvent, RgbImage, Tile, TileSink};

use crate::error::{WriteError, WriteStep};

/// Name of the transient staging directory inside the output directory.
pub const STAGING_DIR: &str = "tiles";

/// [`TileSink`] that stores tiles as image files.
#[derive(Debug)]
pub struct TileWriter {
    output_dir: PathBuf,
    staging_dir: PathBuf,
    staged: bool,
    written: Vec<PathBuf>,
}

/// What a [`TileWriter`] left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTiles {
    /// Final tile paths, in index order.
    pub paths: Vec<PathBuf>,
    /// What happened to the staging directory.
    pub cleanup: CleanupOutcome,
}

impl TileWriter {
    /// Writer targeting `output_dir`. Nothing is created until the first
    /// tile arrives.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        let staging_dir = output_dir.join(STAGING_DIR);
        Self {
            output_dir,
            staging_dir,
            staged: false,
            written: Vec::new(),
        }
    }

    /// Directory the tiles end up in.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Transient directory tiles are encoded into.
    #[must_use]
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Create the output and staging directories on first use.
    fn ensure_staging(&mut self, index: usize, name: &str) -> Result<(), WriteError> {
        if self.staged {
            return Ok(());
        }
        fs::create_dir_all(&self.staging_dir).map_err(|source| WriteError::Io {
            index,
            name: name.to_owned(),
            step: WriteStep::CreateDirectory,
            path: self.staging_dir.clone(),
            source,
        })?;
        log::debug!("Staging tiles in {}", self.staging_dir.display());
        self.staged = true;
        Ok(())
    }
}

impl TileSink for TileWriter {
    type Output = WrittenTiles;
    type Error = WriteError;

    fn accept(&mut self, tile: &Tile, name: &str) -> Result<(), WriteError> {
        let encode_error = |source| WriteError::Encode {
            index: tile.index,
            name: name.to_owned(),
            source,
        };
        let format = ImageFormat::from_path(name).map_err(encode_error)?;
        let bytes = encode(&tile.image, format).map_err(encode_error)?;

        self.ensure_staging(tile.index, name)?;

        let extension = format.extensions_str().first().copied().unwrap_or("img");
        let staged = self
            .staging_dir
            .join(format!("tile_{:02}.{extension}", tile.index));
        fs::write(&staged, &bytes).map_err(|source| WriteError::Io {
            index: tile.index,
            name: name.to_owned(),
            step: WriteStep::WriteStaged,
            path: staged.clone(),
            source,
        })?;

        let target = self.output_dir.join(name);
        fs::rename(&staged, &target).map_err(|source| WriteError::Io {
            index: tile.index,
            name: name.to_owned(),
            step: WriteStep::Rename,
            path: target.clone(),
            source,
        })?;

        self.written.push(target);
        Ok(())
    }

    fn finish(self, progress: &mut impl Progress) -> Result<WrittenTiles, WriteError> {
        let cleanup = if self.staged {
            match fs::remove_dir(&self.staging_dir) {
                Ok(()) => {
                    log::debug!("Removed staging directory {}", self.staging_dir.display());
                    CleanupOutcome::Removed
                }
                Err(e) => {
                    log::warn!(
                        "Could not remove staging directory {}: {e}",
                        self.staging_dir.display(),
                    );
                    CleanupOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            }
        } else {
            CleanupOutcome::NotNeeded
        };

        progress.report(&ProgressEvent::Cleanup {
            path: self.staging_dir,
            outcome: cleanup.clone(),
        });

        Ok(WrittenTiles {
            paths: self.written,
            cleanup,
        })
    }
}

/// Encode `pixels` in `format`.
///
/// TGA is written uncompressed (no RLE), the variant every GoldSrc
/// build loads.
fn encode(pixels: &RgbImage, format: ImageFormat) -> image::ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    if format == ImageFormat::Tga {
        image::codecs::tga::TgaEncoder::new(&mut buf)
            .disable_rle()
            .write_image(
                pixels.as_raw(),
                pixels.width(),
                pixels.height(),
                ExtendedColorType::Rgb8,
            )?;
    } else {
        pixels.write_to(&mut Cursor::new(&mut buf), format)?;
    }
    Ok(buf)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use loadtile_pipeline::{GridSpec, NoProgress};

    use super::*;

    fn tile(index: usize, color: [u8; 3]) -> Tile {
        let (row, column) = GridSpec::LOADING_BACKGROUND.position(index);
        Tile {
            index,
            row,
            column,
            rect: GridSpec::LOADING_BACKGROUND.rect(index),
            image: RgbImage::from_pixel(4, 4, image::Rgb(color)),
        }
    }

    #[test]
    fn tga_is_uncompressed_24_bit() {
        let img = RgbImage::from_pixel(4, 4, image::Rgb([1, 2, 3]));
        let bytes = encode(&img, ImageFormat::Tga).unwrap();
        // Header byte 2 is the image type: 2 = uncompressed true-color.
        assert_eq!(bytes[2], 2);
        // Header byte 16 is bits per pixel.
        assert_eq!(bytes[16], 24);
        assert!(bytes.len() >= 18 + 4 * 4 * 3);
    }

    #[test]
    fn nothing_created_before_first_tile() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("background");
        let writer = TileWriter::new(&out);
        let written = writer.finish(&mut NoProgress).unwrap();
        assert_eq!(written.cleanup, CleanupOutcome::NotNeeded);
        assert!(written.paths.is_empty());
        assert!(!out.exists());
    }

    #[test]
    fn accept_writes_final_name_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = TileWriter::new(dir.path());
        writer.accept(&tile(0, [10, 20, 30]), "800_1_a_loading.tga").unwrap();
        writer.accept(&tile(1, [40, 50, 60]), "800_1_b_loading.tga").unwrap();

        let staging = writer.staging_dir().to_path_buf();
        assert!(staging.is_dir());
        assert_eq!(fs::read_dir(&staging).unwrap().count(), 0);

        let mut events = Vec::new();
        let written = writer
            .finish(&mut |event: &ProgressEvent| events.push(event.clone()))
            .unwrap();
        assert_eq!(written.cleanup, CleanupOutcome::Removed);
        assert!(!staging.exists());
        assert_eq!(
            written.paths,
            [
                dir.path().join("800_1_a_loading.tga"),
                dir.path().join("800_1_b_loading.tga"),
            ]
        );
        assert!(matches!(
            events.as_slice(),
            [ProgressEvent::Cleanup {
                outcome: CleanupOutcome::Removed,
                ..
            }]
        ));

        let decoded = image::open(&written.paths[1]).unwrap().to_rgb8();
        assert_eq!(decoded.get_pixel(3, 3).0, [40, 50, 60]);
    }

    #[test]
    fn other_extensions_use_their_encoder() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = TileWriter::new(dir.path());
        writer.accept(&tile(0, [7, 8, 9]), "tile.png").unwrap();
        writer.finish(&mut NoProgress).unwrap();

        let bytes = fs::read(dir.path().join("tile.png")).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn unknown_extension_is_an_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = TileWriter::new(dir.path());
        let err = writer.accept(&tile(2, [0, 0, 0]), "tile.nope").unwrap_err();
        assert!(matches!(err, WriteError::Encode { index: 2, .. }));
        // Encoding is checked before anything touches the disk.
        assert!(!writer.staging_dir().exists());
    }

    #[test]
    fn cleanup_failure_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = TileWriter::new(dir.path());
        writer.accept(&tile(0, [1, 1, 1]), "800_1_a_loading.tga").unwrap();
        fs::write(writer.staging_dir().join("keep.txt"), b"not ours").unwrap();

        let written = writer.finish(&mut NoProgress).unwrap();
        assert!(matches!(written.cleanup, CleanupOutcome::Failed { .. }));
        assert!(dir.path().join("800_1_a_loading.tga").is_file());
    }
}
