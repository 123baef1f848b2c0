//! Grid slicing: partition a canonical image into equal tiles.
//!
//! Tiles are produced in row-major order. Tile `i` sits at row
//! `i / columns`, column `i % columns`, and covers the rectangle
//! `[col * tile_width, row * tile_height]` to
//! `[(col + 1) * tile_width, (row + 1) * tile_height]`. The rectangles
//! exactly partition the canonical image: no gaps, no overlap.
//!
//! Slicing is shared by the file-writing path and the preview path, so
//! both always see the same crops.

use serde::{Deserialize, Serialize};

use crate::naming::column_letter;
use crate::types::{CanonicalImage, Dimensions, PipelineError, RgbImage};

/// The most columns a grid may have: one lowercase letter each.
pub const MAX_COLUMNS: u32 = 26;

/// How a canonical image is partitioned into tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Width of each tile in pixels.
    pub tile_width: u32,
    /// Height of each tile in pixels.
    pub tile_height: u32,
}

impl GridSpec {
    /// The Counter-Strike 1.6 loading background: 4x3 tiles of 256px.
    pub const LOADING_BACKGROUND: Self = Self {
        columns: 4,
        rows: 3,
        tile_width: 256,
        tile_height: 256,
    };

    /// Total number of tiles.
    #[must_use]
    pub const fn tile_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Zero-based `(row, column)` of tile `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside `0..tile_count()`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn position(&self, index: usize) -> (u32, u32) {
        assert!(
            index < self.tile_count(),
            "tile index {index} out of range for a {}x{} grid",
            self.columns,
            self.rows,
        );
        // Both fit in u32 because index < columns * rows.
        let columns = self.columns as usize;
        ((index / columns) as u32, (index % columns) as u32)
    }

    /// Pixel rectangle covered by tile `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside `0..tile_count()`.
    #[must_use]
    pub fn rect(&self, index: usize) -> TileRect {
        let (row, column) = self.position(index);
        TileRect {
            x: column * self.tile_width,
            y: row * self.tile_height,
            width: self.tile_width,
            height: self.tile_height,
        }
    }

    /// Check that the grid exactly tiles an image of the given size.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] if the grid is empty,
    /// has more columns than there are letters, or does not cover
    /// `dimensions` exactly.
    pub fn validate(&self, dimensions: Dimensions) -> Result<(), PipelineError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(PipelineError::Configuration(format!(
                "grid must have at least one row and column, got {}x{}",
                self.columns, self.rows,
            )));
        }
        if self.columns > MAX_COLUMNS {
            return Err(PipelineError::Configuration(format!(
                "grid has {} columns but only {MAX_COLUMNS} column letters exist",
                self.columns,
            )));
        }
        let covered_width = self.columns.checked_mul(self.tile_width);
        if covered_width != Some(dimensions.width) {
            return Err(PipelineError::Configuration(format!(
                "{} columns x {}px does not equal canonical width {}",
                self.columns, self.tile_width, dimensions.width,
            )));
        }
        let covered_height = self.rows.checked_mul(self.tile_height);
        if covered_height != Some(dimensions.height) {
            return Err(PipelineError::Configuration(format!(
                "{} rows x {}px does not equal canonical height {}",
                self.rows, self.tile_height, dimensions.height,
            )));
        }
        Ok(())
    }
}

/// A rectangle in canonical-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl TileRect {
    /// Exclusive right edge.
    #[must_use]
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Area in pixels.
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether the two rectangles share at least one pixel.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// One cropped sub-image of the canonical image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    /// Row-major index, `row * columns + column`.
    pub index: usize,
    /// Zero-based row.
    pub row: u32,
    /// Zero-based column.
    pub column: u32,
    /// Source rectangle in the canonical image.
    pub rect: TileRect,
    /// Cropped pixels.
    pub image: RgbImage,
}

impl Tile {
    /// Grid caption such as `"1a"` or `"3d"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}{}", self.row + 1, column_letter(self.column))
    }
}

/// Crop `canonical` into `grid.tile_count()` tiles in row-major order.
///
/// # Errors
///
/// Returns [`PipelineError::Configuration`] if `grid` does not exactly
/// partition the canonical image.
pub fn slice(canonical: &CanonicalImage, grid: &GridSpec) -> Result<Vec<Tile>, PipelineError> {
    grid.validate(canonical.dimensions())?;

    let tiles = (0..grid.tile_count())
        .map(|index| {
            let (row, column) = grid.position(index);
            let rect = grid.rect(index);
            let image = image::imageops::crop_imm(
                canonical.image(),
                rect.x,
                rect.y,
                rect.width,
                rect.height,
            )
            .to_image();
            Tile {
                index,
                row,
                column,
                rect,
                image,
            }
        })
        .collect();
    Ok(tiles)
}
