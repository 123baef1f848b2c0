//! Tile file naming.
//!
//! The game loads `800_{row}_{column}_loading.tga` for rows `1..=3` and
//! columns `a..=d`. The leading `800` is a literal kept from the game's
//! historical 800x600 background layout. It is not the canonical width
//! and must not be derived from it.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::grid::GridSpec;

/// Letter naming the zero-based `column`: `0 -> 'a'`, `3 -> 'd'`.
///
/// # Panics
///
/// Panics if `column` has no lowercase letter (26 or more).
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn column_letter(column: u32) -> char {
    assert!(column < 26, "column {column} has no letter");
    char::from(b'a' + column as u8)
}

/// Template mapping grid positions to file names:
/// `{width_prefix}_{row + 1}_{column letter}_{suffix}.{extension}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileNaming {
    /// Fixed numeric prefix.
    pub width_prefix: u32,
    /// Fixed word after the column letter.
    pub suffix: Cow<'static, str>,
    /// File extension without the dot. Also selects the encoder.
    pub extension: Cow<'static, str>,
}

impl TileNaming {
    /// Names read by the Counter-Strike 1.6 background loader.
    pub const LOADING_BACKGROUND: Self = Self {
        width_prefix: 800,
        suffix: Cow::Borrowed("loading"),
        extension: Cow::Borrowed("tga"),
    };

    /// File name for tile `index` of `grid`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside `0..grid.tile_count()`. Callers
    /// iterate over that range themselves, so anything else is a bug.
    #[must_use]
    pub fn name(&self, index: usize, grid: &GridSpec) -> String {
        let (row, column) = grid.position(index);
        format!(
            "{}_{}_{}_{}.{}",
            self.width_prefix,
            row + 1,
            column_letter(column),
            self.suffix,
            self.extension,
        )
    }

    /// Names for every tile of `grid`, index-aligned.
    #[must_use]
    pub fn names(&self, grid: &GridSpec) -> Vec<String> {
        (0..grid.tile_count()).map(|i| self.name(i, grid)).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn column_letters() {
        assert_eq!(column_letter(0), 'a');
        assert_eq!(column_letter(3), 'd');
        assert_eq!(column_letter(25), 'z');
    }

    #[test]
    #[should_panic(expected = "has no letter")]
    fn column_past_z_panics() {
        let _ = column_letter(26);
    }

    #[test]
    fn loading_background_names() {
        let names = TileNaming::LOADING_BACKGROUND.names(&GridSpec::LOADING_BACKGROUND);
        assert_eq!(
            names,
            [
                "800_1_a_loading.tga",
                "800_1_b_loading.tga",
                "800_1_c_loading.tga",
                "800_1_d_loading.tga",
                "800_2_a_loading.tga",
                "800_2_b_loading.tga",
                "800_2_c_loading.tga",
                "800_2_d_loading.tga",
                "800_3_a_loading.tga",
                "800_3_b_loading.tga",
                "800_3_c_loading.tga",
                "800_3_d_loading.tga",
            ]
        );
    }

    #[test]
    fn names_are_unique() {
        let names = TileNaming::LOADING_BACKGROUND.names(&GridSpec::LOADING_BACKGROUND);
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn prefix_is_not_the_canonical_width() {
        let name = TileNaming::LOADING_BACKGROUND.name(0, &GridSpec::LOADING_BACKGROUND);
        assert!(name.starts_with("800_"));
        assert!(!name.contains("1024"));
    }

    #[test]
    fn other_grid_shapes_follow_template() {
        let grid = GridSpec {
            columns: 2,
            rows: 2,
            tile_width: 512,
            tile_height: 384,
        };
        assert_eq!(
            TileNaming::LOADING_BACKGROUND.name(3, &grid),
            "800_2_b_loading.tga"
        );
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_index_panics() {
        let _ = TileNaming::LOADING_BACKGROUND.name(12, &GridSpec::LOADING_BACKGROUND);
    }
}
