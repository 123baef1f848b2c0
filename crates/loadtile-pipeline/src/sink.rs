//! Tile sinks: where sliced tiles go.
//!
//! Writing to disk and collecting for preview are the same loop over
//! the same tiles; only the destination differs. A [`TileSink`] is that
//! destination, and [`emit`] is the loop.

use std::convert::Infallible;

use crate::grid::{GridSpec, Tile};
use crate::naming::TileNaming;
use crate::progress::{Progress, ProgressEvent};

/// Destination for named tiles.
///
/// Tiles arrive in index order. A sink that fails on tile `k` keeps
/// whatever it did for tiles `0..k`.
pub trait TileSink {
    /// Value produced once every tile has been accepted.
    type Output;

    /// Error raised by [`accept`](Self::accept) or [`finish`](Self::finish).
    type Error;

    /// Take one tile together with its file name.
    ///
    /// # Errors
    ///
    /// Implementation-defined; the run stops at the first error.
    fn accept(&mut self, tile: &Tile, name: &str) -> Result<(), Self::Error>;

    /// Called after the last tile.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn finish(self, progress: &mut impl Progress) -> Result<Self::Output, Self::Error>;
}

/// Feed every tile to `sink` under its mapped name, then finish it.
///
/// Emits one [`ProgressEvent::TileWritten`] per accepted tile.
///
/// # Errors
///
/// Returns the sink's error from the first tile it rejects, or from
/// [`TileSink::finish`].
pub fn emit<S: TileSink>(
    tiles: &[Tile],
    grid: &GridSpec,
    naming: &TileNaming,
    mut sink: S,
    progress: &mut impl Progress,
) -> Result<S::Output, S::Error> {
    for tile in tiles {
        let name = naming.name(tile.index, grid);
        sink.accept(tile, &name)?;
        progress.report(&ProgressEvent::TileWritten {
            index: tile.index,
            name,
        });
    }
    sink.finish(progress)
}

/// Sink that keeps named tiles in memory.
#[derive(Debug, Clone, Default)]
pub struct CollectSink {
    tiles: Vec<(String, Tile)>,
}

impl CollectSink {
    /// Create an empty sink.
    #[must_use]
    pub const fn new() -> Self {
        Self { tiles: Vec::new() }
    }
}

impl TileSink for CollectSink {
    type Output = Vec<(String, Tile)>;
    type Error = Infallible;

    fn accept(&mut self, tile: &Tile, name: &str) -> Result<(), Self::Error> {
        self.tiles.push((name.to_owned(), tile.clone()));
        Ok(())
    }

    fn finish(self, _progress: &mut impl Progress) -> Result<Self::Output, Self::Error> {
        Ok(self.tiles)
    }
}
