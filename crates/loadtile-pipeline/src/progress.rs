//! Structured progress events.
//!
//! The pipeline reports what it did as discrete [`ProgressEvent`]s
//! rather than formatted log lines, so any surface (terminal logger,
//! JSON report, GUI log pane) can render them its own way.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One step of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// The source image was decoded.
    Decoded {
        /// Source width in pixels.
        width: u32,
        /// Source height in pixels.
        height: u32,
    },
    /// The source was resampled to the canonical resolution.
    Canonicalized {
        /// Canonical width in pixels.
        width: u32,
        /// Canonical height in pixels.
        height: u32,
    },
    /// The canonical image was cut into tiles.
    Sliced {
        /// Number of tiles produced.
        tiles: usize,
    },
    /// A tile was handed to its sink.
    TileWritten {
        /// Row-major tile index.
        index: usize,
        /// File name the tile was stored under.
        name: String,
    },
    /// The staging directory was dealt with.
    Cleanup {
        /// Staging directory.
        path: PathBuf,
        /// What happened to it.
        outcome: CleanupOutcome,
    },
}

impl ProgressEvent {
    /// Short stage name, stable across releases.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Decoded { .. } => "decode",
            Self::Canonicalized { .. } => "resize",
            Self::Sliced { .. } => "slice",
            Self::TileWritten { .. } => "write",
            Self::Cleanup { .. } => "cleanup",
        }
    }

    /// Tile index, for per-tile events.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        match self {
            Self::TileWritten { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Result of removing the staging directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CleanupOutcome {
    /// The directory was removed.
    Removed,
    /// No tiles were staged, so there was nothing to remove.
    NotNeeded,
    /// Removal failed. Tiles already written are kept.
    Failed {
        /// Why removal failed.
        reason: String,
    },
}

impl CleanupOutcome {
    /// Whether the staging directory is known to be gone.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Receiver of [`ProgressEvent`]s.
///
/// Implemented for every `FnMut(&ProgressEvent)`, so a closure is the
/// usual observer.
pub trait Progress {
    /// Handle one event.
    fn report(&mut self, event: &ProgressEvent);
}

impl<F: FnMut(&ProgressEvent)> Progress for F {
    fn report(&mut self, event: &ProgressEvent) {
        self(event);
    }
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _event: &ProgressEvent) {}
}
