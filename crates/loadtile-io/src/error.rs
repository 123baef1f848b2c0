//! Error types for filesystem-facing operations.

use std::fmt;
use std::io;
use std::path::PathBuf;

use loadtile_pipeline::PipelineError;

/// Which part of writing a tile failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStep {
    /// Creating the output or staging directory.
    CreateDirectory,
    /// Writing the encoded tile into the staging directory.
    WriteStaged,
    /// Moving the staged file to its final name.
    Rename,
}

impl fmt::Display for WriteStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDirectory => f.write_str("create directory"),
            Self::WriteStaged => f.write_str("write staged file"),
            Self::Rename => f.write_str("move into place"),
        }
    }
}

/// A tile could not be written. Tiles before it stay on disk.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// A filesystem operation failed.
    #[error("tile {index} ({name}): failed to {step} {}: {source}", path.display())]
    Io {
        /// Row-major index of the failed tile.
        index: usize,
        /// File name the tile was headed for.
        name: String,
        /// The operation that failed.
        step: WriteStep,
        /// Path the operation was applied to.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The tile could not be encoded in the format its name implies.
    #[error("tile {index} ({name}): failed to encode: {source}")]
    Encode {
        /// Row-major index of the failed tile.
        index: usize,
        /// File name the tile was headed for.
        name: String,
        /// Underlying error.
        source: image::ImageError,
    },
}

impl WriteError {
    /// Index of the tile that failed.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Io { index, .. } | Self::Encode { index, .. } => *index,
        }
    }

    /// File name of the tile that failed.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Io { name, .. } | Self::Encode { name, .. } => name,
        }
    }
}

/// A tile generation run failed.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The source file could not be read.
    #[error("failed to read source image {}: {source}", path.display())]
    Read {
        /// Source path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// Decoding, resizing or slicing failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Writing a tile failed.
    #[error(transparent)]
    Write(#[from] WriteError),
}

impl GenerateError {
    /// Whether the source could not be read or decoded.
    ///
    /// Nothing has been written to the output directory in that case.
    #[must_use]
    pub const fn is_decode_failure(&self) -> bool {
        match self {
            Self::Read { .. } => true,
            Self::Pipeline(e) => e.is_decode_failure(),
            Self::Write(_) => false,
        }
    }
}
