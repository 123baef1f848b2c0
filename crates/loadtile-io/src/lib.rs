//! loadtile-io: filesystem side of loadtile.
//!
//! Reads source images, writes tiles through a staging directory, and
//! locates the game's background folder.

pub mod error;
pub mod generate;
pub mod locate;
pub mod writer;

pub use error::{GenerateError, WriteError, WriteStep};
pub use generate::{Generated, generate, preview};
pub use locate::detect_background_dir;
pub use writer::{STAGING_DIR, TileWriter, WrittenTiles};
