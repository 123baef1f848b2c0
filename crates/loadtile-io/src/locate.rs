//! Finding the game's background directory.
//!
//! Probes the usual Steam install locations for
//! `Half-Life/cstrike/resource/background`, the directory the tiles
//! belong in. The result is only a suggestion; any directory works as
//! an output.

use std::env;
use std::path::{Path, PathBuf};

/// Path from a Steam library's `common` directory to the background folder.
const GAME_BACKGROUND: [&str; 4] = ["Half-Life", "cstrike", "resource", "background"];

/// Path from a home directory to a standalone (non-Steam) install.
const STANDALONE_BACKGROUND: [&str; 3] = ["cstrike", "resource", "background"];

/// Operating system family, which decides where Steam lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Steam under `Program Files`.
    Windows,
    /// Steam under the home directory (Linux, macOS, BSD).
    Unix,
}

impl Platform {
    /// The platform this binary was built for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }
}

/// The environment values the probe depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// The user's home directory.
    pub home: Option<PathBuf>,
    /// `%PROGRAMFILES%`.
    pub program_files: Option<PathBuf>,
    /// `%PROGRAMFILES(X86)%`.
    pub program_files_x86: Option<PathBuf>,
}

impl Environment {
    /// Read the values from the running process.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            home: dirs::home_dir(),
            program_files: env::var_os("PROGRAMFILES").map(PathBuf::from),
            program_files_x86: env::var_os("PROGRAMFILES(X86)").map(PathBuf::from),
        }
    }
}

fn join_all(base: &Path, parts: &[&str]) -> PathBuf {
    parts.iter().fold(base.to_path_buf(), |path, part| path.join(part))
}

fn steam_background(steam_root: &Path) -> PathBuf {
    join_all(&join_all(steam_root, &["steamapps", "common"]), &GAME_BACKGROUND)
}

/// Candidate background directories, most likely first.
#[must_use]
pub fn candidate_dirs(platform: Platform, environment: &Environment) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    let home = environment.home.as_deref();

    match platform {
        Platform::Windows => {
            let program_files = environment
                .program_files
                .clone()
                .unwrap_or_else(|| PathBuf::from(r"C:\Program Files"));
            let program_files_x86 = environment
                .program_files_x86
                .clone()
                .unwrap_or_else(|| PathBuf::from(r"C:\Program Files (x86)"));
            candidates.push(steam_background(&program_files.join("Steam")));
            candidates.push(steam_background(&program_files_x86.join("Steam")));
        }
        Platform::Unix => {
            if let Some(home) = home {
                candidates.push(steam_background(&join_all(home, &[".steam", "steam"])));
                candidates.push(steam_background(&join_all(
                    home,
                    &[".local", "share", "Steam"],
                )));
            }
        }
    }

    if let Some(home) = home {
        candidates.push(join_all(home, &STANDALONE_BACKGROUND));
    }
    candidates
}

/// The first candidate that is an existing directory.
#[must_use]
pub fn first_existing(candidates: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    candidates.into_iter().find(|path| path.is_dir())
}

/// Look for the background directory of an installed game.
#[must_use]
pub fn detect_background_dir() -> Option<PathBuf> {
    let candidates = candidate_dirs(Platform::current(), &Environment::from_process());
    for candidate in &candidates {
        log::debug!("Probing {}", candidate.display());
    }
    first_existing(candidates)
}
