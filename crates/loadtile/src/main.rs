//! loadtile: turn any image into a Counter-Strike 1.6 loading background.
//!
//! Stretches the image to 1024x768, cuts it into a 4x3 grid of 256px
//! tiles and writes them as `800_{row}_{column}_loading.tga` into the
//! game's `cstrike/resource/background` folder (auto-detected when
//! `--output` is omitted).
//!
//! # Usage
//!
//! ```text
//! loadtile generate [OPTIONS] <IMAGE_PATH>
//! loadtile preview [--json] <IMAGE_PATH>
//! loadtile detect
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use loadtile_io::{detect_background_dir, generate, preview};
use loadtile_pipeline::{CleanupOutcome, PipelineConfig, Progress, ProgressEvent, TileRect};
use serde::Serialize;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

/// Turn any image into a Counter-Strike 1.6 tiled loading background.
#[derive(Parser)]
#[command(name = "loadtile", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log more detail (repeat for trace output).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Resize, slice and write the tiles.
    Generate(GenerateArgs),
    /// Show how the image would be sliced without writing anything.
    Preview(PreviewArgs),
    /// Print the detected game background folder.
    Detect,
}

#[derive(Args)]
struct GenerateArgs {
    /// Path to the source image (JPEG, PNG, BMP, TGA, WebP, GIF).
    image_path: PathBuf,

    /// Output directory. Defaults to the detected game background folder.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Resampling filter for the 1024x768 resize.
    #[arg(long, value_enum, default_value_t = CLI_DEFAULT_FILTER)]
    filter: Filter,

    /// Print a JSON run report on stdout.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct PreviewArgs {
    /// Path to the source image (JPEG, PNG, BMP, TGA, WebP, GIF).
    image_path: PathBuf,

    /// Resampling filter for the 1024x768 resize.
    #[arg(long, value_enum, default_value_t = CLI_DEFAULT_FILTER)]
    filter: Filter,

    /// Print the tile layout as JSON.
    #[arg(long)]
    json: bool,
}

/// Resampling filter selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Filter {
    /// Nearest-neighbor (fastest, blocky).
    Nearest,
    /// Bilinear interpolation (fast, decent quality).
    Triangle,
    /// Bicubic Catmull-Rom (moderate, good quality).
    CatmullRom,
    /// Gaussian (moderate, smooth).
    Gaussian,
    /// Lanczos with 3 lobes (slowest, sharpest).
    Lanczos3,
}

/// Maps a [`loadtile_pipeline::ResizeFilter`] to the local CLI [`Filter`] enum.
const fn filter_from_pipeline(f: loadtile_pipeline::ResizeFilter) -> Filter {
    match f {
        loadtile_pipeline::ResizeFilter::Nearest => Filter::Nearest,
        loadtile_pipeline::ResizeFilter::Triangle => Filter::Triangle,
        loadtile_pipeline::ResizeFilter::CatmullRom => Filter::CatmullRom,
        loadtile_pipeline::ResizeFilter::Gaussian => Filter::Gaussian,
        loadtile_pipeline::ResizeFilter::Lanczos3 => Filter::Lanczos3,
    }
}

/// The CLI default filter, derived from [`PipelineConfig::DEFAULT_FILTER`]
/// so the two cannot silently diverge.
const CLI_DEFAULT_FILTER: Filter = filter_from_pipeline(PipelineConfig::DEFAULT_FILTER);

/// Build a [`PipelineConfig`] with the chosen filter and the fixed grid.
fn config_for(filter: Filter) -> PipelineConfig {
    PipelineConfig {
        filter: match filter {
            Filter::Nearest => loadtile_pipeline::ResizeFilter::Nearest,
            Filter::Triangle => loadtile_pipeline::ResizeFilter::Triangle,
            Filter::CatmullRom => loadtile_pipeline::ResizeFilter::CatmullRom,
            Filter::Gaussian => loadtile_pipeline::ResizeFilter::Gaussian,
            Filter::Lanczos3 => loadtile_pipeline::ResizeFilter::Lanczos3,
        },
        ..PipelineConfig::default()
    }
}

const fn log_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

// ---------------------------------------------------------------------------
// Progress logging
// ---------------------------------------------------------------------------

/// Logs every event and keeps a copy for the JSON report.
#[derive(Default)]
struct LoggedProgress {
    events: Vec<ProgressEvent>,
}

impl Progress for LoggedProgress {
    fn report(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Decoded { width, height } => {
                log::info!("Decoded source image ({width}x{height})");
            }
            ProgressEvent::Canonicalized { width, height } => {
                log::info!("Image resized to {width}x{height}");
            }
            ProgressEvent::Sliced { tiles } => log::debug!("Cut into {tiles} tiles"),
            ProgressEvent::TileWritten { index, name } => {
                log::info!("Saved tile {index:02} as {name}");
            }
            ProgressEvent::Cleanup { path, outcome } => match outcome {
                CleanupOutcome::Removed => {
                    log::info!("Removed temporary folder: {}", path.display());
                }
                CleanupOutcome::NotNeeded => log::debug!("No temporary folder to remove"),
                // The writer already warned with the reason.
                CleanupOutcome::Failed { .. } => {}
            },
        }
        self.events.push(event.clone());
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct RunReport<'a> {
    source: &'a Path,
    output: &'a Path,
    config: &'a PipelineConfig,
    written: &'a [PathBuf],
    events: &'a [ProgressEvent],
}

#[derive(Serialize)]
struct TileReport<'a> {
    index: usize,
    label: String,
    name: &'a str,
    rect: TileRect,
}

fn print_json(value: &impl Serialize) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Error serializing report: {e}");
            ExitCode::FAILURE
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn run_generate(args: &GenerateArgs) -> ExitCode {
    let output = match &args.output {
        Some(dir) => dir.clone(),
        None => match detect_background_dir() {
            Some(dir) => {
                log::info!("Auto detected output folder: {}", dir.display());
                dir
            }
            None => {
                log::error!(
                    "Could not auto detect the Counter-Strike background folder; pass --output"
                );
                return ExitCode::FAILURE;
            }
        },
    };

    let config = config_for(args.filter);
    let mut progress = LoggedProgress::default();
    let generated = match generate(&args.image_path, &output, &config, &mut progress) {
        Ok(generated) => generated,
        Err(e) => {
            log::error!("Error during processing: {e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "Processing complete: {} tiles saved to {}",
        generated.written.len(),
        output.display(),
    );

    if args.json {
        return print_json(&RunReport {
            source: &args.image_path,
            output: &output,
            config: &config,
            written: &generated.written,
            events: &progress.events,
        });
    }
    ExitCode::SUCCESS
}

fn run_preview(args: &PreviewArgs) -> ExitCode {
    let config = config_for(args.filter);
    let preview = match preview(&args.image_path, &config, &mut LoggedProgress::default()) {
        Ok(preview) => preview,
        Err(e) => {
            log::error!("Error loading preview: {e}");
            return ExitCode::FAILURE;
        }
    };

    let tiles: Vec<TileReport<'_>> = preview
        .tiles
        .iter()
        .zip(&preview.names)
        .map(|(tile, name)| TileReport {
            index: tile.index,
            label: tile.label(),
            name,
            rect: tile.rect,
        })
        .collect();

    if args.json {
        return print_json(&tiles);
    }
    for tile in &tiles {
        println!(
            "{:<3} {:<22} {:>4},{:<4} {}x{}",
            tile.label, tile.name, tile.rect.x, tile.rect.y, tile.rect.width, tile.rect.height,
        );
    }
    ExitCode::SUCCESS
}

fn run_detect() -> ExitCode {
    match detect_background_dir() {
        Some(dir) => {
            println!("{}", dir.display());
            ExitCode::SUCCESS
        }
        None => {
            log::error!("Auto detect failed: folder not found");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = TermLogger::init(
        log_level(cli.verbose, cli.quiet),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Could not initialize logging: {e}");
    }

    match &cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Preview(args) => run_preview(args),
        Command::Detect => run_detect(),
    }
}
