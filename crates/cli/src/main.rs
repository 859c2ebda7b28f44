//! chordmorph CLI - grayscale morphology over TIFF images

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use chordmorph_algorithms::morphology::{
    black_hat_with, closing_with, decompose_chords, dilate_raster_with, erode_raster_with,
    gradient_with, opening_with, top_hat_with, ChordPolicy, MorphologyOptions, ProcessingMode,
    StructuringElement,
};
use chordmorph_core::io::{read_tiff_with_format, write_tiff, SampleFormat, TiffOptions};
use chordmorph_core::Raster;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "chordmorph")]
#[command(author, version, about = "Grayscale erosion, dilation and friends", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a TIFF image
    Info {
        /// Input image
        input: PathBuf,
    },
    /// Erosion (minimum filter)
    Erode(OpArgs),
    /// Dilation (maximum filter)
    Dilate(OpArgs),
    /// Opening (erosion then dilation), removes small bright features
    Opening(OpArgs),
    /// Closing (dilation then erosion), removes small dark features
    Closing(OpArgs),
    /// Morphological gradient (dilation - erosion), edge detection
    Gradient(OpArgs),
    /// Top-hat transform (original - opening), bright feature extraction
    TopHat(OpArgs),
    /// Black-hat transform (closing - original), dark feature extraction
    BlackHat(OpArgs),
}

#[derive(Args)]
struct OpArgs {
    /// Input image
    input: PathBuf,
    /// Output file; written with the input's sample format
    output: PathBuf,
    #[command(flatten)]
    element: ElementArgs,
    /// What to do with chords reaching past the table padding
    #[arg(long, value_enum, default_value_t = PolicyArg::Pad)]
    policy: PolicyArg,
    /// Process horizontal bands in parallel
    #[arg(short, long)]
    parallel: bool,
    /// Worker threads for --parallel (default: all cores)
    #[arg(long, requires = "parallel")]
    threads: Option<usize>,
}

#[derive(Args)]
struct ElementArgs {
    /// Structuring element shape
    #[arg(long, value_enum, default_value_t = Shape::Square)]
    shape: Shape,
    /// Radius in cells for square, cross and disk
    #[arg(short, long, default_value = "1")]
    radius: usize,
    /// Width for rectangle, length for hline
    #[arg(long)]
    width: Option<usize>,
    /// Height for rectangle, length for vline
    #[arg(long)]
    height: Option<usize>,
    /// Mask rows for --shape mask, e.g. "1,1,0;0,1,1"
    #[arg(long)]
    mask: Option<String>,
    /// Anchor cell as "row,col" (default: middle of the mask)
    #[arg(long)]
    center: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Shape {
    Square,
    Rectangle,
    Cross,
    Disk,
    Hline,
    Vline,
    Mask,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Reject,
    Skip,
    Pad,
}

impl From<PolicyArg> for ChordPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Reject => ChordPolicy::Reject,
            PolicyArg::Skip => ChordPolicy::Skip,
            PolicyArg::Pad => ChordPolicy::Pad,
        }
    }
}

type MorphFn =
    fn(&Raster<f64>, &StructuringElement, &MorphologyOptions) -> chordmorph_core::Result<Raster<f64>>;

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Cannot install logger")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_image(path: &Path) -> Result<(Raster<f64>, SampleFormat)> {
    let pb = spinner("Reading image...");
    let result = read_tiff_with_format(path)
        .with_context(|| format!("Failed to read {}", path.display()));
    pb.finish_and_clear();
    let (raster, format) = result?;
    info!(
        "Input: {} x {} ({})",
        raster.cols(),
        raster.rows(),
        format.name()
    );
    Ok((raster, format))
}

fn write_image(raster: &Raster<f64>, path: &Path, format: SampleFormat) -> Result<()> {
    let pb = spinner("Writing output...");
    let result = write_tiff(raster, path, Some(TiffOptions { format }))
        .with_context(|| format!("Failed to write {}", path.display()));
    pb.finish_and_clear();
    result
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn parse_pair(s: &str) -> Result<(usize, usize)> {
    let (row, col) = s
        .split_once(',')
        .with_context(|| format!("Expected \"row,col\", got \"{}\"", s))?;
    let row = row.trim().parse().with_context(|| format!("Invalid row: {}", row))?;
    let col = col.trim().parse().with_context(|| format!("Invalid column: {}", col))?;
    Ok((row, col))
}

/// Parse `"1,1,0;0,1,1"` into boolean rows; any non-zero number is "on"
fn parse_mask(s: &str) -> Result<Vec<Vec<bool>>> {
    s.split(';')
        .map(|row| {
            row.split(',')
                .map(|cell| {
                    let cell = cell.trim();
                    cell.parse::<i64>()
                        .map(|v| v > 0)
                        .with_context(|| format!("Invalid mask cell: \"{}\"", cell))
                })
                .collect::<Result<Vec<bool>>>()
        })
        .collect()
}

fn build_element(args: &ElementArgs) -> Result<StructuringElement> {
    let se = match args.shape {
        Shape::Square => StructuringElement::square(args.radius),
        Shape::Cross => StructuringElement::cross(args.radius),
        Shape::Disk => StructuringElement::disk(args.radius),
        Shape::Rectangle => {
            let width = args.width.context("--shape rectangle needs --width")?;
            let height = args.height.context("--shape rectangle needs --height")?;
            StructuringElement::rectangle(width, height)
        }
        Shape::Hline => {
            StructuringElement::horizontal_line(args.width.context("--shape hline needs --width")?)
        }
        Shape::Vline => {
            StructuringElement::vertical_line(args.height.context("--shape vline needs --height")?)
        }
        Shape::Mask => {
            let mask = args.mask.as_deref().context("--shape mask needs --mask")?;
            StructuringElement::from_rows(&parse_mask(mask)?)
        }
    }
    .context("Invalid structuring element")?;

    match &args.center {
        Some(center) => {
            let (row, col) = parse_pair(center)?;
            se.with_center(row, col).context("Invalid structuring element center")
        }
        None => Ok(se),
    }
}

fn options(args: &OpArgs) -> MorphologyOptions {
    let mode = match (args.parallel, args.threads) {
        (false, _) => ProcessingMode::Sequential,
        (true, None) => ProcessingMode::Parallel,
        (true, Some(n)) => ProcessingMode::ParallelWith(n),
    };
    MorphologyOptions::default()
        .with_policy(args.policy.into())
        .with_mode(mode)
}

fn run(name: &str, op: MorphFn, args: &OpArgs) -> Result<()> {
    let se = build_element(&args.element)?;
    let opts = options(args);
    if let Ok(chords) = decompose_chords(&se) {
        debug!(
            "Element: {}x{}, center {:?}, {} cells in {} chords",
            se.width(),
            se.height(),
            se.center(),
            se.on_count(),
            chords.len()
        );
    }

    let (raster, format) = read_image(&args.input)?;
    let start = Instant::now();
    let result = op(&raster, &se, &opts).with_context(|| format!("Failed to compute {}", name))?;
    let elapsed = start.elapsed();
    write_image(&result, &args.output, format)?;
    done(name, &args.output, elapsed);
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Info { input } => {
            let (raster, format) = read_image(&input)?;
            let stats = raster.statistics();

            println!("File: {}", input.display());
            println!(
                "Dimensions: {} x {} ({} samples)",
                raster.cols(),
                raster.rows(),
                raster.len()
            );
            println!("Sample format: {}", format.name());
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            if stats.invalid_count > 0 {
                println!("  NaN samples: {}", stats.invalid_count);
            }
        }
        Commands::Erode(args) => run("Erode", erode_raster_with, &args)?,
        Commands::Dilate(args) => run("Dilate", dilate_raster_with, &args)?,
        Commands::Opening(args) => run("Opening", opening_with, &args)?,
        Commands::Closing(args) => run("Closing", closing_with, &args)?,
        Commands::Gradient(args) => run("Gradient", gradient_with, &args)?,
        Commands::TopHat(args) => run("Top-hat", top_hat_with, &args)?,
        Commands::BlackHat(args) => run("Black-hat", black_hat_with, &args)?,
    }

    Ok(())
}
