mod logger;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sticker_layout::{
    CancelToken, FsImageSource, SheetOptions, SheetSize, SourceRef, calculate_statistics,
    create_session, plan_layouts, probe_dimensions, rasterize,
};

use crate::logger::AppLogger;

#[derive(Parser)]
#[command(name = "stkr", about = "Sticker sheet layout CLI", version)]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List candidate grid layouts for a sheet
    Plan {
        /// Sheet size
        #[arg(long, default_value = "medium", value_enum)]
        sheet: SheetArg,

        /// Custom sheet size in inches (e.g. "3x5"), overrides --sheet
        #[arg(long)]
        custom: Option<String>,

        /// Sticker aspect ratio (width / height)
        #[arg(long, default_value = "1.0")]
        aspect: f32,

        /// Desired sticker count
        #[arg(long)]
        count: Option<usize>,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Lay out sticker images on a sheet and write the print-ready PNG
    Compose {
        /// Input sticker image(s) - can specify multiple
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Sheet size
        #[arg(long, default_value = "medium", value_enum)]
        sheet: SheetArg,

        /// Custom sheet size in inches (e.g. "3x5"), overrides --sheet
        #[arg(long)]
        custom: Option<String>,

        /// Sheet options JSON file (overrides --sheet and --custom)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Times each input is placed on the sheet
        #[arg(long, default_value = "1")]
        copies: usize,

        /// Grid cells to plan for (defaults to the number of placements)
        #[arg(long)]
        count: Option<usize>,

        /// Show statistics only, don't rasterize
        #[arg(long)]
        stats_only: bool,
    },

    /// Write a sheet options file with default values
    InitConfig {
        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Sheet size
        #[arg(long, default_value = "medium", value_enum)]
        sheet: SheetArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SheetArg {
    /// 3in x 3in
    Small,
    /// 4in x 4in
    Medium,
    /// 5.5in x 5.5in
    Large,
}

impl From<SheetArg> for SheetSize {
    fn from(arg: SheetArg) -> Self {
        match arg {
            SheetArg::Small => Self::Small,
            SheetArg::Medium => Self::Medium,
            SheetArg::Large => Self::Large,
        }
    }
}

fn sheet_size(sheet: SheetArg, custom: Option<&str>) -> Result<SheetSize> {
    match custom {
        Some(custom) => Ok(custom.parse()?),
        None => Ok(sheet.into()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logger = AppLogger::new(1000, AppLogger::level_for_verbosity(cli.verbose));
    logger
        .clone()
        .init()
        .context("Failed to install logger")?;

    match cli.command {
        Commands::Plan {
            sheet,
            custom,
            aspect,
            count,
            json,
        } => {
            let options = SheetOptions::for_size(sheet_size(sheet, custom.as_deref())?);
            options.validate()?;
            let plan = plan_layouts(&options.sheet(), aspect, count)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
                return Ok(());
            }

            println!("Layouts for a {} sheet:", options.sheet_size);
            for option in &plan.options {
                let marker = if *option == plan.recommended { "*" } else { " " };
                println!(
                    " {marker} {}  (efficiency {:.1}%)",
                    option.label,
                    option.efficiency * 100.0
                );
            }
            println!("Recommended: {}", plan.recommended.label);
        }

        Commands::Compose {
            input,
            output,
            sheet,
            custom,
            config,
            copies,
            count,
            stats_only,
        } => {
            if copies == 0 {
                bail!("--copies must be at least 1");
            }

            let options = match config {
                Some(path) => SheetOptions::load(&path)
                    .await
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => SheetOptions::for_size(sheet_size(sheet, custom.as_deref())?),
            };
            options.validate()?;

            compose(&options, &input, &output, copies, count, stats_only).await?;

            let warnings = logger.warning_count();
            if warnings > 0 {
                println!("Completed with {warnings} warning(s)");
            }
        }

        Commands::InitConfig { output, sheet } => {
            let options = SheetOptions::for_size(sheet.into());
            options.save(&output).await?;
            println!("Wrote default {} options → {}", options.sheet_size, output.display());
        }
    }

    Ok(())
}

async fn compose(
    options: &SheetOptions,
    input: &[PathBuf],
    output: &Path,
    copies: usize,
    count: Option<usize>,
    stats_only: bool,
) -> Result<()> {
    let source = Arc::new(FsImageSource::new());
    let references: Vec<SourceRef> = input
        .iter()
        .map(|path| SourceRef::new(path.to_string_lossy()))
        .collect();

    let mut dimensions = Vec::with_capacity(references.len());
    for reference in &references {
        dimensions.push(probe_dimensions(&source, reference).await);
    }

    // The first readable image stands in for the whole set when planning
    let aspect_ratio = dimensions
        .iter()
        .flatten()
        .find_map(|d| d.aspect_ratio())
        .unwrap_or(1.0);
    let placements = references.len() * copies;
    let plan = plan_layouts(&options.sheet(), aspect_ratio, Some(count.unwrap_or(placements)))?;
    log::info!("Using layout {}", plan.recommended.label);

    let mut session = create_session(options, plan.recommended)?;
    for (reference, dimensions) in references.iter().zip(dimensions) {
        if dimensions.is_none() {
            log::warn!("Could not read image size of {reference}; using a square box");
        }
        for _ in 0..copies {
            session
                .add_sticker(reference.clone(), dimensions)
                .with_context(|| format!("Failed to place {reference}"))?;
        }
    }
    if !session.validation().is_valid() {
        session.auto_arrange();
    }

    let stats = calculate_statistics(&session);
    println!("Sheet Statistics:");
    println!("  Placed: {} of {}", stats.placed, stats.capacity);
    println!("  Coverage: {:.1}%", stats.coverage * 100.0);
    println!("  Out of bounds: {}", stats.out_of_bounds);
    println!("  Colliding: {}", stats.colliding);

    if stats_only {
        return Ok(());
    }

    let raster = rasterize(&session, source, &CancelToken::new()).await?;
    tokio::fs::write(output, &raster.image.bytes)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let summary = raster.order_summary(&session.sheet());
    println!(
        "Drew {} sticker(s) on a {} sheet ({}x{} px @ {} DPI) → {}",
        summary.sticker_count,
        summary.sheet_id,
        summary.width_px,
        summary.height_px,
        summary.dpi,
        output.display()
    );
    for skipped in &raster.skipped {
        println!("  Skipped {}: {}", skipped.id, skipped.reason);
    }
    Ok(())
}
