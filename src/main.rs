//! Candle Grid - render a chart grid described by a JSON config
//!
//! Loads the config, runs its plot calls and writes a PNG or SVG image.

use anyhow::Context;
use candle_grid::{FigureConfig, StaticChartRenderer};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(version, about = "Candlestick, volume and overlay charts on a subplot grid")]
struct Args {
    /// Figure config (JSON)
    config: PathBuf,

    /// Output image; `.svg` writes SVG, anything else PNG
    #[arg(short, long, default_value = "chart.png")]
    output: PathBuf,

    /// Open the image with the system viewer when done
    #[arg(long)]
    open: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = FigureConfig::from_path(&args.config)
        .with_context(|| format!("loading {:?}", args.config))?;
    info!(
        "{}x{} grid, {} plot calls",
        config.rows,
        config.columns,
        config.plots.len()
    );

    let base_dir = args.config.parent().unwrap_or(Path::new("."));
    let grid = config.run(base_dir).context("drawing charts")?;

    StaticChartRenderer::save(&grid, &args.output)
        .with_context(|| format!("writing {:?}", args.output))?;

    if args.open {
        open::that(&args.output).with_context(|| format!("opening {:?}", args.output))?;
    }

    Ok(())
}
