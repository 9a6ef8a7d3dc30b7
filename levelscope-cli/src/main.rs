//! LevelScope CLI — session analysis and level ladder commands.
//!
//! Commands:
//! - `analyze` — load a session CSV, run the full pipeline, print a report
//! - `levels` — print the eight-level ladder for an anchor high/low

mod config;
mod report;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use levelscope_core::analysis::compute_levels;
use levelscope_core::data::load_bars_csv;
use levelscope_core::domain::Bar;
use levelscope_core::session::Session;

use config::{AnalyzeConfig, OutputFormat};
use report::{render_analysis, render_levels};

#[derive(Parser)]
#[command(
    name = "levelscope",
    about = "LevelScope — support/resistance reaction analytics"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline over a session CSV and print the analysis.
    Analyze {
        /// Session CSV (columns: time,open,high,low,close[,volume]).
        #[arg(long)]
        input: Option<PathBuf>,

        /// TOML config file; flags override its values.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Print the level ladder for an anchor bar's high/low range.
    Levels {
        /// Anchor bar high.
        #[arg(long)]
        high: f64,

        /// Anchor bar low.
        #[arg(long)]
        low: f64,

        /// Emit the ladder as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            config,
            format,
        } => run_analyze(input, config, format),
        Commands::Levels { high, low, json } => run_levels(high, low, json),
    }
}

fn run_analyze(
    input: Option<PathBuf>,
    config: Option<PathBuf>,
    format: Option<OutputFormat>,
) -> Result<()> {
    let file_config = config
        .as_deref()
        .map(AnalyzeConfig::load)
        .transpose()?
        .unwrap_or_default();

    let Some(input) = input.or(file_config.input) else {
        bail!("no input file: pass --input or set `input` in the config file");
    };
    let format = format
        .or(file_config.format)
        .unwrap_or(OutputFormat::Text);

    let bars = load_bars_csv(&input).with_context(|| format!("loading {}", input.display()))?;
    let session = Session::with_bars(bars)
        .with_context(|| format!("{} is not a valid session", input.display()))?;
    let Some(analysis) = session.analyze()? else {
        bail!("{} holds no bars to analyze", input.display());
    };

    match format {
        OutputFormat::Text => print!("{}", render_analysis(&analysis)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
    }
    Ok(())
}

fn run_levels(high: f64, low: f64, json: bool) -> Result<()> {
    let anchor = Bar {
        time: Utc::now(),
        open: low,
        high,
        low,
        close: high,
        volume: None,
    };
    let levels = compute_levels(&anchor).context("computing level ladder")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&levels)?);
    } else {
        print!("{}", render_levels(&levels));
    }
    Ok(())
}
