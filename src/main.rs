//! csvcompare - compare a numeric column between two CSV snapshots

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use termcolor::ColorChoice;

use csvcompare::compare::compute_comparison;
use csvcompare::config::{Config, OutputFormat, DEFAULT_BINS};
use csvcompare::output::render_to_stdout;
use csvcompare::parser::ParserFactory;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
    Html,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Html => OutputFormat::Html,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliColor {
    Auto,
    Always,
    Never,
}

impl From<CliColor> for ColorChoice {
    fn from(c: CliColor) -> Self {
        match c {
            CliColor::Auto => ColorChoice::Auto,
            CliColor::Always => ColorChoice::Always,
            CliColor::Never => ColorChoice::Never,
        }
    }
}

/// Compare a numeric column between two CSV snapshots
#[derive(Parser, Debug)]
#[command(name = "csvcompare")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Old snapshot
    old_file: PathBuf,

    /// New snapshot
    new_file: PathBuf,

    /// Identifier column used to match rows (default: first column)
    #[arg(short, long)]
    id: Option<String>,

    /// Column to compare (default: first column other than the identifier)
    #[arg(short, long)]
    value: Option<String>,

    /// Only keep these ids (comma or newline separated)
    #[arg(long, conflicts_with = "ids_file")]
    ids: Option<String>,

    /// Read the ids to keep from a file
    #[arg(long)]
    ids_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliOutputFormat,

    /// Number of histogram bins
    #[arg(long, default_value_t = DEFAULT_BINS)]
    bins: usize,

    /// When to color terminal output
    #[arg(long, value_enum, default_value = "auto")]
    color: CliColor,

    /// Only show summary counts
    #[arg(long)]
    summary_only: bool,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise --verbose picks debug over the warn default
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(cli) {
        Ok(has_changes) => {
            if has_changes {
                ExitCode::from(1) // Some values changed
            } else {
                ExitCode::SUCCESS // Every diff is zero
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let id_filter = match &cli.ids_file {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read ids file: {}", path.display()))?,
        ),
        None => cli.ids.clone(),
    };

    let config = Config {
        old_file: cli.old_file.clone(),
        new_file: cli.new_file.clone(),
        id_column: cli.id,
        value_column: cli.value,
        id_filter,
        output_format: cli.format.into(),
        ..Default::default()
    }
    .with_bins(cli.bins)
    .with_summary_only(cli.summary_only)
    .with_compact(cli.compact);

    // Parse files
    let factory = ParserFactory::new();

    let old_table = factory
        .parse(&config.old_file)
        .with_context(|| format!("Failed to parse old file: {}", config.old_file.display()))?;

    let new_table = factory
        .parse(&config.new_file)
        .with_context(|| format!("Failed to parse new file: {}", config.new_file.display()))?;

    let comparison = compute_comparison(&old_table, &new_table, &config)?;
    log::info!(
        "Compared {} rows: {} positive, {} negative, {} zero",
        comparison.rows.len(),
        comparison.summary.positive,
        comparison.summary.negative,
        comparison.summary.zero
    );

    if config.summary_only {
        println!("Old file: {} ({} rows)", config.old_file.display(), comparison.old_row_count);
        println!("New file: {} ({} rows)", config.new_file.display(), comparison.new_row_count);
        println!("Matched:  {}", comparison.rows.len());
        println!();
        println!("Positive: {}", comparison.summary.positive);
        println!("Negative: {}", comparison.summary.negative);
        println!("Zero:     {}", comparison.summary.zero);
        return Ok(comparison.has_changes());
    }

    render_to_stdout(&comparison, &config, cli.color.into())?;

    Ok(comparison.has_changes())
}
