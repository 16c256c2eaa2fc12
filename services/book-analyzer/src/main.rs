//! Book Analyzer CLI
//!
//! Reads a feed from stdin (or `--input`), writes the report to stdout and
//! logs to stderr.
//!
//! ```text
//! book-analyzer --target-size 200 < pricer.in > pricer.out
//! ```

use anyhow::{Context, Result};
use book_analyzer::config::TARGET_SIZE_ENV;
use book_analyzer::{AnalyzerConfig, ReplayConfig, ReplayEngine};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use tracing::info;

/// Order book target-size pricer
#[derive(Parser)]
#[clap(name = "book-analyzer")]
#[clap(about = "Reports the cost of trading a target size against a limit order book feed")]
struct Cli {
    /// Size of the hypothetical trade to price
    #[clap(long, env = TARGET_SIZE_ENV, allow_hyphen_values = true)]
    target_size: i64,

    /// Read the feed from a file instead of stdin
    #[clap(long)]
    input: Option<PathBuf>,

    /// Log the processing metrics report on exit
    #[clap(long)]
    stats: bool,

    /// Skip per-event latency measurement
    #[clap(long)]
    no_latency: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("book_analyzer=info".parse()?),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .with_line_number(true)
        .init();

    let cli = Cli::parse();
    let config = AnalyzerConfig::new(cli.target_size).context("invalid configuration")?;
    let replay_config = ReplayConfig {
        track_latency: !cli.no_latency,
    };
    let mut engine = ReplayEngine::new(config, replay_config);

    let stdout = io::stdout();
    let writer = BufWriter::new(stdout.lock());
    let snapshot = match &cli.input {
        Some(path) => {
            info!(path = %path.display(), "reading feed from file");
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            engine.run(BufReader::new(file), writer)?
        }
        None => engine.run(io::stdin().lock(), writer)?,
    };

    if cli.stats {
        info!("\n{}", snapshot.format_report());
    }
    Ok(())
}
