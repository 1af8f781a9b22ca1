//! qrels-merge - combine judgment files from several annotators.
//!
//! # Usage
//!
//! ```bash
//! # Sum grades across annotators
//! qrels-merge alice.qrels bob.qrels > merged.qrels
//!
//! # Keep the highest grade instead
//! qrels-merge --strategy max --author panel alice.qrels bob.qrels
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use treceval_core::{MergeStrategy, Qrels};

/// Merge relevance judgments and print them in judgment-file format.
#[derive(Parser, Debug)]
#[command(name = "qrels-merge", version, about)]
struct Args {
    /// Judgment files to merge, folded in the order given
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// How grades for the same (topic, document) pair are combined
    #[arg(long, value_enum, default_value_t = Strategy::Sum)]
    strategy: Strategy,

    /// Author column written on every merged line
    #[arg(long, default_value = "merged")]
    author: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// Add grades together
    Sum,
    /// Keep the highest grade
    Max,
}

impl From<Strategy> for MergeStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Sum => MergeStrategy::Sum,
            Strategy::Max => MergeStrategy::Max,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    for line in merge_files(&args)? {
        println!("{}", line);
    }
    Ok(())
}

fn merge_files(args: &Args) -> Result<Vec<String>> {
    let mut sources = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let ingest = Qrels::load(path)
            .with_context(|| format!("Failed to load judgments from {}", path.display()))?;
        if !ingest.is_clean() {
            warn!(
                "Skipped {} malformed line(s) in {}",
                ingest.skipped.len(),
                path.display()
            );
        }
        sources.push(ingest.into_data());
    }

    let merged = Qrels::merge(&sources, args.strategy.into());
    info!(
        "Merged {} file(s) into {} judgments over {} topics",
        sources.len(),
        merged.num_judgments(),
        merged.num_topics()
    );
    Ok(merged.to_lines(&args.author))
}
