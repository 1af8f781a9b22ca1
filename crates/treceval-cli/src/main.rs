//! treceval - evaluate a TREC run against relevance judgments.
//!
//! # Usage
//!
//! ```bash
//! # Aggregate report
//! treceval qrels.txt run.txt
//!
//! # Per-topic blocks followed by the aggregate
//! treceval -q qrels.txt run.txt
//!
//! # Evaluate documents in file order instead of by score
//! treceval --order file qrels.txt run.txt
//!
//! # Machine-readable output
//! treceval --json qrels.txt run.txt
//! ```

mod output;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use treceval_core::{evaluate, EvalConfig, Qrels, RankingOrder, Run};

/// Evaluate a ranked run against relevance judgments with TREC measures.
#[derive(Parser, Debug)]
#[command(name = "treceval", version, about)]
struct Cli {
    /// Relevance judgments: `topic author doc relevance` per line
    qrels: PathBuf,

    /// Run to evaluate: `topic author doc rank score annotation` per line
    run: PathBuf,

    /// Also report every evaluated topic
    #[arg(short = 'q')]
    per_topic: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Order in which each topic's documents are ranked
    #[arg(long, value_enum, default_value_t = Order::Score)]
    order: Order,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Order {
    /// Descending score, ties by document id
    Score,
    /// Order of appearance in the run file
    File,
}

impl From<Order> for RankingOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Score => RankingOrder::Score,
            Order::File => RankingOrder::FileOrder,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so the report on stdout stays clean; RUST_LOG wins
    let default_level = if cli.verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let qrels = Qrels::load(&cli.qrels).context("Failed to load relevance judgments")?;
    let run = Run::load(&cli.run).context("Failed to load run")?;

    if !qrels.is_clean() || !run.is_clean() {
        warn!(
            "Skipped {} judgment line(s) and {} run line(s)",
            qrels.skipped.len(),
            run.skipped.len()
        );
    }

    let config = EvalConfig::with_order(cli.order.into());
    let evaluation = evaluate(&qrels.data, &run.data, &config).with_context(|| {
        format!(
            "Cannot evaluate {} against {}",
            cli.run.display(),
            cli.qrels.display()
        )
    })?;

    let report = if cli.json {
        output::format_json(&evaluation, cli.per_topic)
    } else {
        output::format_human(&evaluation, cli.per_topic)
    };
    print!("{}", report);

    Ok(())
}
