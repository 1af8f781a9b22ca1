//! # treceval-core
//!
//! Evaluates information-retrieval runs against relevance judgments with the
//! standard TREC measures.
//!
//! ## Modules
//!
//! - [`qrels`] - Judgment store (topic -> document -> relevance)
//! - [`run`] - Run store (topic -> ranked documents with scores)
//! - [`relevance`] - Relevant-document counts per topic
//! - [`evaluation`] - Per-topic evaluation and cross-topic aggregation
//! - [`config`] - Horizon, cutoffs, recall levels and ranking order
//! - [`ingest`] - Line ingestion shared by both stores
//! - [`error`] - Parse and evaluation errors

pub mod config;
pub mod error;
pub mod evaluation;
pub mod ingest;
pub mod qrels;
pub mod relevance;
pub mod run;

pub use config::{EvalConfig, RankingOrder};
pub use error::{EvalError, ParseError};
pub use evaluation::{evaluate, AggregateResult, Evaluation, TopicResult};
pub use ingest::Ingest;
pub use qrels::{MergeStrategy, Qrels};
pub use relevance::RelevantCounts;
pub use run::Run;
