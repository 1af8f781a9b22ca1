//! TREC-style evaluation of ranked runs against relevance judgments.
//!
//! # Overview
//!
//! - [`topic`] walks one topic's ranked list and produces a [`TopicResult`]
//! - [`aggregate`] folds topic results into corpus means ([`AggregateResult`])
//! - [`metrics`] holds the gain, interpolation and R-precision primitives
//!
//! # Example
//!
//! ```
//! use treceval_core::config::EvalConfig;
//! use treceval_core::evaluation::evaluate;
//! use treceval_core::qrels::Qrels;
//! use treceval_core::run::Run;
//!
//! let qrels = Qrels::parse("401 bob d1 1\n401 bob d2 0\n401 bob d3 2\n").data;
//! let run = Run::parse("401 Q0 d1 1 3.0 bm25\n401 Q0 d2 2 2.0 bm25\n401 Q0 d3 3 1.0 bm25\n").data;
//!
//! let evaluation = evaluate(&qrels, &run, &EvalConfig::default()).unwrap();
//! assert!((evaluation.aggregate.map - 0.8333).abs() < 1e-3);
//! ```
//!
//! # Metrics Reference
//!
//! | Metric | Description |
//! |--------|-------------|
//! | AP / MAP | Mean of precision at each relevant rank, over R |
//! | R-prec | Precision after R documents |
//! | nDCG | DCG over the ideal ordering of the retrieved grades |
//! | P@k, R@k, F1@k | Set metrics at fixed cutoffs |
//! | iP@r | Interpolated precision at the 11 standard recall levels |

pub mod aggregate;
pub mod metrics;
pub mod topic;

pub use aggregate::{evaluate, AggregateResult, Aggregator, Evaluation};
pub use topic::{evaluate_topic, CutoffMetrics, RecallPoint, TopicResult};
