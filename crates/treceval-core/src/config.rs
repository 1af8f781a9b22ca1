//! Evaluation configuration.
//!
//! The TREC conventions (a 1000-rank horizon, nine document cutoffs, eleven
//! standard recall levels) are exposed as named constants and collected into
//! [`EvalConfig`], so tests and small corpora can evaluate with a shorter
//! horizon.
//!
//! # Usage
//!
//! ```
//! use treceval_core::config::{EvalConfig, RankingOrder, MAX_RANK};
//!
//! let config = EvalConfig::default();
//! assert_eq!(config.max_rank, MAX_RANK);
//!
//! // A short horizon for a toy collection, evaluated in file order
//! let small = EvalConfig {
//!     max_rank: 10,
//!     cutoffs: vec![5, 10],
//!     order: RankingOrder::FileOrder,
//!     ..EvalConfig::default()
//! };
//! assert!(small.validate().is_ok());
//! ```

use crate::error::EvalError;
use serde::{Deserialize, Serialize};

// =============================================================================
// TREC Conventions
// =============================================================================

/// Number of ranks examined per topic.
///
/// Documents past this rank are ignored; precision and recall curves are
/// always extended to exactly this length.
pub const MAX_RANK: usize = 1000;

/// Document cutoffs at which precision, recall and F1 are reported.
pub const CUTOFFS: [usize; 9] = [5, 10, 15, 20, 30, 100, 200, 500, 1000];

/// Number of standard recall levels (0.0, 0.1, ..., 1.0).
pub const NUM_RECALL_LEVELS: usize = 11;

/// Returns the eleven standard recall levels.
///
/// Levels are computed as `i / 10` rather than by repeated addition so that
/// they compare exactly against recall values such as `3 / 10`.
pub fn standard_recall_levels() -> Vec<f64> {
    (0..NUM_RECALL_LEVELS)
        .map(|i| i as f64 / (NUM_RECALL_LEVELS - 1) as f64)
        .collect()
}

// =============================================================================
// Ranking Order
// =============================================================================

/// How a topic's retrieved documents are ordered before evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingOrder {
    /// Descending score, ties broken by ascending document id.
    #[default]
    Score,
    /// The order documents appear in the run file.
    FileOrder,
}

// =============================================================================
// EvalConfig
// =============================================================================

/// Parameters of a single evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Ranks examined per topic.
    pub max_rank: usize,
    /// Cutoffs for precision/recall/F1, each within `1..=max_rank`.
    pub cutoffs: Vec<usize>,
    /// Recall levels for interpolated precision, each within `[0, 1]`.
    pub recall_levels: Vec<f64>,
    /// Ranking order applied to every topic.
    pub order: RankingOrder,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_rank: MAX_RANK,
            cutoffs: CUTOFFS.to_vec(),
            recall_levels: standard_recall_levels(),
            order: RankingOrder::default(),
        }
    }
}

impl EvalConfig {
    /// Default configuration with the given ranking order.
    pub fn with_order(order: RankingOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    /// Checks that the horizon, cutoffs and recall levels are usable.
    pub fn validate(&self) -> Result<(), EvalError> {
        if self.max_rank == 0 {
            return Err(EvalError::InvalidConfig(
                "max_rank must be at least 1".to_string(),
            ));
        }
        if let Some(&k) = self
            .cutoffs
            .iter()
            .find(|&&k| k == 0 || k > self.max_rank)
        {
            return Err(EvalError::InvalidConfig(format!(
                "cutoff {} is outside 1..={}",
                k, self.max_rank
            )));
        }
        if let Some(&level) = self
            .recall_levels
            .iter()
            .find(|l| !(0.0..=1.0).contains(*l))
        {
            return Err(EvalError::InvalidConfig(format!(
                "recall level {} is outside [0, 1]",
                level
            )));
        }
        // precision_at_recall_levels walks one forward-only cursor
        if let Some(pair) = self.recall_levels.windows(2).find(|w| w[0] > w[1]) {
            return Err(EvalError::InvalidConfig(format!(
                "recall levels must be ascending, found {} before {}",
                pair[0], pair[1]
            )));
        }
        Ok(())
    }
}
