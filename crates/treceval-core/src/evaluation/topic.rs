//! Per-topic evaluation.
//!
//! [`evaluate_topic`] walks one topic's ranked list once and derives every
//! reported statistic from the resulting precision and recall curves.
//!
//! # Algorithm
//!
//! 1. Walk at most `max_rank` documents. At each rank record precision
//!    (`rel_ret / rank`), recall (`rel_ret / R`) and the judged grade, and add
//!    the precision to the AP sum whenever the document is relevant.
//! 2. Extend the curves to `max_rank` as if every further rank were examined
//!    and found non-relevant: precision decays, recall stays flat.
//! 3. Read cutoffs and R-precision from the raw precision curve, then
//!    interpolate it and read the recall levels from the interpolated curve.

use super::metrics;
use crate::config::EvalConfig;
use crate::qrels::TopicJudgments;
use crate::run::RunTopic;
use serde::Serialize;

/// Precision, recall and F1 after a fixed number of documents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CutoffMetrics {
    pub cutoff: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Interpolated precision at a recall level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecallPoint {
    pub recall: f64,
    pub precision: f64,
}

/// Every statistic computed for one topic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicResult {
    /// Topic identifier
    pub topic_id: String,
    /// Documents examined (at most the horizon)
    pub num_ret: usize,
    /// Documents judged relevant (R)
    pub num_rel: usize,
    /// Relevant documents among those examined
    pub num_rel_ret: usize,
    /// Non-interpolated average precision
    pub average_precision: f64,
    /// Precision at rank R
    pub r_precision: f64,
    /// Normalized discounted cumulative gain over the examined documents
    pub ndcg: f64,
    /// Cumulative gain over the examined documents
    pub cg: f64,
    /// Discounted cumulative gain over the examined documents
    pub dcg: f64,
    /// One entry per configured cutoff
    pub cutoffs: Vec<CutoffMetrics>,
    /// One entry per configured recall level
    pub recall_levels: Vec<RecallPoint>,
    /// Precision at ranks 1..=max_rank
    #[serde(skip)]
    pub precision_curve: Vec<f64>,
    /// Recall at ranks 1..=max_rank
    #[serde(skip)]
    pub recall_curve: Vec<f64>,
    /// Non-increasing interpolated precision at ranks 1..=max_rank
    #[serde(skip)]
    pub interpolated_curve: Vec<f64>,
}

/// Evaluates one topic's run against its judgments.
///
/// `num_rel` is the topic's relevant-document count. A topic with no
/// relevant documents cannot be evaluated and yields `None`.
pub fn evaluate_topic(
    topic: &RunTopic,
    judgments: &TopicJudgments,
    num_rel: usize,
    config: &EvalConfig,
) -> Option<TopicResult> {
    if num_rel == 0 {
        return None;
    }

    let horizon = config.max_rank;
    let r = num_rel as f64;

    let mut precision_curve = Vec::with_capacity(horizon);
    let mut recall_curve = Vec::with_capacity(horizon);
    let mut relevances = Vec::new();
    let mut num_rel_ret = 0usize;
    let mut sum_prec = 0.0;

    for doc in topic.ranked(config.order).into_iter().take(horizon) {
        let num_ret = precision_curve.len() + 1;
        let grade = judgments.get(&doc.doc_id).copied().unwrap_or(0);

        if grade > 0 {
            sum_prec += (num_rel_ret + 1) as f64 / num_ret as f64;
            num_rel_ret += 1;
        }
        relevances.push(grade);
        precision_curve.push(num_rel_ret as f64 / num_ret as f64);
        recall_curve.push(num_rel_ret as f64 / r);
    }

    let num_ret = precision_curve.len();
    let final_recall = num_rel_ret as f64 / r;
    for rank in (num_ret + 1)..=horizon {
        precision_curve.push(num_rel_ret as f64 / rank as f64);
        recall_curve.push(final_recall);
    }

    let dcg = metrics::dcg(&relevances);
    let ndcg = metrics::ndcg(dcg, metrics::ideal_dcg(&relevances));

    let cutoffs = config
        .cutoffs
        .iter()
        .map(|&k| {
            let precision = metrics::at_rank(&precision_curve, k);
            let recall = metrics::at_rank(&recall_curve, k);
            CutoffMetrics {
                cutoff: k,
                precision,
                recall,
                f1: metrics::f1(precision, recall),
            }
        })
        .collect();

    let r_precision = metrics::r_precision(&precision_curve, r, num_ret, num_rel_ret);

    let interpolated_curve = metrics::interpolate(&precision_curve);
    let recall_levels = metrics::precision_at_recall_levels(
        &interpolated_curve,
        &recall_curve,
        &config.recall_levels,
    )
    .into_iter()
    .zip(&config.recall_levels)
    .map(|(precision, &recall)| RecallPoint { recall, precision })
    .collect();

    Some(TopicResult {
        topic_id: topic.topic_id().to_string(),
        num_ret,
        num_rel,
        num_rel_ret,
        average_precision: sum_prec / r,
        r_precision,
        ndcg,
        cg: metrics::cumulative_gain(&relevances),
        dcg,
        cutoffs,
        recall_levels,
        precision_curve,
        recall_curve,
        interpolated_curve,
    })
}
