//! Cross-topic aggregation.
//!
//! The [`Aggregator`] owns running sums for one evaluation and turns them into
//! an [`AggregateResult`] once every topic has been folded in. [`evaluate`]
//! drives the whole pipeline for a judgment store and a run.

use super::topic::{evaluate_topic, CutoffMetrics, RecallPoint, TopicResult};
use crate::config::EvalConfig;
use crate::error::EvalError;
use crate::qrels::Qrels;
use crate::relevance::RelevantCounts;
use crate::run::Run;
use serde::Serialize;
use tracing::{debug, info};

/// Corpus-level statistics.
///
/// Counts are sums over the evaluated topics; every other value is the
/// arithmetic mean of the per-topic value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    /// Topics that were evaluated
    pub num_topics: usize,
    pub num_ret: usize,
    pub num_rel: usize,
    pub num_rel_ret: usize,
    /// Mean average precision
    pub map: f64,
    pub r_precision: f64,
    pub ndcg: f64,
    pub cg: f64,
    pub dcg: f64,
    pub cutoffs: Vec<CutoffMetrics>,
    pub recall_levels: Vec<RecallPoint>,
}

/// Running sums over evaluated topics.
#[derive(Debug, Clone)]
pub struct Aggregator {
    num_topics: usize,
    num_ret: usize,
    num_rel: usize,
    num_rel_ret: usize,
    sum_ap: f64,
    sum_r_precision: f64,
    sum_ndcg: f64,
    sum_cg: f64,
    sum_dcg: f64,
    cutoffs: Vec<CutoffMetrics>,
    recall_levels: Vec<RecallPoint>,
}

impl Aggregator {
    /// Creates an empty aggregator shaped by the configured cutoffs and levels.
    pub fn new(config: &EvalConfig) -> Self {
        Self {
            num_topics: 0,
            num_ret: 0,
            num_rel: 0,
            num_rel_ret: 0,
            sum_ap: 0.0,
            sum_r_precision: 0.0,
            sum_ndcg: 0.0,
            sum_cg: 0.0,
            sum_dcg: 0.0,
            cutoffs: config
                .cutoffs
                .iter()
                .map(|&cutoff| CutoffMetrics {
                    cutoff,
                    precision: 0.0,
                    recall: 0.0,
                    f1: 0.0,
                })
                .collect(),
            recall_levels: config
                .recall_levels
                .iter()
                .map(|&recall| RecallPoint {
                    recall,
                    precision: 0.0,
                })
                .collect(),
        }
    }

    /// Folds one topic into the running sums.
    ///
    /// The topic must have been evaluated with the configuration this
    /// aggregator was created from.
    pub fn add(&mut self, result: &TopicResult) {
        debug_assert_eq!(result.cutoffs.len(), self.cutoffs.len());
        debug_assert_eq!(result.recall_levels.len(), self.recall_levels.len());

        self.num_topics += 1;
        self.num_ret += result.num_ret;
        self.num_rel += result.num_rel;
        self.num_rel_ret += result.num_rel_ret;
        self.sum_ap += result.average_precision;
        self.sum_r_precision += result.r_precision;
        self.sum_ndcg += result.ndcg;
        self.sum_cg += result.cg;
        self.sum_dcg += result.dcg;

        for (sum, c) in self.cutoffs.iter_mut().zip(&result.cutoffs) {
            sum.precision += c.precision;
            sum.recall += c.recall;
            sum.f1 += c.f1;
        }
        for (sum, p) in self.recall_levels.iter_mut().zip(&result.recall_levels) {
            sum.precision += p.precision;
        }
    }

    /// Number of topics folded in so far.
    pub fn num_topics(&self) -> usize {
        self.num_topics
    }

    /// Divides the sums by the topic count.
    ///
    /// Aggregating zero topics is an error, not a row of zeros.
    pub fn finish(self) -> Result<AggregateResult, EvalError> {
        if self.num_topics == 0 {
            return Err(EvalError::EmptyCorpus);
        }
        let n = self.num_topics as f64;

        Ok(AggregateResult {
            num_topics: self.num_topics,
            num_ret: self.num_ret,
            num_rel: self.num_rel,
            num_rel_ret: self.num_rel_ret,
            map: self.sum_ap / n,
            r_precision: self.sum_r_precision / n,
            ndcg: self.sum_ndcg / n,
            cg: self.sum_cg / n,
            dcg: self.sum_dcg / n,
            cutoffs: self
                .cutoffs
                .into_iter()
                .map(|c| CutoffMetrics {
                    cutoff: c.cutoff,
                    precision: c.precision / n,
                    recall: c.recall / n,
                    f1: c.f1 / n,
                })
                .collect(),
            recall_levels: self
                .recall_levels
                .into_iter()
                .map(|p| RecallPoint {
                    recall: p.recall,
                    precision: p.precision / n,
                })
                .collect(),
        })
    }
}

/// Per-topic results in run order plus the corpus aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub topics: Vec<TopicResult>,
    pub aggregate: AggregateResult,
}

/// Evaluates every eligible run topic and aggregates the results.
///
/// A topic is eligible when it has judgments and at least one of them is
/// relevant. Ineligible topics are skipped without affecting the averages.
///
/// # Errors
///
/// [`EvalError::InvalidConfig`] for an unusable configuration and
/// [`EvalError::EmptyCorpus`] when no topic is eligible.
pub fn evaluate(qrels: &Qrels, run: &Run, config: &EvalConfig) -> Result<Evaluation, EvalError> {
    config.validate()?;

    let counts = RelevantCounts::from_qrels(qrels);
    let mut aggregator = Aggregator::new(config);
    let mut topics = Vec::new();

    for topic in run.topics() {
        let topic_id = topic.topic_id();
        let Some(judgments) = qrels.topic(topic_id) else {
            debug!("Skipping topic {}: no judgments", topic_id);
            continue;
        };

        match evaluate_topic(topic, judgments, counts.get(topic_id), config) {
            Some(result) => {
                aggregator.add(&result);
                topics.push(result);
            }
            None => debug!("Skipping topic {}: no relevant judgments", topic_id),
        }
    }

    info!(
        "Evaluated {} of {} run topics",
        aggregator.num_topics(),
        run.num_topics()
    );

    let aggregate = aggregator.finish()?;
    Ok(Evaluation { topics, aggregate })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RankingOrder;

    const EPS: f64 = 1e-9;

    fn run_eval(qrels: &str, run: &str) -> Result<Evaluation, EvalError> {
        let qrels = Qrels::parse(qrels).data;
        let run = Run::parse(run).data;
        evaluate(&qrels, &run, &EvalConfig::default())
    }

    const QRELS: &str = "T1 a d1 1\nT1 a d2 0\nT1 a d3 2\n\
                         T2 a e1 1\nT2 a e2 1\n\
                         T3 a f1 0\n";
    const RUN: &str = "T1 Q0 d1 1 3.0 x\nT1 Q0 d2 2 2.0 x\nT1 Q0 d3 3 1.0 x\n\
                       T2 Q0 e9 1 5.0 x\nT2 Q0 e2 2 4.0 x\n\
                       T3 Q0 f1 1 1.0 x\n\
                       T4 Q0 g1 1 1.0 x\n";

    #[test]
    fn test_only_eligible_topics_are_evaluated() {
        let eval = run_eval(QRELS, RUN).unwrap();
        let ids: Vec<&str> = eval.topics.iter().map(|t| t.topic_id.as_str()).collect();
        // T3 has no relevant judgments, T4 has no judgments at all
        assert_eq!(ids, vec!["T1", "T2"]);
        assert_eq!(eval.aggregate.num_topics, 2);
    }

    #[test]
    fn test_counts_are_summed() {
        let eval = run_eval(QRELS, RUN).unwrap();
        assert_eq!(eval.aggregate.num_ret, 5);
        assert_eq!(eval.aggregate.num_rel, 4);
        assert_eq!(eval.aggregate.num_rel_ret, 3);
    }

    #[test]
    fn test_scalars_are_means_of_topics() {
        let eval = run_eval(QRELS, RUN).unwrap();
        let n = eval.topics.len() as f64;
        let mean = |f: fn(&TopicResult) -> f64| eval.topics.iter().map(f).sum::<f64>() / n;

        assert!((eval.aggregate.map - mean(|t| t.average_precision)).abs() < EPS);
        assert!((eval.aggregate.r_precision - mean(|t| t.r_precision)).abs() < EPS);
        assert!((eval.aggregate.ndcg - mean(|t| t.ndcg)).abs() < EPS);
        assert!((eval.aggregate.cg - mean(|t| t.cg)).abs() < EPS);
        assert!((eval.aggregate.dcg - mean(|t| t.dcg)).abs() < EPS);

        // T1 AP = 5/6, T2 AP = (1/2)/2 = 1/4
        assert!((eval.aggregate.map - (5.0 / 6.0 + 0.25) / 2.0).abs() < EPS);
    }

    #[test]
    fn test_arrays_are_elementwise_means() {
        let eval = run_eval(QRELS, RUN).unwrap();
        let n = eval.topics.len() as f64;

        for (i, agg) in eval.aggregate.cutoffs.iter().enumerate() {
            let p: f64 = eval.topics.iter().map(|t| t.cutoffs[i].precision).sum::<f64>() / n;
            let f: f64 = eval.topics.iter().map(|t| t.cutoffs[i].f1).sum::<f64>() / n;
            assert!((agg.precision - p).abs() < EPS);
            assert!((agg.f1 - f).abs() < EPS);
        }
        for (i, agg) in eval.aggregate.recall_levels.iter().enumerate() {
            let p: f64 = eval
                .topics
                .iter()
                .map(|t| t.recall_levels[i].precision)
                .sum::<f64>()
                / n;
            assert!((agg.precision - p).abs() < EPS);
        }
    }

    #[test]
    fn test_empty_run_is_empty_corpus() {
        let err = run_eval(QRELS, "\n").unwrap_err();
        assert!(matches!(err, EvalError::EmptyCorpus));
    }

    #[test]
    fn test_only_ineligible_topics_is_empty_corpus() {
        let err = run_eval("T3 a f1 0\n", "T3 Q0 f1 1 1.0 x\nT4 Q0 g1 1 1.0 x\n").unwrap_err();
        assert!(matches!(err, EvalError::EmptyCorpus));
    }

    #[test]
    fn test_aggregator_finish_without_topics() {
        let aggregator = Aggregator::new(&EvalConfig::default());
        assert!(matches!(aggregator.finish(), Err(EvalError::EmptyCorpus)));
    }

    #[test]
    fn test_invalid_config_is_rejected_before_evaluation() {
        let qrels = Qrels::parse(QRELS).data;
        let run = Run::parse(RUN).data;
        let config = EvalConfig {
            max_rank: 3,
            order: RankingOrder::FileOrder,
            ..EvalConfig::default()
        };
        assert!(matches!(
            evaluate(&qrels, &run, &config),
            Err(EvalError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let first = run_eval(QRELS, RUN).unwrap();
        let second = run_eval(QRELS, RUN).unwrap();
        assert_eq!(first.aggregate, second.aggregate);
    }
}
