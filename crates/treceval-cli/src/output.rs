//! Report formatting for evaluation results.
//!
//! Supports a human-readable layout modelled on the classic `trec_eval`
//! report and JSON for scripting. Both list the same quantities in the same
//! order: counts, CG/DCG, interpolated precision at the recall levels,
//! (mean) average precision, nDCG, the cutoff table, R-precision.

use serde::Serialize;
use treceval_core::evaluation::{
    AggregateResult, CutoffMetrics, Evaluation, RecallPoint, TopicResult,
};

/// Borrowed view of the quantities shared by topic and aggregate reports.
struct Block<'a> {
    /// Topic id, or "all" with the topic count for the aggregate
    heading: String,
    is_aggregate: bool,
    num_ret: usize,
    num_rel: usize,
    num_rel_ret: usize,
    cg: f64,
    dcg: f64,
    recall_levels: &'a [RecallPoint],
    average_precision: f64,
    ndcg: f64,
    cutoffs: &'a [CutoffMetrics],
    r_precision: f64,
}

impl<'a> From<&'a TopicResult> for Block<'a> {
    fn from(t: &'a TopicResult) -> Self {
        Self {
            heading: t.topic_id.clone(),
            is_aggregate: false,
            num_ret: t.num_ret,
            num_rel: t.num_rel,
            num_rel_ret: t.num_rel_ret,
            cg: t.cg,
            dcg: t.dcg,
            recall_levels: &t.recall_levels,
            average_precision: t.average_precision,
            ndcg: t.ndcg,
            cutoffs: &t.cutoffs,
            r_precision: t.r_precision,
        }
    }
}

impl<'a> From<&'a AggregateResult> for Block<'a> {
    fn from(a: &'a AggregateResult) -> Self {
        Self {
            heading: format!("all ({} topics)", a.num_topics),
            is_aggregate: true,
            num_ret: a.num_ret,
            num_rel: a.num_rel,
            num_rel_ret: a.num_rel_ret,
            cg: a.cg,
            dcg: a.dcg,
            recall_levels: &a.recall_levels,
            average_precision: a.map,
            ndcg: a.ndcg,
            cutoffs: &a.cutoffs,
            r_precision: a.r_precision,
        }
    }
}

/// Formats an evaluation for terminal output.
///
/// With `per_topic`, every evaluated topic is printed before the aggregate.
pub fn format_human(evaluation: &Evaluation, per_topic: bool) -> String {
    let mut output = String::new();
    if per_topic {
        for topic in &evaluation.topics {
            render_block(&mut output, &Block::from(topic));
            output.push('\n');
        }
    }
    render_block(&mut output, &Block::from(&evaluation.aggregate));
    output
}

fn render_block(out: &mut String, b: &Block<'_>) {
    let scope = if b.is_aggregate {
        "over all queries"
    } else {
        "for this query"
    };

    out.push_str(&format!("Queryid (Num):    {}\n", b.heading));
    out.push_str(&format!("Total number of documents {}\n", scope));
    out.push_str(&format!("    Retrieved:    {:>6}\n", b.num_ret));
    out.push_str(&format!("    Relevant:     {:>6}\n", b.num_rel));
    out.push_str(&format!("    Rel_ret:      {:>6}\n", b.num_rel_ret));
    out.push_str(&format!("CG:  {:.4}\n", b.cg));
    out.push_str(&format!("DCG: {:.4}\n", b.dcg));

    out.push_str("Interpolated Recall - Precision Averages:\n");
    for point in b.recall_levels {
        out.push_str(&format!(
            "    at {:.2}       {:.4}\n",
            point.recall, point.precision
        ));
    }

    if b.is_aggregate {
        out.push_str("Mean average precision (non-interpolated) over all rel docs\n");
    } else {
        out.push_str("Average precision (non-interpolated) for all rel docs\n");
    }
    out.push_str(&format!("                  {:.4}\n", b.average_precision));
    out.push_str(&format!("nDCG:             {:.4}\n", b.ndcg));

    out.push_str("Cutoff     Precision   Recall      F1\n");
    for c in b.cutoffs {
        out.push_str(&format!(
            "  At {:>4} docs:  {:.4}    {:.4}    {:.4}\n",
            c.cutoff, c.precision, c.recall, c.f1
        ));
    }

    out.push_str("R-Precision (precision after R (= num_rel for a query) docs retrieved):\n");
    out.push_str(&format!("    Exact:        {:.4}\n", b.r_precision));
}

/// JSON output structure
#[derive(Serialize)]
pub struct JsonOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<&'a [TopicResult]>,
    pub aggregate: &'a AggregateResult,
}

/// Formats an evaluation as pretty-printed JSON.
pub fn format_json(evaluation: &Evaluation, per_topic: bool) -> String {
    let output = JsonOutput {
        topics: per_topic.then_some(evaluation.topics.as_slice()),
        aggregate: &evaluation.aggregate,
    };
    let mut json = serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string());
    json.push('\n');
    json
}
