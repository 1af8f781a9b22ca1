//! Run store: a system's retrieved documents per topic.
//!
//! # Data Format
//!
//! One retrieved document per line, whitespace-separated:
//!
//! ```text
//! topic_id  author  doc_id   rank  score   annotation
//! 401       Q0      FT934-5  1     14.83   bm25
//! ```
//!
//! Only `topic_id`, `doc_id` and `score` are used. Scores are parsed once,
//! here. Topics and documents keep the order they first appear in the file;
//! a repeated (topic, document) line replaces the score but not the position.

use crate::config::RankingOrder;
use crate::error::{EvalError, InputKind, ParseErrorKind};
use crate::ingest::{ingest_lines, read_input, Ingest};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

/// A retrieved document and the score the system gave it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDoc {
    pub doc_id: String,
    pub score: f64,
}

/// Retrieved documents for a single topic, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunTopic {
    topic_id: String,
    docs: Vec<RankedDoc>,
    positions: HashMap<String, usize>,
}

impl RunTopic {
    fn new(topic_id: &str) -> Self {
        Self {
            topic_id: topic_id.to_string(),
            ..Self::default()
        }
    }

    fn upsert(&mut self, doc_id: &str, score: f64) {
        match self.positions.get(doc_id) {
            Some(&pos) => self.docs[pos].score = score,
            None => {
                self.positions.insert(doc_id.to_string(), self.docs.len());
                self.docs.push(RankedDoc {
                    doc_id: doc_id.to_string(),
                    score,
                });
            }
        }
    }

    /// Topic identifier.
    pub fn topic_id(&self) -> &str {
        &self.topic_id
    }

    /// Documents in the order they appear in the run file.
    pub fn docs(&self) -> &[RankedDoc] {
        &self.docs
    }

    /// Number of distinct retrieved documents.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Returns true if no document was retrieved.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Documents in evaluation order.
    ///
    /// [`RankingOrder::Score`] sorts by descending score and breaks ties by
    /// ascending document id; [`RankingOrder::FileOrder`] keeps file order.
    pub fn ranked(&self, order: RankingOrder) -> Vec<&RankedDoc> {
        let mut ranked: Vec<&RankedDoc> = self.docs.iter().collect();
        if order == RankingOrder::Score {
            ranked.sort_by(|a, b| by_score_then_id(a, b));
        }
        ranked
    }
}

fn by_score_then_id(a: &RankedDoc, b: &RankedDoc) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.doc_id.cmp(&b.doc_id))
}

/// Ranked results: topic_id -> retrieved documents, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    topics: Vec<RunTopic>,
    index: HashMap<String, usize>,
}

impl Run {
    /// Creates an empty run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a retrieved document for a topic.
    pub fn insert(&mut self, topic_id: &str, doc_id: &str, score: f64) {
        let idx = match self.index.get(topic_id) {
            Some(&idx) => idx,
            None => {
                self.index.insert(topic_id.to_string(), self.topics.len());
                self.topics.push(RunTopic::new(topic_id));
                self.topics.len() - 1
            }
        };
        self.topics[idx].upsert(doc_id, score);
    }

    /// Parses run text. Malformed lines are skipped and reported.
    pub fn parse(text: &str) -> Ingest<Run> {
        ingest_lines(InputKind::Run, text, Run::new(), |run, fields| {
            let score = parse_score(fields[4])?;
            run.insert(fields[0], fields[2], score);
            Ok(())
        })
    }

    /// Loads and parses a run file.
    ///
    /// An unreadable path is fatal; malformed lines are not.
    pub fn load(path: impl AsRef<Path>) -> Result<Ingest<Run>, EvalError> {
        let text = read_input(path.as_ref())?;
        Ok(Self::parse(&text))
    }

    /// Retrieved documents for a topic.
    pub fn topic(&self, topic_id: &str) -> Option<&RunTopic> {
        self.index.get(topic_id).map(|&idx| &self.topics[idx])
    }

    /// Topics in the order they first appear in the run file.
    pub fn topics(&self) -> &[RunTopic] {
        &self.topics
    }

    /// Number of topics with at least one retrieved document.
    pub fn num_topics(&self) -> usize {
        self.topics.len()
    }

    /// Returns true if the run retrieved nothing.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

fn parse_score(field: &str) -> Result<f64, ParseErrorKind> {
    match field.parse::<f64>() {
        Ok(score) if score.is_finite() => Ok(score),
        _ => Err(ParseErrorKind::InvalidScore(field.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_ids(docs: &[&RankedDoc]) -> Vec<String> {
        docs.iter().map(|d| d.doc_id.clone()).collect()
    }

    #[test]
    fn test_parse_preserves_file_order() {
        let ingest = Run::parse("T2 Q0 b 1 3.0 x\nT1 Q0 z 1 9.5 x\nT1 Q0 a 2 8.0 x\n");
        assert!(ingest.is_clean());

        let run = ingest.data;
        let topics: Vec<&str> = run.topics().iter().map(|t| t.topic_id()).collect();
        assert_eq!(topics, vec!["T2", "T1"]);

        let t1 = run.topic("T1").unwrap();
        assert_eq!(t1.len(), 2);
        assert_eq!(t1.docs()[0].doc_id, "z");
        assert_eq!(t1.docs()[0].score, 9.5);
    }

    #[test]
    fn test_duplicate_doc_keeps_position_updates_score() {
        let run = Run::parse("T1 Q0 a 1 3.0 x\nT1 Q0 b 2 2.0 x\nT1 Q0 a 3 1.0 x\n").data;
        let t1 = run.topic("T1").unwrap();
        assert_eq!(t1.len(), 2);
        assert_eq!(t1.docs()[0].doc_id, "a");
        assert_eq!(t1.docs()[0].score, 1.0);
    }

    #[test]
    fn test_score_order_descending_with_id_tiebreak() {
        let run = Run::parse(
            "T1 Q0 low 1 0.1 x\nT1 Q0 tie_b 2 0.5 x\nT1 Q0 high 3 0.9 x\nT1 Q0 tie_a 4 0.5 x\n",
        )
        .data;
        let t1 = run.topic("T1").unwrap();

        assert_eq!(
            doc_ids(&t1.ranked(RankingOrder::Score)),
            vec!["high", "tie_a", "tie_b", "low"]
        );
        assert_eq!(
            doc_ids(&t1.ranked(RankingOrder::FileOrder)),
            vec!["low", "tie_b", "high", "tie_a"]
        );
    }

    #[test]
    fn test_negative_scores_rank_below_positive() {
        let run = Run::parse("T1 Q0 a 1 -2.5 x\nT1 Q0 b 2 1e-3 x\n").data;
        let ranked = run.topic("T1").unwrap().ranked(RankingOrder::Score);
        assert_eq!(doc_ids(&ranked), vec!["b", "a"]);
    }

    #[test]
    fn test_invalid_score_and_field_count_are_skipped() {
        let ingest =
            Run::parse("T1 Q0 a 1 abc x\nT1 Q0 b 2 NaN x\nT1 Q0 c 3 1.0\nT1 Q0 d 4 1.0 x\n");
        assert_eq!(ingest.skipped.len(), 3);
        assert_eq!(
            ingest.skipped[0].kind,
            ParseErrorKind::InvalidScore("abc".to_string())
        );
        assert_eq!(
            ingest.skipped[1].kind,
            ParseErrorKind::InvalidScore("NaN".to_string())
        );
        assert_eq!(ingest.data.topic("T1").unwrap().len(), 1);
    }

    #[test]
    fn test_rank_field_is_not_validated() {
        let run = Run::parse("T1 Q0 a first 1.0 x\n").data;
        assert_eq!(run.topic("T1").unwrap().len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let ingest = Run::parse("\n");
        assert!(ingest.data.is_empty());
        assert!(ingest.is_clean());
    }
}
