//! Judgment store: ground-truth relevance labels per topic.
//!
//! # Data Format
//!
//! One judgment per line, whitespace-separated:
//!
//! ```text
//! topic_id  author  doc_id  relevance
//! 401       bob     FT934-5 2
//! 401       bob     FT934-9 0
//! ```
//!
//! Relevance is an integer. Values `<= 0` mean not relevant; positive values
//! are relevant and their magnitude is the graded gain used by nDCG. When the
//! same (topic, document) pair is judged twice, the last line wins.

use crate::error::{EvalError, InputKind, ParseErrorKind};
use crate::ingest::{ingest_lines, read_input, Ingest};
use std::collections::HashMap;
use std::path::Path;

/// Judgments for one topic: doc_id -> relevance.
pub type TopicJudgments = HashMap<String, i32>;

/// Relevance judgments: topic_id -> (doc_id -> relevance).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Qrels {
    topics: HashMap<String, TopicJudgments>,
}

/// How grades from several annotators are reconciled by [`Qrels::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// Grades add up across annotators.
    #[default]
    Sum,
    /// The highest grade wins.
    Max,
}

impl MergeStrategy {
    fn combine(self, current: i32, incoming: i32) -> i32 {
        match self {
            MergeStrategy::Sum => current.saturating_add(incoming),
            MergeStrategy::Max => current.max(incoming),
        }
    }
}

impl Qrels {
    /// Creates an empty judgment store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a judgment, replacing any earlier grade for the same pair.
    pub fn insert(&mut self, topic_id: &str, doc_id: &str, relevance: i32) {
        self.topics
            .entry(topic_id.to_string())
            .or_default()
            .insert(doc_id.to_string(), relevance);
    }

    /// Parses judgment text. Malformed lines are skipped and reported.
    pub fn parse(text: &str) -> Ingest<Qrels> {
        ingest_lines(InputKind::Qrels, text, Qrels::new(), |qrels, fields| {
            let relevance: i32 = fields[3]
                .parse()
                .map_err(|_| ParseErrorKind::InvalidRelevance(fields[3].to_string()))?;
            qrels.insert(fields[0], fields[2], relevance);
            Ok(())
        })
    }

    /// Loads and parses a judgment file.
    ///
    /// An unreadable path is fatal; malformed lines are not.
    pub fn load(path: impl AsRef<Path>) -> Result<Ingest<Qrels>, EvalError> {
        let text = read_input(path.as_ref())?;
        Ok(Self::parse(&text))
    }

    /// Judgments for a topic, if it was judged at all.
    pub fn topic(&self, topic_id: &str) -> Option<&TopicJudgments> {
        self.topics.get(topic_id)
    }

    /// Relevance of a document for a topic; unjudged documents are 0.
    pub fn relevance(&self, topic_id: &str, doc_id: &str) -> i32 {
        self.topics
            .get(topic_id)
            .and_then(|docs| docs.get(doc_id))
            .copied()
            .unwrap_or(0)
    }

    /// Iterates over `(topic_id, judgments)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TopicJudgments)> {
        self.topics.iter().map(|(topic, docs)| (topic.as_str(), docs))
    }

    /// Number of judged topics.
    pub fn num_topics(&self) -> usize {
        self.topics.len()
    }

    /// Total number of (topic, document) judgments.
    pub fn num_judgments(&self) -> usize {
        self.topics.values().map(|d| d.len()).sum()
    }

    /// Returns true if nothing was judged.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Combines judgments from several annotators.
    ///
    /// A pair judged by a single annotator keeps its grade; a pair judged by
    /// several is reconciled with `strategy`, folding sources in order.
    pub fn merge<'a, I>(sources: I, strategy: MergeStrategy) -> Qrels
    where
        I: IntoIterator<Item = &'a Qrels>,
    {
        let mut merged = Qrels::new();
        for source in sources {
            for (topic, docs) in &source.topics {
                let target = merged.topics.entry(topic.clone()).or_default();
                for (doc, &rel) in docs {
                    target
                        .entry(doc.clone())
                        .and_modify(|current| *current = strategy.combine(*current, rel))
                        .or_insert(rel);
                }
            }
        }
        merged
    }

    /// Renders the store in judgment-file format, sorted by topic then doc.
    pub fn to_lines(&self, author: &str) -> Vec<String> {
        let mut topics: Vec<&String> = self.topics.keys().collect();
        topics.sort();

        let mut lines = Vec::with_capacity(self.num_judgments());
        for topic in topics {
            let docs = &self.topics[topic];
            let mut doc_ids: Vec<&String> = docs.keys().collect();
            doc_ids.sort();
            for doc in doc_ids {
                lines.push(format!("{}\t{}\t{}\t{}", topic, author, doc, docs[doc]));
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let ingest = Qrels::parse("T1 bob d1 1\nT1 bob d2 0\nT1 bob d3 2\nT2 ann d1 -1\n");
        assert!(ingest.is_clean());

        let qrels = ingest.data;
        assert_eq!(qrels.num_topics(), 2);
        assert_eq!(qrels.num_judgments(), 4);
        assert_eq!(qrels.relevance("T1", "d3"), 2);
        assert_eq!(qrels.relevance("T2", "d1"), -1);
    }

    #[test]
    fn test_unjudged_document_is_not_relevant() {
        let qrels = Qrels::parse("T1 bob d1 1\n").data;
        assert_eq!(qrels.relevance("T1", "missing"), 0);
        assert_eq!(qrels.relevance("T9", "d1"), 0);
        assert!(qrels.topic("T9").is_none());
    }

    #[test]
    fn test_last_judgment_wins() {
        let qrels = Qrels::parse("T1 bob d1 1\nT1 ann d1 3\n").data;
        assert_eq!(qrels.relevance("T1", "d1"), 3);
        assert_eq!(qrels.num_judgments(), 1);
    }

    #[test]
    fn test_short_line_skipped_later_lines_kept() {
        let ingest = Qrels::parse("T1 bob d1 1\nT1 bob d2\nT1 bob d3 2\n");
        assert_eq!(ingest.skipped.len(), 1);
        assert_eq!(ingest.skipped[0].line, 2);
        assert_eq!(ingest.data.relevance("T1", "d3"), 2);
        assert_eq!(ingest.data.num_judgments(), 2);
    }

    #[test]
    fn test_non_integer_relevance_is_skipped() {
        let ingest = Qrels::parse("T1 bob d1 high\nT1 bob d2 1.5\nT1 bob d3 1\n");
        assert_eq!(ingest.skipped.len(), 2);
        assert_eq!(
            ingest.skipped[0].kind,
            ParseErrorKind::InvalidRelevance("high".to_string())
        );
        assert_eq!(ingest.data.num_judgments(), 1);
    }

    #[test]
    fn test_merge_sum_and_max() {
        let a = Qrels::parse("T1 ann d1 1\nT1 ann d2 2\n").data;
        let b = Qrels::parse("T1 bob d1 2\nT2 bob d9 1\n").data;

        let summed = Qrels::merge([&a, &b], MergeStrategy::Sum);
        assert_eq!(summed.relevance("T1", "d1"), 3);
        assert_eq!(summed.relevance("T1", "d2"), 2);
        assert_eq!(summed.relevance("T2", "d9"), 1);

        let maxed = Qrels::merge([&a, &b], MergeStrategy::Max);
        assert_eq!(maxed.relevance("T1", "d1"), 2);
        assert_eq!(maxed.num_judgments(), 3);
    }

    #[test]
    fn test_to_lines_sorted() {
        let qrels = Qrels::parse("T2 x d1 1\nT1 x d2 0\nT1 x d1 2\n").data;
        assert_eq!(
            qrels.to_lines("merged"),
            vec![
                "T1\tmerged\td1\t2".to_string(),
                "T1\tmerged\td2\t0".to_string(),
                "T2\tmerged\td1\t1".to_string(),
            ]
        );
    }

    #[test]
    fn test_to_lines_round_trips_through_parse() {
        let qrels = Qrels::parse("T1 x d1 1\nT1 x d2 -2\n").data;
        let text = qrels.to_lines("x").join("\n");
        assert_eq!(Qrels::parse(&text).data, qrels);
    }
}
