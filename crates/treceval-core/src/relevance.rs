//! Number of relevant documents per topic.

use crate::qrels::Qrels;
use std::collections::HashMap;

/// topic_id -> number of documents judged relevant (relevance > 0).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelevantCounts {
    counts: HashMap<String, usize>,
}

impl RelevantCounts {
    /// Counts relevant documents for every judged topic.
    ///
    /// Topics whose judgments are all non-positive are present with count 0.
    pub fn from_qrels(qrels: &Qrels) -> Self {
        let counts = qrels
            .iter()
            .map(|(topic, docs)| {
                let relevant = docs.values().filter(|&&rel| rel > 0).count();
                (topic.to_string(), relevant)
            })
            .collect();
        Self { counts }
    }

    /// Relevant documents for a topic; 0 for unknown topics.
    pub fn get(&self, topic_id: &str) -> usize {
        self.counts.get(topic_id).copied().unwrap_or(0)
    }

    /// A topic can only be evaluated if it has at least one relevant document.
    pub fn is_evaluable(&self, topic_id: &str) -> bool {
        self.get(topic_id) > 0
    }

    /// Sum over all topics.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}
