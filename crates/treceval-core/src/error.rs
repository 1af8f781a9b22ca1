//! Error types for treceval-core.
//!
//! [`ParseError`] describes a single malformed input line. Ingestion reports
//! and skips these. [`EvalError`] is fatal and aborts the evaluation.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which input a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Relevance judgments (`topic author doc relevance`).
    Qrels,
    /// Ranked results (`topic author doc rank score annotation`).
    Run,
}

impl InputKind {
    /// Number of whitespace-separated fields a line of this input must have.
    pub fn expected_fields(self) -> usize {
        match self {
            InputKind::Qrels => 4,
            InputKind::Run => 6,
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Qrels => write!(f, "qrels"),
            InputKind::Run => write!(f, "run"),
        }
    }
}

/// Why a line was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    /// The line did not split into the expected number of fields
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    /// The relevance field is not an integer
    #[error("invalid relevance '{0}'")]
    InvalidRelevance(String),
    /// The score field is not a finite number
    #[error("invalid score '{0}'")]
    InvalidScore(String),
}

/// A malformed line in a judgment or run input.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{input} line {line}: {kind}")]
pub struct ParseError {
    /// Input the line belongs to
    pub input: InputKind,
    /// 1-based line number
    pub line: usize,
    /// Reason the line was rejected
    pub kind: ParseErrorKind,
}

impl ParseError {
    /// Creates a parse error for the given input line.
    pub fn new(input: InputKind, line: usize, kind: ParseErrorKind) -> Self {
        Self { input, line, kind }
    }
}

/// Fatal evaluation errors.
#[derive(Debug, Error)]
pub enum EvalError {
    /// An input file could not be opened or read
    #[error("Failed to read {}: {source}", .path.display())]
    MissingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// No topic had both judgments with a relevant document and run results
    #[error("No topic has run results and at least one relevant judgment")]
    EmptyCorpus,
    /// Evaluation parameters are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new(
            InputKind::Qrels,
            7,
            ParseErrorKind::FieldCount {
                expected: 4,
                found: 3,
            },
        );
        assert_eq!(err.to_string(), "qrels line 7: expected 4 fields, found 3");
    }

    #[test]
    fn test_missing_file_display_includes_path() {
        let err = EvalError::MissingFile {
            path: PathBuf::from("/no/such/qrels.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/no/such/qrels.txt"), "{}", msg);
    }

    #[test]
    fn test_expected_fields() {
        assert_eq!(InputKind::Qrels.expected_fields(), 4);
        assert_eq!(InputKind::Run.expected_fields(), 6);
    }
}
