//! Line-oriented ingestion shared by the judgment and run stores.
//!
//! Both inputs are whitespace-delimited text with a fixed number of fields per
//! line. A malformed line never aborts ingestion: it is logged, recorded in
//! [`Ingest::skipped`], and the remaining lines are still read. Blank lines,
//! including the trailing empty line every input file ends with, are not data.

use crate::error::{EvalError, InputKind, ParseError, ParseErrorKind};
use std::path::Path;
use tracing::{info, warn};

/// A parsed store together with the lines that had to be skipped.
#[derive(Debug, Clone)]
pub struct Ingest<T> {
    /// The store built from every well-formed line
    pub data: T,
    /// One entry per rejected line, in input order
    pub skipped: Vec<ParseError>,
}

impl<T> Ingest<T> {
    /// Returns true if every data line was accepted.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Discards the parse report.
    pub fn into_data(self) -> T {
        self.data
    }
}

/// Reads a whole input file.
pub(crate) fn read_input(path: &Path) -> Result<String, EvalError> {
    std::fs::read_to_string(path).map_err(|source| EvalError::MissingFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Splits `text` into lines and hands each well-formed one to `apply`.
///
/// `apply` receives exactly `input.expected_fields()` fields.
pub(crate) fn ingest_lines<T, F>(
    input: InputKind,
    text: &str,
    mut data: T,
    mut apply: F,
) -> Ingest<T>
where
    F: FnMut(&mut T, &[&str]) -> Result<(), ParseErrorKind>,
{
    let expected = input.expected_fields();
    let mut skipped = Vec::new();
    let mut accepted = 0usize;

    for (idx, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }

        let result = if fields.len() != expected {
            Err(ParseErrorKind::FieldCount {
                expected,
                found: fields.len(),
            })
        } else {
            apply(&mut data, &fields)
        };

        match result {
            Ok(()) => accepted += 1,
            Err(kind) => {
                let err = ParseError::new(input, idx + 1, kind);
                warn!("Skipping malformed line: {}", err);
                skipped.push(err);
            }
        }
    }

    info!(
        "Ingested {} {} lines ({} skipped)",
        accepted,
        input,
        skipped.len()
    );

    Ingest { data, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_lines(text: &str) -> Ingest<Vec<String>> {
        ingest_lines(InputKind::Qrels, text, Vec::new(), |acc, fields| {
            if fields[3] == "bad" {
                return Err(ParseErrorKind::InvalidRelevance(fields[3].to_string()));
            }
            acc.push(fields[2].to_string());
            Ok(())
        })
    }

    #[test]
    fn test_trailing_empty_line_is_not_data() {
        let ingest = count_lines("1 a d1 1\n1 a d2 0\n");
        assert_eq!(ingest.data, vec!["d1", "d2"]);
        assert!(ingest.is_clean());
    }

    #[test]
    fn test_malformed_lines_are_skipped_and_reported() {
        let ingest = count_lines("1 a d1 1\n1 a d2\n1 a d3 bad\n1 a d4 2\n");
        assert_eq!(ingest.data, vec!["d1", "d4"]);
        assert_eq!(ingest.skipped.len(), 2);
        assert_eq!(ingest.skipped[0].line, 2);
        assert_eq!(
            ingest.skipped[0].kind,
            ParseErrorKind::FieldCount {
                expected: 4,
                found: 3
            }
        );
        assert_eq!(ingest.skipped[1].line, 3);
    }

    #[test]
    fn test_tabs_and_spaces_both_delimit() {
        let ingest = count_lines("1\tauthor\td1\t1\n1  author  d2  2\n");
        assert_eq!(ingest.data, vec!["d1", "d2"]);
    }

    #[test]
    fn test_blank_interior_lines_are_ignored() {
        let ingest = count_lines("1 a d1 1\n\n   \n1 a d2 1\n");
        assert_eq!(ingest.data.len(), 2);
        assert!(ingest.is_clean());
    }

    #[test]
    fn test_read_input_missing_file() {
        let err = read_input(Path::new("/definitely/not/here.qrels")).unwrap_err();
        assert!(matches!(err, EvalError::MissingFile { .. }));
    }
}
