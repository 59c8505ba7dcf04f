//! Per-file corpus running: preprocessing, extraction, comparison.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::compare::{RoundTrip, StatementOutcome};
use crate::engine::SqlEngine;
use crate::error::CorpusFileError;
use crate::extract;

/// Per-corpus comparison mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CorpusRunConfig {
    /// Require the deparsed SQL to equal the input byte for byte
    pub compare_query_text: bool,
    /// Request formatted deparser output
    pub pretty_print: bool,
}

/// Raw-text preprocessing applied to a corpus file before splitting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preprocess {
    /// Slice the buffer from the first occurrence of a marker, dodging a
    /// known-bad leading region the splitter cannot scan
    SkipTo(String),
}

fn apply_preprocess<'a>(content: &'a str, preprocess: Option<&Preprocess>) -> &'a str {
    match preprocess {
        Some(Preprocess::SkipTo(marker)) => match content.find(marker.as_str()) {
            Some(pos) => &content[pos..],
            None => {
                warn!(%marker, "skip marker not found; using the whole file");
                content
            }
        },
        None => content,
    }
}

/// Runs whole corpus files through the round-trip comparator.
pub struct CorpusRunner<'e> {
    engine: &'e dyn SqlEngine,
}

impl<'e> CorpusRunner<'e> {
    pub fn new(engine: &'e dyn SqlEngine) -> Self {
        Self { engine }
    }

    /// Read a corpus file and run every statement in it
    pub fn run_file(
        &self,
        path: &Path,
        config: &CorpusRunConfig,
        preprocess: Option<&Preprocess>,
    ) -> Result<Vec<StatementOutcome>, CorpusFileError> {
        let content = fs::read_to_string(path).map_err(|source| CorpusFileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.run_source(&content, config, preprocess)
    }

    /// Run every statement in an in-memory corpus buffer.
    ///
    /// Each extracted span produces exactly one outcome, in source order.
    /// A splitter failure produces none and surfaces as a file-level error.
    pub fn run_source(
        &self,
        source: &str,
        config: &CorpusRunConfig,
        preprocess: Option<&Preprocess>,
    ) -> Result<Vec<StatementOutcome>, CorpusFileError> {
        let source = apply_preprocess(source, preprocess);
        let stream =
            extract::statements(self.engine, source).map_err(|e| CorpusFileError::Split {
                message: e.message().to_string(),
            })?;

        let comparator = RoundTrip::new(self.engine);
        let mut outcomes = Vec::with_capacity(stream.len());
        for stmt in stream {
            debug!(offset = stmt.span.offset, "verifying statement");
            let verdict = comparator.verify(stmt.text, config);
            outcomes.push(StatementOutcome {
                statement: stmt.text.to_string(),
                verdict,
            });
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::StatementVerdict;
    use crate::engine::DialectEngine;

    fn strict() -> CorpusRunConfig {
        CorpusRunConfig {
            compare_query_text: true,
            pretty_print: false,
        }
    }

    fn lenient() -> CorpusRunConfig {
        CorpusRunConfig::default()
    }

    #[test]
    fn strict_file_passes_end_to_end() {
        let engine = DialectEngine::default();
        let outcomes = CorpusRunner::new(&engine)
            .run_source("SELECT 1; SELECT 2;", &strict(), None)
            .unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes
            .iter()
            .all(|o| o.verdict == StatementVerdict::Pass));
    }

    #[test]
    fn malformed_statement_fails_a_strict_file() {
        let engine = DialectEngine::default();
        let outcomes = CorpusRunner::new(&engine)
            .run_source("SELECT 1 /* bad */ FROM ;", &strict(), None)
            .unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(
            outcomes[0].verdict,
            StatementVerdict::ParseFailure { .. }
        ));
    }

    #[test]
    fn malformed_statement_is_skipped_in_a_lenient_file() {
        let engine = DialectEngine::default();
        let outcomes = CorpusRunner::new(&engine)
            .run_source("THIS IS NOT SQL; SELECT 1;", &lenient(), None)
            .unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(matches!(
            outcomes[0].verdict,
            StatementVerdict::Skipped { .. }
        ));
        assert_eq!(outcomes[1].verdict, StatementVerdict::Pass);
    }

    #[test]
    fn no_statement_is_lost_or_duplicated() {
        let engine = DialectEngine::default();
        let source = "SELECT 1;SELECT 2;SELECT 3;SELECT 4;SELECT 5";
        let outcomes = CorpusRunner::new(&engine)
            .run_source(source, &strict(), None)
            .unwrap();
        let statements: Vec<&str> = outcomes.iter().map(|o| o.statement.as_str()).collect();
        assert_eq!(
            statements,
            vec!["SELECT 1", "SELECT 2", "SELECT 3", "SELECT 4", "SELECT 5"]
        );
    }

    #[test]
    fn unscannable_file_is_a_split_error() {
        let engine = DialectEngine::default();
        let err = CorpusRunner::new(&engine)
            .run_source("SELECT $broken$never closed", &lenient(), None)
            .unwrap_err();
        assert!(matches!(err, CorpusFileError::Split { .. }));
    }

    #[test]
    fn skip_to_dodges_a_bad_leading_region() {
        let engine = DialectEngine::default();
        let source = "SELECT $broken$never closed\n-- bytea\nSELECT 1;";
        let runner = CorpusRunner::new(&engine);

        assert!(runner.run_source(source, &lenient(), None).is_err());

        let preprocess = Preprocess::SkipTo("-- bytea".to_string());
        let outcomes = runner
            .run_source(source, &lenient(), Some(&preprocess))
            .unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].statement, "SELECT 1");
        assert_eq!(outcomes[0].verdict, StatementVerdict::Pass);
    }

    #[test]
    fn missing_skip_marker_runs_the_whole_file() {
        let engine = DialectEngine::default();
        let preprocess = Preprocess::SkipTo("-- bytea".to_string());
        let outcomes = CorpusRunner::new(&engine)
            .run_source("SELECT 1;", &lenient(), Some(&preprocess))
            .unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].verdict, StatementVerdict::Pass);
    }
}
