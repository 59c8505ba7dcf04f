//! Round-trip comparison: parse → deparse → re-parse, then tree equality.

use serde::Serialize;
use tracing::debug;

use crate::corpus::CorpusRunConfig;
use crate::engine::{DeparseOptions, SqlEngine};
use crate::normalize::strip_locations;

/// Classification of one statement's round trip.
///
/// Each failing variant carries the context needed to render a diagnostic:
/// the deparsed text and the relevant tree snapshots. Trees on
/// `TreeMismatch` are normalized; everywhere else they are raw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatementVerdict {
    /// Round trip preserved the parse tree
    Pass,
    /// The statement does not parse and the corpus tolerates that
    Skipped { error: String },
    /// The statement does not parse and the corpus demands it does
    ParseFailure { error: String },
    /// The deparser rejected a tree the parser produced
    DeparseFailure { error: String, tree: String },
    /// Deparsed text differs from the source (strict corpora only)
    TextMismatch { deparsed: String, tree: String },
    /// The deparser emitted SQL the parser rejects
    ReparseFailure {
        deparsed: String,
        error: String,
        tree: String,
    },
    /// The re-parsed tree differs from the original after normalization
    TreeMismatch {
        deparsed: String,
        original_tree: String,
        reparsed_tree: String,
    },
}

impl StatementVerdict {
    pub fn is_failure(&self) -> bool {
        !matches!(
            self,
            StatementVerdict::Pass | StatementVerdict::Skipped { .. }
        )
    }

    /// Stage label used in failure reports
    pub fn stage(&self) -> &'static str {
        match self {
            StatementVerdict::Pass => "pass",
            StatementVerdict::Skipped { .. } => "skipped",
            StatementVerdict::ParseFailure { .. } => "parse",
            StatementVerdict::DeparseFailure { .. } => "deparse",
            StatementVerdict::TextMismatch { .. } => "query text",
            StatementVerdict::ReparseFailure { .. } => "reparse",
            StatementVerdict::TreeMismatch { .. } => "parse tree",
        }
    }
}

/// One statement's outcome, with the statement text it was produced from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementOutcome {
    pub statement: String,
    pub verdict: StatementVerdict,
}

/// The round-trip comparator.
///
/// Holds the engine for the duration of a run; every call to [`verify`]
/// produces exactly one verdict and owns its intermediate results only for
/// that call.
///
/// [`verify`]: RoundTrip::verify
pub struct RoundTrip<'e> {
    engine: &'e dyn SqlEngine,
}

impl<'e> RoundTrip<'e> {
    pub fn new(engine: &'e dyn SqlEngine) -> Self {
        Self { engine }
    }

    /// Run the full round trip for one statement.
    pub fn verify(&self, sql: &str, config: &CorpusRunConfig) -> StatementVerdict {
        let tree = match self.engine.parse(sql) {
            Ok(tree) => tree,
            Err(error) => {
                if config.compare_query_text {
                    return StatementVerdict::ParseFailure {
                        error: error.message().to_string(),
                    };
                }
                // Lenient corpora contain intentional syntax errors.
                debug!(%error, "skipping unparseable statement");
                return StatementVerdict::Skipped {
                    error: error.message().to_string(),
                };
            }
        };

        let options = DeparseOptions {
            pretty_print: config.pretty_print,
            trailing_newline: false,
            comments: self.engine.extract_comments(sql),
        };
        let deparsed = match self.engine.deparse(&tree, &options) {
            Ok(deparsed) => deparsed,
            Err(error) => {
                return StatementVerdict::DeparseFailure {
                    error: error.message().to_string(),
                    tree: tree.into_inner(),
                }
            }
        };

        if config.compare_query_text && deparsed != sql {
            return StatementVerdict::TextMismatch {
                deparsed,
                tree: tree.into_inner(),
            };
        }

        // Tree comparison runs whenever parsing succeeded: byte-equal text
        // still has to survive the re-parse.
        let reparsed = match self.engine.parse(&deparsed) {
            Ok(reparsed) => reparsed,
            Err(error) => {
                // A failure here is a deparser bug, not a bad input query.
                return StatementVerdict::ReparseFailure {
                    deparsed,
                    error: error.message().to_string(),
                    tree: tree.into_inner(),
                };
            }
        };

        let original_tree = strip_locations(tree.as_str());
        let reparsed_tree = strip_locations(reparsed.as_str());
        if original_tree != reparsed_tree {
            StatementVerdict::TreeMismatch {
                deparsed,
                original_tree,
                reparsed_tree,
            }
        } else {
            StatementVerdict::Pass
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Comment, ParseTree, StatementSpan};
    use crate::error::EngineError;
    use std::collections::HashMap;

    /// Scripted engine: parse results keyed by input, one deparse result.
    #[derive(Default)]
    struct StubEngine {
        parse_results: HashMap<String, Result<String, String>>,
        deparse_result: Option<Result<String, String>>,
    }

    impl StubEngine {
        fn on_parse(mut self, sql: &str, result: Result<&str, &str>) -> Self {
            self.parse_results.insert(
                sql.to_string(),
                result.map(str::to_string).map_err(str::to_string),
            );
            self
        }

        fn on_deparse(mut self, result: Result<&str, &str>) -> Self {
            self.deparse_result = Some(result.map(str::to_string).map_err(str::to_string));
            self
        }
    }

    impl SqlEngine for StubEngine {
        fn parse(&self, sql: &str) -> Result<ParseTree, EngineError> {
            match self.parse_results.get(sql) {
                Some(Ok(tree)) => Ok(ParseTree::new(tree.clone())),
                Some(Err(message)) => Err(EngineError::Parse {
                    message: message.clone(),
                }),
                None => Err(EngineError::Parse {
                    message: format!("unscripted input: {sql}"),
                }),
            }
        }

        fn deparse(
            &self,
            _tree: &ParseTree,
            _options: &DeparseOptions,
        ) -> Result<String, EngineError> {
            match &self.deparse_result {
                Some(Ok(sql)) => Ok(sql.clone()),
                Some(Err(message)) => Err(EngineError::Deparse {
                    message: message.clone(),
                }),
                None => Err(EngineError::Deparse {
                    message: "unscripted deparse".to_string(),
                }),
            }
        }

        fn extract_comments(&self, _sql: &str) -> Vec<Comment> {
            Vec::new()
        }

        fn split(&self, sql: &str) -> Result<Vec<StatementSpan>, EngineError> {
            Ok(vec![StatementSpan {
                offset: 0,
                length: sql.len(),
            }])
        }
    }

    fn strict() -> CorpusRunConfig {
        CorpusRunConfig {
            compare_query_text: true,
            pretty_print: false,
        }
    }

    fn lenient() -> CorpusRunConfig {
        CorpusRunConfig {
            compare_query_text: false,
            pretty_print: false,
        }
    }

    #[test]
    fn lenient_parse_failure_is_skipped() {
        let engine = StubEngine::default().on_parse("NOT SQL", Err("syntax error"));
        let verdict = RoundTrip::new(&engine).verify("NOT SQL", &lenient());
        assert_eq!(
            verdict,
            StatementVerdict::Skipped {
                error: "syntax error".to_string()
            }
        );
        assert!(!verdict.is_failure());
    }

    #[test]
    fn strict_parse_failure_is_a_failure() {
        let engine = StubEngine::default().on_parse("NOT SQL", Err("syntax error"));
        let verdict = RoundTrip::new(&engine).verify("NOT SQL", &strict());
        assert_eq!(
            verdict,
            StatementVerdict::ParseFailure {
                error: "syntax error".to_string()
            }
        );
        assert!(verdict.is_failure());
        assert_eq!(verdict.stage(), "parse");
    }

    #[test]
    fn deparse_failure_carries_the_tree() {
        let engine = StubEngine::default()
            .on_parse("SELECT 1", Ok(r#"{"k":"v"}"#))
            .on_deparse(Err("unsupported node"));
        let verdict = RoundTrip::new(&engine).verify("SELECT 1", &lenient());
        assert_eq!(
            verdict,
            StatementVerdict::DeparseFailure {
                error: "unsupported node".to_string(),
                tree: r#"{"k":"v"}"#.to_string(),
            }
        );
    }

    #[test]
    fn strict_mode_flags_text_drift() {
        let engine = StubEngine::default()
            .on_parse("SELECT  1", Ok(r#"{"k":"v"}"#))
            .on_deparse(Ok("SELECT 1"));
        let verdict = RoundTrip::new(&engine).verify("SELECT  1", &strict());
        assert!(matches!(verdict, StatementVerdict::TextMismatch { ref deparsed, .. } if deparsed == "SELECT 1"));
    }

    #[test]
    fn lenient_mode_ignores_text_drift() {
        let engine = StubEngine::default()
            .on_parse("SELECT  1", Ok(r#"{"k":"v","location":0}"#))
            .on_parse("SELECT 1", Ok(r#"{"k":"v","location":7}"#))
            .on_deparse(Ok("SELECT 1"));
        let verdict = RoundTrip::new(&engine).verify("SELECT  1", &lenient());
        assert_eq!(verdict, StatementVerdict::Pass);
    }

    #[test]
    fn reparse_failure_is_distinct_from_parse_failure() {
        let engine = StubEngine::default()
            .on_parse("SELECT 1", Ok(r#"{"k":"v"}"#))
            .on_parse("BROKEN OUTPUT", Err("cannot reparse"))
            .on_deparse(Ok("BROKEN OUTPUT"));
        let verdict = RoundTrip::new(&engine).verify("SELECT 1", &lenient());
        assert_eq!(
            verdict,
            StatementVerdict::ReparseFailure {
                deparsed: "BROKEN OUTPUT".to_string(),
                error: "cannot reparse".to_string(),
                tree: r#"{"k":"v"}"#.to_string(),
            }
        );
    }

    #[test]
    fn semantic_drift_is_a_tree_mismatch() {
        let engine = StubEngine::default()
            .on_parse("SELECT 1", Ok(r#"{"k":"one","location":0}"#))
            .on_parse("SELECT 2", Ok(r#"{"k":"two","location":0}"#))
            .on_deparse(Ok("SELECT 2"));
        let verdict = RoundTrip::new(&engine).verify("SELECT 1", &lenient());
        assert_eq!(
            verdict,
            StatementVerdict::TreeMismatch {
                deparsed: "SELECT 2".to_string(),
                original_tree: r#"{"k":"one"}"#.to_string(),
                reparsed_tree: r#"{"k":"two"}"#.to_string(),
            }
        );
    }

    #[test]
    fn location_drift_alone_still_passes() {
        let engine = StubEngine::default()
            .on_parse("SELECT 1", Ok(r#"{"k":"v","location":3}"#))
            .on_parse("SELECT 1 ", Ok(r#"{"k":"v","location":44}"#))
            .on_deparse(Ok("SELECT 1 "));
        let verdict = RoundTrip::new(&engine).verify("SELECT 1", &lenient());
        assert_eq!(verdict, StatementVerdict::Pass);
    }
}
