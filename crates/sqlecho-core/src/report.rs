//! Run-level result aggregation.

use serde::Serialize;

use crate::compare::StatementOutcome;

/// One recorded failure, in the order it occurred
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum FailureRecord {
    /// A statement failed one of the round-trip stages
    Statement {
        file: String,
        outcome: StatementOutcome,
    },
    /// A whole file was unusable (unreadable or unsplittable)
    File { file: String, error: String },
}

/// Process-lifetime aggregate of a run.
///
/// Failing as soon as any non-pass outcome is recorded; failures are kept
/// in arrival order and never overwritten.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    files: usize,
    passed: usize,
    skipped: usize,
    failures: Vec<FailureRecord>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note that a corpus file was taken up
    pub fn record_file(&mut self) {
        self.files += 1;
    }

    /// Record one statement outcome
    pub fn record(&mut self, file: &str, outcome: StatementOutcome) {
        use crate::compare::StatementVerdict;
        match outcome.verdict {
            StatementVerdict::Pass => self.passed += 1,
            StatementVerdict::Skipped { .. } => self.skipped += 1,
            _ => self.failures.push(FailureRecord::Statement {
                file: file.to_string(),
                outcome,
            }),
        }
    }

    /// Record a file-level failure
    pub fn record_file_error(&mut self, file: &str, error: String) {
        self.failures.push(FailureRecord::File {
            file: file.to_string(),
            error,
        });
    }

    pub fn is_failing(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn files(&self) -> usize {
        self.files
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        format!(
            "{} file(s): {} passed, {} skipped, {} failure(s)",
            self.files,
            self.passed,
            self.skipped,
            self.failures.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::StatementVerdict;

    fn outcome(statement: &str, verdict: StatementVerdict) -> StatementOutcome {
        StatementOutcome {
            statement: statement.to_string(),
            verdict,
        }
    }

    #[test]
    fn empty_report_is_passing() {
        let report = RunReport::new();
        assert!(!report.is_failing());
        assert_eq!(report.summary(), "0 file(s): 0 passed, 0 skipped, 0 failure(s)");
    }

    #[test]
    fn passes_and_skips_do_not_fail_the_run() {
        let mut report = RunReport::new();
        report.record_file();
        report.record("a.sql", outcome("SELECT 1", StatementVerdict::Pass));
        report.record(
            "a.sql",
            outcome(
                "NOT SQL",
                StatementVerdict::Skipped {
                    error: "syntax error".to_string(),
                },
            ),
        );
        assert!(!report.is_failing());
        assert_eq!(report.passed(), 1);
        assert_eq!(report.skipped(), 1);
    }

    #[test]
    fn every_failure_is_kept_in_order() {
        let mut report = RunReport::new();
        report.record(
            "a.sql",
            outcome(
                "SELECT 1",
                StatementVerdict::ParseFailure {
                    error: "first".to_string(),
                },
            ),
        );
        report.record_file_error("b.sql", "unterminated string".to_string());
        report.record(
            "c.sql",
            outcome(
                "SELECT 2",
                StatementVerdict::ParseFailure {
                    error: "second".to_string(),
                },
            ),
        );
        assert!(report.is_failing());
        assert_eq!(report.failures().len(), 3);
        assert!(matches!(
            report.failures()[1],
            FailureRecord::File { ref file, .. } if file == "b.sql"
        ));
    }
}
