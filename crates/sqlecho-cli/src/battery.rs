//! The corpus battery driver

use miette::{IntoDiagnostic, Result};
use sqlecho_core::{CorpusRunner, DialectEngine, RunReport, SqlDialect, StatementVerdict};
use tracing::{debug, warn};

use crate::args::OutputFormat;
use crate::config::Config;
use crate::output::OutputFormatter;

/// Run every corpus in the battery, in order, and aggregate the report.
///
/// Failures never abort the run: a failing statement moves on to the next
/// statement, an unusable file (I/O or split error) is recorded as one
/// failure and the battery moves on to the next file.
pub fn run_battery(
    config: &Config,
    dialect: SqlDialect,
    format: OutputFormat,
) -> Result<RunReport> {
    let engine = DialectEngine::new(dialect);
    let runner = CorpusRunner::new(&engine);
    let formatter = OutputFormatter::new(format);
    let mut report = RunReport::new();

    for corpus in &config.corpora {
        debug!(corpus = %corpus.name, "running corpus");
        let run_config = corpus.run_config();

        for pattern in &corpus.files {
            let mut matched = false;
            for path in glob::glob(pattern).into_diagnostic()?.flatten() {
                matched = true;
                let display = path.display().to_string();
                formatter.file_header(&display);
                report.record_file();

                let preprocess = corpus.preprocess_for(&path);
                match runner.run_file(&path, &run_config, preprocess.as_ref()) {
                    Ok(outcomes) => {
                        for outcome in outcomes {
                            if outcome.verdict.is_failure() {
                                formatter.failure_block(&outcome);
                            } else if outcome.verdict == StatementVerdict::Pass {
                                formatter.progress_mark();
                            }
                            report.record(&display, outcome);
                        }
                    }
                    Err(error) => {
                        formatter.file_error(&display, &error);
                        report.record_file_error(&display, error.to_string());
                    }
                }
            }
            if !matched {
                warn!(corpus = %corpus.name, %pattern, "corpus pattern matched no files");
            }
        }
    }

    formatter.finish(&report);
    Ok(report)
}
