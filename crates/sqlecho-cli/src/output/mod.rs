//! Output formatting

use std::io::Write;

use sqlecho_core::error::CorpusFileError;
use sqlecho_core::{RunReport, StatementOutcome, StatementVerdict};

use crate::args::OutputFormat;

/// Streaming formatter for the battery run.
///
/// Human format prints a header per corpus file, one progress marker per
/// passing statement, and one diagnostic block per failure as it happens.
/// JSON format stays silent during the run and dumps the report at the end.
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn file_header(&self, file: &str) {
        if self.format == OutputFormat::Human {
            println!("\n{file}");
        }
    }

    pub fn progress_mark(&self) {
        if self.format == OutputFormat::Human {
            print!(".");
            let _ = std::io::stdout().flush();
        }
    }

    pub fn failure_block(&self, outcome: &StatementOutcome) {
        if self.format != OutputFormat::Human {
            return;
        }
        let statement = &outcome.statement;
        match &outcome.verdict {
            StatementVerdict::ParseFailure { error } => {
                println!("\nERROR for \"{statement}\"\n  {error}");
            }
            StatementVerdict::DeparseFailure { error, tree } => {
                println!("\nERROR for \"{statement}\"\n  {error}\n  parsetree: {tree}");
            }
            StatementVerdict::TextMismatch { deparsed, tree } => {
                println!(
                    "\nQUERY TEXT MISMATCH - expected:\n{statement}\n\nactual:\n{deparsed}\n\noriginal parsetree: {tree}"
                );
            }
            StatementVerdict::ReparseFailure {
                deparsed,
                error,
                tree,
            } => {
                println!(
                    "\nERROR for parsing deparse of \"{statement}\"\n  deparsed sql: {deparsed}\n  error: {error}\n  original parsetree: {tree}"
                );
            }
            StatementVerdict::TreeMismatch {
                deparsed,
                original_tree,
                reparsed_tree,
            } => {
                println!(
                    "\nPARSETREE MISMATCH for parsing deparse of \"{statement}\"\n  deparsed sql: {deparsed}\n  original parsetree: {original_tree}\n  deparsed parsetree: {reparsed_tree}"
                );
            }
            StatementVerdict::Pass | StatementVerdict::Skipped { .. } => {}
        }
    }

    pub fn file_error(&self, file: &str, error: &CorpusFileError) {
        if self.format == OutputFormat::Human {
            println!("\nERROR in corpus file \"{file}\"\n  {error}");
        }
    }

    pub fn finish(&self, report: &RunReport) {
        match self.format {
            OutputFormat::Human => {
                println!();
                eprintln!("{}", report.summary());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(report).unwrap());
            }
        }
    }
}
