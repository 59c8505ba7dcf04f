//! Error types for the harness

use miette::Diagnostic;
use thiserror::Error;

/// Errors surfaced by a [`SqlEngine`](crate::engine::SqlEngine) collaborator.
///
/// Each variant corresponds to one collaborator operation; the comparator
/// classifies them into statement verdicts, so an `EngineError` by itself
/// never aborts a run.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum EngineError {
    /// The statement could not be parsed
    #[error("parse error: {message}")]
    #[diagnostic(code(sqlecho::parse))]
    Parse { message: String },

    /// The parse tree could not be rendered back into SQL
    #[error("deparse error: {message}")]
    #[diagnostic(code(sqlecho::deparse))]
    Deparse { message: String },

    /// The source buffer could not be split into statements
    #[error("split error: {message}")]
    #[diagnostic(code(sqlecho::split))]
    Split { message: String },
}

impl EngineError {
    pub fn message(&self) -> &str {
        match self {
            EngineError::Parse { message }
            | EngineError::Deparse { message }
            | EngineError::Split { message } => message,
        }
    }
}

/// A corpus file that could not be processed at all.
///
/// These are file-level failures: the file contributes zero statements,
/// the failure is recorded once, and the run proceeds with the next file.
#[derive(Debug, Error, Diagnostic)]
pub enum CorpusFileError {
    #[error("cannot read corpus file {path}: {source}")]
    #[diagnostic(code(sqlecho::corpus::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot split corpus file: {message}")]
    #[diagnostic(code(sqlecho::corpus::split))]
    Split { message: String },
}
