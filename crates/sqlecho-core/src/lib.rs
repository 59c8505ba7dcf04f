//! sqlecho-core: SQL parse/deparse round-trip verification library
//!
//! This library feeds SQL statements through parse → deparse → re-parse
//! and verifies that the deparsed SQL is semantically faithful to the
//! original, without requiring a second oracle.

pub mod compare;
pub mod corpus;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod report;

pub use compare::{RoundTrip, StatementOutcome, StatementVerdict};
pub use corpus::{CorpusRunConfig, CorpusRunner, Preprocess};
pub use dialect::SqlDialect;
pub use engine::{Comment, DeparseOptions, DialectEngine, ParseTree, SqlEngine, StatementSpan};
pub use error::{CorpusFileError, EngineError};
pub use report::{FailureRecord, RunReport};
