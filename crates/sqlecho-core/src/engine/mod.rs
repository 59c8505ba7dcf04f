//! The collaborator seam: parsing, deparsing, splitting, comment extraction.
//!
//! The harness core never talks to a SQL parser directly; it consumes the
//! [`SqlEngine`] trait. Every call is one-shot and synchronous, and an
//! engine value doubles as the session handle for collaborators with
//! process-wide state: hold one engine, thread it through the run, and all
//! calls are serialized by construction.

mod scanner;

use serde::Serialize;
use sqlparser::ast::Statement;
use sqlparser::parser::Parser;

use crate::dialect::SqlDialect;
use crate::error::EngineError;

/// A serialized parse tree.
///
/// Opaque to the harness: the only operations are comparison (after
/// normalization) and handing it back to the engine that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree(String);

impl ParseTree {
    pub fn new(encoded: String) -> Self {
        ParseTree(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// One statement's position within a source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatementSpan {
    pub offset: usize,
    pub length: usize,
}

impl StatementSpan {
    /// Resolve the span against the buffer it was produced from
    pub fn resolve<'a>(&self, source: &'a str) -> &'a str {
        &source[self.offset..self.offset + self.length]
    }
}

/// A comment with its attachment point (byte offset in the statement text)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub text: String,
    pub offset: usize,
}

/// Options for rendering a parse tree back into SQL
#[derive(Debug, Clone, Default)]
pub struct DeparseOptions {
    pub pretty_print: bool,
    pub trailing_newline: bool,
    /// Comments to re-attach to the rendered SQL, in source order
    pub comments: Vec<Comment>,
}

/// The parser/deparser collaborator bundle.
///
/// Implementations are treated as non-reentrant: the harness never issues
/// two calls concurrently against the same engine.
pub trait SqlEngine {
    /// Parse one statement into a serialized tree
    fn parse(&self, sql: &str) -> Result<ParseTree, EngineError>;

    /// Render a serialized tree back into SQL text
    fn deparse(&self, tree: &ParseTree, options: &DeparseOptions) -> Result<String, EngineError>;

    /// Extract comments with their attachment points, in source order
    fn extract_comments(&self, sql: &str) -> Vec<Comment>;

    /// Split a source buffer into statement spans, in source order
    fn split(&self, sql: &str) -> Result<Vec<StatementSpan>, EngineError>;
}

/// Production engine backed by the `sqlparser` crate.
///
/// Trees are the `serde_json` encoding of the parsed statement list;
/// deparsing renders the decoded AST through its `Display` implementation.
/// Splitting and comment extraction use the raw scanner, which understands
/// quoting and comment contexts the parser would otherwise have to see.
#[derive(Debug, Clone, Copy, Default)]
pub struct DialectEngine {
    dialect: SqlDialect,
}

impl DialectEngine {
    pub fn new(dialect: SqlDialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }
}

impl SqlEngine for DialectEngine {
    fn parse(&self, sql: &str) -> Result<ParseTree, EngineError> {
        let dialect = self.dialect.parser_dialect();
        let statements = Parser::parse_sql(dialect.as_ref(), sql).map_err(|e| {
            EngineError::Parse {
                message: e.to_string(),
            }
        })?;
        if statements.is_empty() {
            return Err(EngineError::Parse {
                message: "input contains no statement".to_string(),
            });
        }
        let encoded = serde_json::to_string(&statements).map_err(|e| EngineError::Parse {
            message: format!("cannot encode parse tree: {e}"),
        })?;
        Ok(ParseTree(encoded))
    }

    fn deparse(&self, tree: &ParseTree, options: &DeparseOptions) -> Result<String, EngineError> {
        let statements: Vec<Statement> =
            serde_json::from_str(tree.as_str()).map_err(|e| EngineError::Deparse {
                message: format!("cannot decode parse tree: {e}"),
            })?;
        if statements.is_empty() {
            return Err(EngineError::Deparse {
                message: "parse tree contains no statement".to_string(),
            });
        }

        let rendered: Vec<String> = statements
            .iter()
            .map(|stmt| {
                if options.pretty_print {
                    format!("{stmt:#}")
                } else {
                    stmt.to_string()
                }
            })
            .collect();
        let mut sql = rendered.join("; ");

        for comment in &options.comments {
            sql.push(' ');
            sql.push_str(&comment.text);
        }
        if options.trailing_newline {
            sql.push('\n');
        }
        Ok(sql)
    }

    fn extract_comments(&self, sql: &str) -> Vec<Comment> {
        scanner::extract_comments(sql)
    }

    fn split(&self, sql: &str) -> Result<Vec<StatementSpan>, EngineError> {
        scanner::split_statements(sql)
    }
}
