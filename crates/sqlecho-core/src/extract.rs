//! Statement extraction: a lazy stream of statement texts over one buffer.

use crate::engine::{SqlEngine, StatementSpan};
use crate::error::EngineError;

/// One extracted statement: its span and the resolved text slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedStatement<'a> {
    pub span: StatementSpan,
    pub text: &'a str,
}

/// A finite, non-restartable stream of statements in source order.
///
/// Splitting happens once, up front; on splitter failure the constructor
/// fails and the buffer contributes zero statements.
pub struct StatementStream<'a> {
    source: &'a str,
    spans: std::vec::IntoIter<StatementSpan>,
}

impl<'a> StatementStream<'a> {
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.len() == 0
    }
}

impl<'a> Iterator for StatementStream<'a> {
    type Item = ExtractedStatement<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let span = self.spans.next()?;
        Some(ExtractedStatement {
            span,
            text: span.resolve(self.source),
        })
    }
}

/// Split `source` with the engine's splitter and stream the statements
pub fn statements<'a>(
    engine: &dyn SqlEngine,
    source: &'a str,
) -> Result<StatementStream<'a>, EngineError> {
    let spans = engine.split(source)?;
    Ok(StatementStream {
        source,
        spans: spans.into_iter(),
    })
}
