//! Raw SQL scanning: statement boundaries and comment extraction.
//!
//! A naive split on `;` mishandles semicolons inside string literals,
//! quoted identifiers, dollar-quoted blocks, and comments. The scanner
//! tracks those lexical contexts byte by byte, which is all the statement
//! splitter and the comment extractor need; no tokens are produced.

use crate::engine::{Comment, StatementSpan};
use crate::error::EngineError;

/// Split a source buffer into trimmed statement spans.
///
/// Spans exclude the terminating semicolon and are trimmed of surrounding
/// whitespace and leading standalone comments; spans left empty by the
/// trimming are dropped. An unterminated quoting or comment context makes
/// the whole buffer unusable.
pub(crate) fn split_statements(sql: &str) -> Result<Vec<StatementSpan>, EngineError> {
    let bytes = sql.as_bytes();
    let mut spans = Vec::new();
    let mut stmt_start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' => i = scan_quoted(sql, i, b'\'')?,
            b'"' => i = scan_quoted(sql, i, b'"')?,
            b'$' => i = scan_dollar_quoted(sql, i)?,
            b'-' if bytes.get(i + 1) == Some(&b'-') => i = line_comment_end(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = scan_block_comment(sql, i)?,
            b';' => {
                push_span(sql, stmt_start, i, &mut spans);
                i += 1;
                stmt_start = i;
            }
            _ => i += 1,
        }
    }
    push_span(sql, stmt_start, bytes.len(), &mut spans);
    Ok(spans)
}

/// Extract every comment outside quoting contexts, in source order.
///
/// Comment text keeps its delimiters; the offset is the byte position of
/// the comment start. Line comment text stops before the newline.
pub(crate) fn extract_comments(sql: &str) -> Vec<Comment> {
    let bytes = sql.as_bytes();
    let mut comments = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' => i = scan_quoted(sql, i, b'\'').unwrap_or(bytes.len()),
            b'"' => i = scan_quoted(sql, i, b'"').unwrap_or(bytes.len()),
            b'$' => i = scan_dollar_quoted(sql, i).unwrap_or(bytes.len()),
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                let end = line_comment_end(bytes, i);
                comments.push(Comment {
                    text: sql[i..end].to_string(),
                    offset: i,
                });
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = scan_block_comment(sql, i).unwrap_or(bytes.len());
                comments.push(Comment {
                    text: sql[i..end].to_string(),
                    offset: i,
                });
                i = end;
            }
            _ => i += 1,
        }
    }
    comments
}

/// Scan past a quoted region opened at `start`; `quote` doubling escapes.
fn scan_quoted(sql: &str, start: usize, quote: u8) -> Result<usize, EngineError> {
    let bytes = sql.as_bytes();
    let mut i = start + 1;
    while i < bytes.len() {
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
            } else {
                return Ok(i + 1);
            }
        } else {
            i += 1;
        }
    }
    Err(EngineError::Split {
        message: format!("unterminated quoted region starting at byte {start}"),
    })
}

/// Scan past a dollar-quoted block opened at `start`, or step over a `$`
/// that does not open one (e.g. a `$1` parameter reference).
fn scan_dollar_quoted(sql: &str, start: usize) -> Result<usize, EngineError> {
    let bytes = sql.as_bytes();
    let mut j = start + 1;
    while j < bytes.len() && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'_') {
        j += 1;
    }
    if j >= bytes.len() || bytes[j] != b'$' {
        return Ok(start + 1);
    }
    let delimiter = &sql[start..=j];
    let body_start = j + 1;
    match sql[body_start..].find(delimiter) {
        Some(pos) => Ok(body_start + pos + delimiter.len()),
        None => Err(EngineError::Split {
            message: format!("unterminated dollar-quoted block starting at byte {start}"),
        }),
    }
}

/// Scan past a block comment opened at `start`; comments nest.
fn scan_block_comment(sql: &str, start: usize) -> Result<usize, EngineError> {
    let bytes = sql.as_bytes();
    let mut depth = 1usize;
    let mut i = start + 2;
    while i < bytes.len() {
        if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
            depth -= 1;
            i += 2;
            if depth == 0 {
                return Ok(i);
            }
        } else if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
            depth += 1;
            i += 2;
        } else {
            i += 1;
        }
    }
    Err(EngineError::Split {
        message: format!("unterminated block comment starting at byte {start}"),
    })
}

fn line_comment_end(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|pos| start + pos)
        .unwrap_or(bytes.len())
}

fn push_span(sql: &str, start: usize, end: usize, spans: &mut Vec<StatementSpan>) {
    if let Some(span) = trim_span(sql, start, end) {
        spans.push(span);
    }
}

/// Trim whitespace on both ends and standalone comments on the left.
///
/// Any comment starting inside the raw span also ends inside it: the main
/// scan already stepped over it without finding a statement boundary.
fn trim_span(sql: &str, mut start: usize, mut end: usize) -> Option<StatementSpan> {
    let bytes = sql.as_bytes();
    loop {
        while start < end && bytes[start].is_ascii_whitespace() {
            start += 1;
        }
        if start + 1 < end && bytes[start] == b'-' && bytes[start + 1] == b'-' {
            start = line_comment_end(bytes, start).min(end);
            continue;
        }
        if start + 1 < end && bytes[start] == b'/' && bytes[start + 1] == b'*' {
            start = scan_block_comment(sql, start).unwrap_or(end).min(end);
            continue;
        }
        break;
    }
    while end > start && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    (start < end).then(|| StatementSpan {
        offset: start,
        length: end - start,
    })
}
