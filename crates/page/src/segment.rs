// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Splitting page text into literal text and embedded code

use thiserror::Error;

/// Marker opening an embedded code block.
pub const CODE_START: &str = "<?";

/// Marker closing an embedded code block.
pub const CODE_END: &str = "?>";

/// Errors from page compilation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("code block opened on line {line} is never closed with `?>`")]
    UnterminatedCode { line: usize },
}

/// One span of a page, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Code(String),
}

/// A page split into segments.
///
/// Always starts and ends with a `Text` segment and alternates in between, so
/// `texts().count() == codes().count() + 1`. Text segments may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments {
    segments: Vec<Segment>,
}

impl Segments {
    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Text(t) => Some(t.as_str()),
            Segment::Code(_) => None,
        })
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Code(c) => Some(c.as_str()),
            Segment::Text(_) => None,
        })
    }

    pub fn into_inner(self) -> Vec<Segment> {
        self.segments
    }
}

/// Split `page_text` on `<?` / `?>` markers.
///
/// A `?>` outside a code block is literal text. A `<?` without a matching
/// `?>` is an error rather than trailing code being dropped.
pub fn segment(page_text: &str) -> Result<Segments, CompileError> {
    let mut segments = Vec::new();
    let mut rest = page_text;
    let mut consumed = 0;

    while let Some(start) = rest.find(CODE_START) {
        segments.push(Segment::Text(rest[..start].to_string()));
        let code_begin = start + CODE_START.len();
        let Some(len) = rest[code_begin..].find(CODE_END) else {
            let line = line_of(page_text, consumed + start);
            return Err(CompileError::UnterminatedCode { line });
        };
        segments.push(Segment::Code(rest[code_begin..code_begin + len].to_string()));
        let next = code_begin + len + CODE_END.len();
        consumed += next;
        rest = &rest[next..];
    }
    segments.push(Segment::Text(rest.to_string()));

    Ok(Segments { segments })
}

/// 1-based line number of a byte offset.
fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

#[cfg(test)]
#[path = "segment_tests.rs"]
mod tests;
