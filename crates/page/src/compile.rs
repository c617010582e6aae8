// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Script assembly
//!
//! The assembled script is, in order:
//!
//! ```text
//! [side-channel preamble]      only when the page uses a directive
//! print("<token>", end="")     stands in for text segment 0
//! <code segment 1>
//! print("<token>", end="")     stands in for text segment 1
//! ...
//! <code segment n>
//! print("<token>", end="")     stands in for text segment n
//! ```
//!
//! Running it prints the token wherever literal text belongs, which
//! [`crate::reassemble`] later swaps back for the text itself.

use crate::segment::{segment, CompileError, Segment};
use crate::token::RenderToken;

/// Directive granting a page read access to the request headers.
pub const REQUEST_HEADERS_DIRECTIVE: &str = "import RequestHeaders";

/// Directive granting a page the configured server root.
pub const SERVER_ROOT_DIRECTIVE: &str = "import ServerRoot";

/// Variable the preamble loads the side channel into.
const SERVER_INFO_VAR: &str = "__server_info";

/// Which server-provided values a page asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageImports {
    pub request_headers: bool,
    pub server_root: bool,
}

impl PageImports {
    /// True when the page needs a side channel at all.
    pub fn any(&self) -> bool {
        self.request_headers || self.server_root
    }
}

/// A page ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPage {
    /// Full script source.
    pub script: String,
    /// Literal text segments, in page order.
    pub texts: Vec<String>,
    /// Directives found in the page's code.
    pub imports: PageImports,
}

/// Compile page text into a script that prints `token` in place of each text
/// segment.
pub fn compile(page_text: &str, token: &RenderToken) -> Result<CompiledPage, CompileError> {
    let segments = segment(page_text)?;

    let mut imports = PageImports::default();
    let mut body = String::new();
    let mut texts = Vec::new();
    body.push_str(&emit_marker(token));

    for seg in segments.into_inner() {
        match seg {
            Segment::Text(text) => texts.push(text),
            Segment::Code(code) => {
                let code = rewrite_directives(&normalize_code(&code), &mut imports);
                body.push_str(&code);
                body.push_str(&emit_marker(token));
            }
        }
    }

    let script = if imports.any() { format!("{}{}", preamble(token), body) } else { body };

    Ok(CompiledPage { script, texts, imports })
}

/// The one-line statement that writes the token with no separator.
pub fn emit_marker(token: &RenderToken) -> String {
    format!("print(\"{}\", end=\"\")\n", token)
}

/// Loads `./<token>.header` into `__server_info`. Paths are relative because
/// the interpreter runs in the page's directory.
fn preamble(token: &RenderToken) -> String {
    format!(
        "import json as __weave_json\n\
         with open(\"./{file}\", \"r\", encoding=\"utf-8\") as __weave_f:\n    \
         {var} = __weave_json.load(__weave_f)\n",
        file = token.side_channel_file_name(),
        var = SERVER_INFO_VAR,
    )
}

/// Make a code block stand on its own at column zero.
///
/// Code on the opening marker's line is trimmed and the remaining lines lose
/// their common indentation. If the first line opens a block (ends with `:`),
/// the first body line sets the body's depth: lines at least that deep are
/// nested one level under it, shallower lines (`else:`, `except ...:`) stay
/// siblings of the first line. Always ends with a newline.
fn normalize_code(code: &str) -> String {
    let mut lines = code.lines();
    let first = lines.next().unwrap_or("").trim();
    let rest: Vec<&str> = lines.collect();

    let mut depths = rest.iter().filter(|l| !l.trim().is_empty()).map(|l| indent_of(l));
    let body = depths.next().unwrap_or(0);
    let base = depths.fold(body, usize::min);
    let nested = first.ends_with(':');

    let mut out = String::with_capacity(code.len() + 1);
    out.push_str(first);
    out.push('\n');
    for line in rest {
        if line.trim().is_empty() {
            out.push('\n');
            continue;
        }
        let line = line.trim_end();
        if nested && indent_of(line) >= body {
            out.push_str("    ");
            out.push_str(&line[body..]);
        } else {
            out.push_str(&line[base..]);
        }
        out.push('\n');
    }
    out
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Replace directive lines with assignments from the side channel.
fn rewrite_directives(code: &str, imports: &mut PageImports) -> String {
    let mut out = String::with_capacity(code.len());
    for line in code.split_inclusive('\n') {
        let content = line.trim_end_matches('\n');
        let leading = &content[..content.len() - content.trim_start_matches([' ', '\t']).len()];
        match content.trim() {
            REQUEST_HEADERS_DIRECTIVE => {
                imports.request_headers = true;
                out.push_str(&format!("{leading}RequestHeaders = {SERVER_INFO_VAR}[\"headers\"]\n"));
            }
            SERVER_ROOT_DIRECTIVE => {
                imports.server_root = true;
                out.push_str(&format!("{leading}ServerRoot = {SERVER_INFO_VAR}[\"server_root\"]\n"));
            }
            _ => out.push_str(line),
        }
    }
    out
}

#[cfg(test)]
#[path = "compile_tests.rs"]
mod tests;
