// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mapping interpreter errors back onto the page
//!
//! The interpreter reports line numbers in the assembled script, which differs
//! from the page by the preamble, the marker statements, and every text
//! segment collapsed to a single line. The offset is not constant, so instead
//! of computing it the translator looks for the quoted source fragment in the
//! page itself:
//!
//! 1. the first page line at or after the reported line containing the
//!    fragment, else
//! 2. the first page line anywhere containing it, else
//! 3. the reported line, unchanged.
//!
//! This is an approximation. Two page lines with the same fragment cannot be
//! told apart, and rewritten directive lines are never found.

use regex::Regex;
use std::sync::LazyLock;

/// Traceback frame header: `File "<path>", line <n>[, in <scope>]`
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static FRAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*File "(?P<file>[^"]*)", line (?P<line>\d+)(?:, in (?P<scope>.+?))?\s*$"#)
        .expect("constant regex pattern is valid")
});

/// Scope name the interpreter gives top-level script code.
const MODULE_SCOPE: &str = "<module>";

/// One traceback frame that pointed into the generated script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Line number reported against the script.
    pub line: usize,
    /// Function name, or `None` for frames without one (syntax errors).
    pub scope: Option<String>,
    /// Source line quoted under the frame header, trimmed.
    pub fragment: Option<String>,
    /// Recovered page line, if the fragment was found in the page.
    pub page_line: Option<usize>,
}

impl Frame {
    /// True for frames in top-level page code rather than a function.
    pub fn is_module_level(&self) -> bool {
        self.scope.as_deref() == Some(MODULE_SCOPE)
    }
}

/// Structured view of a failed render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// Error text with script names and line numbers rewritten.
    pub message: String,
    /// Error text exactly as the interpreter wrote it.
    pub raw: String,
    /// File name the interpreter reported for the innermost script frame.
    pub file_name: String,
    /// Line the interpreter reported for the innermost script frame.
    pub line: Option<usize>,
    /// Page line recovered for the innermost script frame.
    pub page_line: Option<usize>,
    /// Script frames, outermost first.
    pub frames: Vec<Frame>,
    /// Whether clients may see `message`.
    pub show_details: bool,
}

impl ErrorReport {
    /// A report for failures that never reached the interpreter.
    pub fn plain(message: impl Into<String>, show_details: bool) -> Self {
        let message = message.into();
        Self {
            raw: message.clone(),
            message,
            file_name: String::new(),
            line: None,
            page_line: None,
            frames: Vec::new(),
            show_details,
        }
    }

    /// Message for the client: the translated text, or nothing when details
    /// are hidden.
    pub fn client_message(&self) -> &str {
        if self.show_details {
            &self.message
        } else {
            ""
        }
    }

    /// `"1"` when details are shown, `"0"` otherwise.
    pub fn detail_flag(&self) -> &'static str {
        if self.show_details {
            "1"
        } else {
            "0"
        }
    }
}

/// Translate interpreter error text from script coordinates to page
/// coordinates.
///
/// `script_name` is the generated script's file name (`<token>.py`),
/// `display_name` what to call the page in the rewritten text (usually the
/// request path).
pub fn translate(
    raw_error: &str,
    script_name: &str,
    page_text: &str,
    display_name: &str,
    show_details: bool,
) -> ErrorReport {
    let page_lines: Vec<&str> = page_text.lines().collect();
    let lines: Vec<&str> = raw_error.split_inclusive('\n').collect();

    let mut message = String::with_capacity(raw_error.len());
    let mut frames = Vec::new();
    let mut file_name = String::new();

    for (i, line) in lines.iter().enumerate() {
        let (content, ending) = split_ending(line);
        let Some(caps) = FRAME_PATTERN.captures(content) else {
            message.push_str(&line.replace(script_name, display_name));
            continue;
        };
        let (Some(file), Some(line_no)) = (caps.name("file"), caps.name("line")) else {
            message.push_str(line);
            continue;
        };
        if !names_script(file.as_str(), script_name) {
            message.push_str(line);
            continue;
        }
        let Ok(reported) = line_no.as_str().parse::<usize>() else {
            message.push_str(line);
            continue;
        };

        let fragment = lines.get(i + 1).and_then(|next| quoted_fragment(next));
        let page_line = fragment.as_deref().and_then(|f| find_page_line(&page_lines, f, reported));
        let shown = page_line.unwrap_or(reported);

        message.push_str(&content[..file.start()]);
        message.push_str(display_name);
        message.push_str(&content[file.end()..line_no.start()]);
        message.push_str(&shown.to_string());
        message.push_str(&content[line_no.end()..]);
        message.push_str(ending);

        file_name = file.as_str().to_string();
        frames.push(Frame {
            line: reported,
            scope: caps.name("scope").map(|s| s.as_str().to_string()),
            fragment,
            page_line,
        });
    }

    if file_name.is_empty() {
        file_name = script_name.to_string();
    }
    let innermost = frames.last();

    ErrorReport {
        message,
        raw: raw_error.to_string(),
        file_name,
        line: innermost.map(|f| f.line),
        page_line: innermost.and_then(|f| f.page_line),
        frames,
        show_details,
    }
}

/// Find the page line (1-based) holding `fragment`, preferring lines at or
/// after `reported`.
pub fn find_page_line(page_lines: &[&str], fragment: &str, reported: usize) -> Option<usize> {
    if fragment.is_empty() {
        return None;
    }
    let start = reported.saturating_sub(1);
    page_lines
        .iter()
        .enumerate()
        .skip(start)
        .chain(page_lines.iter().enumerate())
        .find(|(_, l)| l.contains(fragment))
        .map(|(i, _)| i + 1)
}

fn names_script(file: &str, script_name: &str) -> bool {
    file == script_name
        || file.strip_suffix(script_name).is_some_and(|dir| dir.ends_with(['/', '\\']))
}

/// The source line quoted below a frame header, if `line` is one. Quoted
/// source is always indented; the exception line is not.
fn quoted_fragment(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty()
        || !line.starts_with([' ', '\t'])
        || FRAME_PATTERN.is_match(line.trim_end_matches(['\r', '\n']))
        || is_marker_line(trimmed)
    {
        return None;
    }
    Some(trimmed.to_string())
}

/// Caret/tilde lines pointing at a column.
fn is_marker_line(trimmed: &str) -> bool {
    trimmed.chars().all(|c| matches!(c, '^' | '~' | ' '))
}

fn split_ending(line: &str) -> (&str, &str) {
    let content = line.trim_end_matches(['\r', '\n']);
    (content, &line[content.len()..])
}

#[cfg(test)]
#[path = "translate_tests.rs"]
mod tests;
