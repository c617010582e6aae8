// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTML directory listings.

use std::fmt::Write as _;
use std::path::Path;

use html_escape::{encode_double_quoted_attribute, encode_text};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Bytes that cannot appear raw inside one path segment of an href.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/');

/// Render `dir` as a list of links. Entries are sorted by name and
/// directories carry a trailing `/`. Hrefs are percent-encoded per segment,
/// then every name is escaped.
pub fn render_listing(dir: &Path, location: &str) -> std::io::Result<String> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        entries.push((name, entry.file_type()?.is_dir()));
    }
    entries.sort();

    let base = encode_path(location.trim_end_matches('/'));
    let mut html = format!("<h1>{} contains the following:</h1><ul>\n", encode_text(location));
    for (name, is_dir) in &entries {
        let suffix = if *is_dir { "/" } else { "" };
        let href = format!("{base}/{}{suffix}", utf8_percent_encode(name, SEGMENT));
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}{suffix}</a></li>",
            encode_double_quoted_attribute(&href),
            encode_text(name)
        );
    }
    html.push_str("</ul>");
    Ok(html)
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
#[path = "listing_tests.rs"]
mod tests;
