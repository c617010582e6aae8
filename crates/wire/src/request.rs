// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;

use crate::wire::ProtocolError;

/// A parsed inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Method verb, e.g. `GET`.
    pub method: String,
    /// Request target exactly as sent, query included.
    pub target: String,
    /// Percent-decoded path without the query.
    pub path: String,
    /// Protocol token, e.g. `HTTP/1.1`.
    pub protocol: String,
    /// Header lines. A repeated name keeps its last value.
    pub headers: BTreeMap<String, String>,
    /// Query parameters. A repeated key keeps its last value.
    pub query: BTreeMap<String, String>,
    /// Urlencoded body parameters. A repeated key keeps its last value.
    pub form: BTreeMap<String, String>,
    /// Raw body text.
    pub body: String,
}

impl Request {
    /// Parse a full request.
    pub fn parse(raw: &[u8]) -> Result<Self, ProtocolError> {
        let text = String::from_utf8_lossy(raw);
        if text.trim().is_empty() {
            return Err(ProtocolError::Empty);
        }

        let (head, body) = split_head(&text);
        let mut lines = head.split('\n').map(|l| l.trim_end_matches('\r'));

        let request_line = lines.next().unwrap_or_default();
        let mut parts = request_line.split(' ').filter(|p| !p.is_empty());
        let (Some(method), Some(target), Some(protocol), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ProtocolError::MalformedRequestLine(request_line.to_string()));
        };

        let (raw_path, query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };

        let mut headers = BTreeMap::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            match line.split_once(':') {
                Some((name, value)) => {
                    headers.insert(name.trim().to_string(), value.trim().to_string());
                }
                None => tracing::debug!(line, "ignoring header line without ':'"),
            }
        }

        Ok(Self {
            method: method.to_string(),
            target: target.to_string(),
            path: percent_decode_str(raw_path).decode_utf8_lossy().into_owned(),
            protocol: protocol.to_string(),
            headers,
            query: parse_pairs(query),
            form: parse_pairs(body.trim_end_matches(['\r', '\n'])),
            body: body.to_string(),
        })
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }
}

/// Split at the first blank line. Accepts bare `\n` line endings.
pub(crate) fn split_head(text: &str) -> (&str, &str) {
    for sep in ["\r\n\r\n", "\n\n"] {
        if let Some(pos) = text.find(sep) {
            return (&text[..pos], &text[pos + sep.len()..]);
        }
    }
    (text, "")
}

/// Decode `application/x-www-form-urlencoded` pairs; later keys win.
fn parse_pairs(input: &str) -> BTreeMap<String, String> {
    url::form_urlencoded::parse(input.as_bytes()).into_owned().collect()
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
