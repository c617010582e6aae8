// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Splicing literal text back into script output

use crate::token::RenderToken;

/// Replace each occurrence of `token` in `stdout`, left to right, with the
/// next entry of `texts`.
///
/// A script that stops early prints fewer tokens than there are texts; the
/// body assembled so far is returned as is. Occurrences beyond the last text
/// are left untouched.
pub fn reassemble<S: AsRef<str>>(stdout: &str, token: &RenderToken, texts: &[S]) -> String {
    let needle = token.as_str();
    let capacity = stdout.len() + texts.iter().map(|t| t.as_ref().len()).sum::<usize>();
    let mut out = String::with_capacity(capacity);
    let mut rest = stdout;
    let mut texts = texts.iter();

    while let Some(pos) = rest.find(needle) {
        let Some(text) = texts.next() else {
            break;
        };
        out.push_str(&rest[..pos]);
        out.push_str(text.as_ref());
        rest = &rest[pos + needle.len()..];
    }

    if !texts.as_slice().is_empty() {
        tracing::debug!(
            token = %token.short(),
            missing = texts.len(),
            "script output ended before all text segments were placed",
        );
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "reassemble_tests.rs"]
mod tests;
