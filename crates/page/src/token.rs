// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-render marker tokens

use std::path::Path;

use thiserror::Error;

use crate::{SCRIPT_SUFFIX, SIDE_CHANNEL_SUFFIX};

/// Alphabet tokens are drawn from. Alphanumeric only, so a token is safe inside
/// a quoted string literal and inside a file name.
const ALPHABET: [char; 62] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S',
    'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l',
    'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', '0', '1', '2', '3', '4',
    '5', '6', '7', '8', '9',
];

/// Token length in characters (~381 bits of entropy).
pub const TOKEN_LEN: usize = 64;

const MAX_ATTEMPTS: usize = 8;

/// Errors from token generation
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("could not generate a unique render token after {0} attempts")]
    Exhausted(usize),
}

/// A unique marker string for one render.
///
/// Used both as the value the script prints between code blocks and as the
/// base name of every temporary artifact the render writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderToken(String);

impl RenderToken {
    /// Generate a token that does not occur in `page_text` and does not name an
    /// existing artifact in `dir`.
    pub fn generate(page_text: &str, dir: &Path) -> Result<Self, TokenError> {
        Self::generate_with(page_text, dir, || nanoid::nanoid!(TOKEN_LEN, &ALPHABET))
    }

    /// Generation loop with an injectable candidate source.
    pub(crate) fn generate_with(
        page_text: &str,
        dir: &Path,
        mut candidate: impl FnMut() -> String,
    ) -> Result<Self, TokenError> {
        for _ in 0..MAX_ATTEMPTS {
            let token = Self(candidate());
            if token.0.is_empty() || page_text.contains(&token.0) {
                continue;
            }
            if dir.join(token.script_file_name()).exists()
                || dir.join(token.side_channel_file_name()).exists()
            {
                tracing::debug!(token = %token.short(), "render token collides with existing file");
                continue;
            }
            return Ok(token);
        }
        Err(TokenError::Exhausted(MAX_ATTEMPTS))
    }

    /// Create a token from an existing string (tests and fixed fakes).
    pub fn from_string(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for log lines.
    pub fn short(&self) -> &str {
        let end = std::cmp::min(8, self.0.len());
        &self.0[..end]
    }

    /// `<token>.py`
    pub fn script_file_name(&self) -> String {
        format!("{}.{}", self.0, SCRIPT_SUFFIX)
    }

    /// `<token>.header`
    pub fn side_channel_file_name(&self) -> String {
        format!("{}.{}", self.0, SIDE_CHANNEL_SUFFIX)
    }
}

impl std::fmt::Display for RenderToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RenderToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
