// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution error types.

use std::path::PathBuf;
use std::time::Duration;

use weave_page::TokenError;

/// Errors that keep a script from running to completion.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// Interpreter not found or could not be spawned.
    #[error("failed to spawn `{program}`: {source}")]
    SpawnFailed { program: String, source: std::io::Error },

    /// Collecting the child's output failed.
    #[error("failed waiting for `{program}`: {source}")]
    WaitFailed { program: String, source: std::io::Error },

    /// The script ran past its deadline and was killed.
    #[error("`{program}` did not finish within {}ms", .timeout.as_millis())]
    Timeout { program: String, timeout: Duration },

    /// A temporary artifact could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Artifact { path: PathBuf, source: std::io::Error },

    /// Side-channel values could not be serialized.
    #[error("failed to encode side channel: {0}")]
    SideChannel(#[from] serde_json::Error),

    #[error(transparent)]
    Token(#[from] TokenError),
}
