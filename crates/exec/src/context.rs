// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-render token and temporary artifact ownership

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use weave_page::{RenderToken, TokenError};

use crate::error::ExecError;

/// Files written for one render, removed when released or dropped.
#[derive(Debug, Default)]
pub struct TempArtifacts {
    paths: Vec<PathBuf>,
}

impl TempArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `path` exclusively and write `contents` to it.
    ///
    /// The file is tracked as soon as it exists, so a failed write is still
    /// cleaned up. An existing file is never overwritten or tracked.
    pub async fn write(&mut self, path: PathBuf, contents: &[u8]) -> Result<(), ExecError> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|source| ExecError::Artifact { path: path.clone(), source })?;
        self.paths.push(path.clone());

        file.write_all(contents).await.map_err(|source| ExecError::Artifact { path: path.clone(), source })?;
        file.flush().await.map_err(|source| ExecError::Artifact { path, source })?;
        Ok(())
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Remove every tracked file now.
    pub fn release(&mut self) {
        for path in self.paths.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove render artifact")
                }
            }
        }
    }
}

impl Drop for TempArtifacts {
    fn drop(&mut self) {
        self.release();
    }
}

/// Everything one render owns: its token, the directory it runs in, and the
/// artifacts it has written there.
#[derive(Debug)]
pub struct RenderContext {
    token: RenderToken,
    dir: PathBuf,
    artifacts: TempArtifacts,
}

impl RenderContext {
    /// Start a render in `dir`, generating a token unique to `page_text` and
    /// the directory's contents.
    pub fn new(dir: impl Into<PathBuf>, page_text: &str) -> Result<Self, TokenError> {
        let dir = dir.into();
        let token = RenderToken::generate(page_text, &dir)?;
        Ok(Self::with_token(dir, token))
    }

    pub fn with_token(dir: impl Into<PathBuf>, token: RenderToken) -> Self {
        Self { token, dir: dir.into(), artifacts: TempArtifacts::new() }
    }

    pub fn token(&self) -> &RenderToken {
        &self.token
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn script_path(&self) -> PathBuf {
        self.dir.join(self.token.script_file_name())
    }

    pub fn side_channel_path(&self) -> PathBuf {
        self.dir.join(self.token.side_channel_file_name())
    }

    pub fn artifacts(&self) -> &TempArtifacts {
        &self.artifacts
    }

    pub(crate) fn artifacts_mut(&mut self) -> &mut TempArtifacts {
        &mut self.artifacts
    }

    /// Remove every artifact written so far.
    pub fn release(&mut self) {
        self.artifacts.release();
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
