// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Script runner capability and the interpreter-process implementation

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::Instrument;

use crate::error::ExecError;

/// One script invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Path of the script file to run.
    pub script: PathBuf,
    /// Positional arguments passed after the script path.
    pub args: Vec<String>,
    /// Working directory for the run.
    pub cwd: PathBuf,
}

/// Captured outcome of a script run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Exit code, or `None` when the process was ended by a signal.
    pub exit_code: Option<i32>,
}

impl ExecutionResult {
    pub fn stdout_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    pub fn stderr_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }

    /// True when the script wrote anything besides whitespace to stderr.
    pub fn has_errors(&self) -> bool {
        !self.stderr.iter().all(u8::is_ascii_whitespace)
    }
}

/// Runs a script file and captures its output.
#[async_trait]
pub trait ScriptRunner: Send + Sync + 'static {
    async fn run(&self, request: RunRequest) -> Result<ExecutionResult, ExecError>;
}

/// Runs scripts with an external interpreter, one child process per run.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
    program_args: Vec<String>,
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), program_args: Vec::new(), timeout: None }
    }

    /// Arguments placed between the interpreter and the script path.
    pub fn with_program_args(mut self, args: Vec<String>) -> Self {
        self.program_args = args;
        self
    }

    /// Kill the child and fail with [`ExecError::Timeout`] after `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn spawn_and_wait(&self, request: &RunRequest) -> Result<ExecutionResult, ExecError> {
        let mut process = tokio::process::Command::new(&self.program);
        process
            .args(&self.program_args)
            .arg(script_argument(request))
            .args(&request.args)
            .current_dir(&request.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the wait future on timeout must not leave the child running.
            .kill_on_drop(true);

        let child = process
            .spawn()
            .map_err(|source| ExecError::SpawnFailed { program: self.program.clone(), source })?;

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(output) => output,
                Err(_) => {
                    tracing::warn!(timeout_ms = limit.as_millis() as u64, "script timed out");
                    return Err(ExecError::Timeout { program: self.program.clone(), timeout: limit });
                }
            },
            None => child.wait_with_output().await,
        }
        .map_err(|source| ExecError::WaitFailed { program: self.program.clone(), source })?;

        Ok(ExecutionResult {
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code: output.status.code(),
        })
    }
}

/// The script path as the child sees it from `cwd`.
///
/// A script inside `cwd` is named by its path below it, so a relative `cwd`
/// is not applied twice once the child has changed into it.
fn script_argument(request: &RunRequest) -> &Path {
    match request.script.strip_prefix(&request.cwd) {
        Ok(below) if !below.as_os_str().is_empty() => below,
        _ => &request.script,
    }
}

#[async_trait]
impl ScriptRunner for ProcessRunner {
    async fn run(&self, request: RunRequest) -> Result<ExecutionResult, ExecError> {
        let start = Instant::now();
        let span = tracing::info_span!(
            "exec.run",
            program = %self.program,
            script = %request.script.display(),
            exit_code = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        );

        let result = self.spawn_and_wait(&request).instrument(span.clone()).await?;

        span.record("exit_code", result.exit_code.unwrap_or(-1));
        span.record("duration_ms", start.elapsed().as_millis() as u64);
        Ok(result)
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
