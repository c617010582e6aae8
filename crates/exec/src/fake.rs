// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake script runner for testing

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use weave_page::SIDE_CHANNEL_SUFFIX;

use crate::error::ExecError;
use crate::runner::{ExecutionResult, RunRequest, ScriptRunner};

type Responder = Arc<dyn Fn(&RunRequest, &str) -> ExecutionResult + Send + Sync>;

/// Recorded script run
#[derive(Debug, Clone)]
pub struct RunCall {
    pub request: RunRequest,
    /// Script contents as they were on disk during the run.
    pub script_source: Option<String>,
    /// Side-channel contents as they were on disk during the run.
    pub side_channel: Option<String>,
}

#[derive(Default)]
struct FakeRunnerState {
    calls: Vec<RunCall>,
    queued: VecDeque<Result<ExecutionResult, ExecError>>,
    responder: Option<Responder>,
}

/// Fake script runner.
///
/// Replies with queued results first, then the responder if one is set.
/// Otherwise it interprets the script just enough to print every marker
/// token, as a page whose code writes nothing would.
#[derive(Clone, Default)]
pub struct FakeScriptRunner {
    inner: Arc<Mutex<FakeRunnerState>>,
}

impl FakeScriptRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result for the next run.
    pub fn push_result(&self, result: ExecutionResult) {
        self.inner.lock().queued.push_back(Ok(result));
    }

    /// Queue an error for the next run.
    pub fn push_error(&self, error: ExecError) {
        self.inner.lock().queued.push_back(Err(error));
    }

    /// Compute results from the request and the script source.
    pub fn respond_with(
        &self,
        responder: impl Fn(&RunRequest, &str) -> ExecutionResult + Send + Sync + 'static,
    ) {
        self.inner.lock().responder = Some(Arc::new(responder));
    }

    /// Get all recorded runs
    pub fn calls(&self) -> Vec<RunCall> {
        self.inner.lock().calls.clone()
    }

    /// Output of a script that only prints its marker tokens.
    pub fn markers_only(source: &str) -> ExecutionResult {
        let stdout: String = source
            .lines()
            .filter_map(|line| line.strip_prefix("print(\"")?.strip_suffix("\", end=\"\")"))
            .collect();
        ExecutionResult { stdout: stdout.into_bytes(), stderr: Vec::new(), exit_code: Some(0) }
    }
}

#[async_trait]
impl ScriptRunner for FakeScriptRunner {
    async fn run(&self, request: RunRequest) -> Result<ExecutionResult, ExecError> {
        let script_source = std::fs::read_to_string(&request.script).ok();
        let side_channel =
            std::fs::read_to_string(request.script.with_extension(SIDE_CHANNEL_SUFFIX)).ok();

        let mut state = self.inner.lock();
        state.calls.push(RunCall {
            request: request.clone(),
            script_source: script_source.clone(),
            side_channel,
        });

        if let Some(result) = state.queued.pop_front() {
            return result;
        }
        let source = script_source.unwrap_or_default();
        match &state.responder {
            Some(responder) => Ok(responder(&request, &source)),
            None => Ok(Self::markers_only(&source)),
        }
    }
}
