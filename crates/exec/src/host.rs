// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Execution Host: write artifacts, run, clean up.

use crate::context::RenderContext;
use crate::error::ExecError;
use crate::runner::{ExecutionResult, RunRequest, ScriptRunner};

/// Run `script` for the render described by `ctx`.
///
/// Writes `<token>.py` into the page's directory, plus `<token>.header`
/// holding `side_channel` as JSON when one is given, then runs the script with
/// the page's directory as working directory. Every artifact is removed
/// before this returns, whether the run succeeded or not.
pub async fn execute<R: ScriptRunner + ?Sized>(
    runner: &R,
    ctx: &mut RenderContext,
    script: &str,
    side_channel: Option<&serde_json::Value>,
    args: &[String],
) -> Result<ExecutionResult, ExecError> {
    let result = write_and_run(runner, ctx, script, side_channel, args).await;
    ctx.release();
    result
}

async fn write_and_run<R: ScriptRunner + ?Sized>(
    runner: &R,
    ctx: &mut RenderContext,
    script: &str,
    side_channel: Option<&serde_json::Value>,
    args: &[String],
) -> Result<ExecutionResult, ExecError> {
    if let Some(values) = side_channel {
        let encoded = serde_json::to_vec(values)?;
        let path = ctx.side_channel_path();
        ctx.artifacts_mut().write(path, &encoded).await?;
    }

    let script_path = ctx.script_path();
    ctx.artifacts_mut().write(script_path.clone(), script.as_bytes()).await?;

    tracing::debug!(
        token = %ctx.token().short(),
        dir = %ctx.dir().display(),
        args = args.len(),
        "running page script",
    );

    runner
        .run(RunRequest { script: script_path, args: args.to_vec(), cwd: ctx.dir().to_path_buf() })
        .await
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
