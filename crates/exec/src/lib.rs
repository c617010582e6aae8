// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Out-of-process script execution
//!
//! The Execution Host writes an assembled page script (and optionally a
//! side-channel file of request data) next to the page, runs it through a
//! [`ScriptRunner`], and removes every file it wrote before returning.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod context;
mod error;
mod host;
mod runner;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeScriptRunner, RunCall};

pub use context::{RenderContext, TempArtifacts};
pub use error::ExecError;
pub use host::execute;
pub use runner::{ExecutionResult, ProcessRunner, RunRequest, ScriptRunner};
