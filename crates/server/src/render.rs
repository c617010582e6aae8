// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The page render pipeline: compile, execute, reassemble.
//!
//! A failed page is translated into an [`ErrorReport`] once. Error pages are
//! rendered in [`RenderMode::ErrorPage`], which never translates and falls
//! back to a fixed body, so a broken error template cannot recurse.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::field::Empty;
use tracing::Instrument;
use weave_exec::{execute, ExecError, RenderContext, ScriptRunner};
use weave_page::{
    compile, reassemble, strip_bom, translate, CompileError, ErrorReport, PageImports, TokenError,
};
use weave_wire::{Request, Status};

use crate::config::Settings;

/// Whether a render may translate its failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// A requested page. Script errors are translated to page lines.
    Page,
    /// A 404/403/500 template. Failures are not translated.
    ErrorPage,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read page {}: {source}", .path.display())]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Exec(#[from] ExecError),

    /// The page's code failed; the report carries page line numbers.
    #[error("page script failed:\n{}", .0.message)]
    Script(Box<ErrorReport>),

    #[error("error page script failed:\n{stderr}")]
    ErrorPageScript { stderr: String },
}

impl RenderError {
    /// The report to hand to the 500 page.
    pub fn into_report(self, show_details: bool) -> ErrorReport {
        match self {
            RenderError::Script(report) => *report,
            other => ErrorReport::plain(other.to_string(), show_details),
        }
    }
}

/// Renders pages with a [`ScriptRunner`].
pub struct Renderer<R> {
    runner: R,
    settings: Settings,
}

impl<R: ScriptRunner> Renderer<R> {
    pub fn new(runner: R, settings: Settings) -> Self {
        Self { runner, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Render the page at `page` and return the reassembled body.
    ///
    /// `args` are passed to the script after its path.
    pub async fn render_page(
        &self,
        page: &Path,
        request: &Request,
        args: &[String],
        mode: RenderMode,
    ) -> Result<String, RenderError> {
        let span = tracing::info_span!(
            "page.render",
            page = %page.display(),
            mode = ?mode,
            stdout_bytes = Empty,
        );
        self.render_inner(page, request, args, mode).instrument(span).await
    }

    async fn render_inner(
        &self,
        page: &Path,
        request: &Request,
        args: &[String],
        mode: RenderMode,
    ) -> Result<String, RenderError> {
        let source = tokio::fs::read_to_string(page)
            .await
            .map_err(|source| RenderError::Read { path: page.to_path_buf(), source })?;
        let text = strip_bom(&source);

        let dir = page.parent().unwrap_or(&self.settings.root);
        let mut ctx = RenderContext::new(dir, text)?;
        let compiled = compile(text, ctx.token())?;
        let side_channel =
            compiled.imports.any().then(|| self.side_channel(request, &compiled.imports));

        let result =
            execute(&self.runner, &mut ctx, &compiled.script, side_channel.as_ref(), args).await?;
        tracing::Span::current().record("stdout_bytes", result.stdout.len());

        if result.has_errors() {
            let stderr = result.stderr_str().into_owned();
            return Err(match mode {
                RenderMode::Page => RenderError::Script(Box::new(translate(
                    &stderr,
                    &ctx.token().script_file_name(),
                    text,
                    &request.path,
                    self.settings.show_errors,
                ))),
                RenderMode::ErrorPage => RenderError::ErrorPageScript { stderr },
            });
        }
        if result.exit_code != Some(0) {
            tracing::warn!(exit_code = ?result.exit_code, "page script exited abnormally without error output");
        }

        Ok(reassemble(&result.stdout_str(), ctx.token(), &compiled.texts))
    }

    /// Render the configured template for an error status.
    ///
    /// Never fails: a missing or broken template yields a fixed body.
    pub async fn render_error_page(&self, status: Status, request: &Request, args: &[String]) -> Vec<u8> {
        let page = match status {
            Status::NotFound => self.settings.not_found_path(),
            Status::Forbidden => self.settings.forbidden_path(),
            _ => self.settings.error_path(),
        };
        match self.render_page(&page, request, args, RenderMode::ErrorPage).await {
            Ok(body) => body.into_bytes(),
            Err(e) => {
                tracing::warn!(page = %page.display(), error = %e, "error page failed, using fallback body");
                fallback_body(status).into_bytes()
            }
        }
    }

    /// Values the page asked for, keyed the way the preamble reads them.
    fn side_channel(&self, request: &Request, imports: &PageImports) -> Value {
        let mut info = Map::new();
        if imports.request_headers {
            let mut headers = string_map(&request.headers);
            headers.insert("GET".to_string(), Value::Object(string_map(&request.query)));
            headers.insert("POST".to_string(), Value::Object(string_map(&request.form)));
            info.insert("headers".to_string(), Value::Object(headers));
        }
        if imports.server_root {
            info.insert(
                "server_root".to_string(),
                Value::String(self.settings.root.display().to_string()),
            );
        }
        Value::Object(info)
    }
}

fn string_map(map: &BTreeMap<String, String>) -> Map<String, Value> {
    map.iter().map(|(k, v)| (k.clone(), Value::String(v.clone()))).collect()
}

/// Body used when an error template cannot be rendered.
pub fn fallback_body(status: Status) -> String {
    format!(
        "<html><head><title>{line}</title></head><body><h1>{line}</h1></body></html>",
        line = status.line()
    )
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
