// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turn a parsed request into a response.
//!
//! Every failure is answered with a rendered error page; nothing here
//! returns an error.

use std::path::Path;

use weave_exec::ScriptRunner;
use weave_page::ErrorReport;
use weave_wire::{content_type_for, Request, Response, Status};

use crate::listing::render_listing;
use crate::render::{RenderMode, Renderer};
use crate::resolve::{is_page, resolve, select_index, DirectoryArtifact, Resolution};

/// Build the response for `request`.
pub async fn respond<R: ScriptRunner>(renderer: &Renderer<R>, request: &Request) -> Response {
    let settings = renderer.settings();
    match resolve(&settings.root, &request.path) {
        Resolution::NotFound => not_found(renderer, request).await,
        Resolution::Anomalous => {
            tracing::warn!(location = %request.path, "resource is neither file nor directory");
            internal_error(renderer, request, ErrorReport::plain("", false)).await
        }
        Resolution::File(path) => serve_file(renderer, request, &path).await,
        Resolution::Directory(dir) => {
            match select_index(&dir, &settings.page_extension, settings.list_directories) {
                DirectoryArtifact::Page(path) | DirectoryArtifact::Html(path) => {
                    serve_file(renderer, request, &path).await
                }
                DirectoryArtifact::Listing => match render_listing(&dir, &request.path) {
                    Ok(html) => Response::html(Status::Ok, html),
                    Err(e) => {
                        let report = ErrorReport::plain(
                            format!("failed to list {}: {e}", request.path),
                            settings.show_errors,
                        );
                        internal_error(renderer, request, report).await
                    }
                },
                DirectoryArtifact::Forbidden => forbidden(renderer, request).await,
            }
        }
    }
}

async fn serve_file<R: ScriptRunner>(renderer: &Renderer<R>, request: &Request, path: &Path) -> Response {
    let settings = renderer.settings();
    if is_page(path, &settings.page_extension) {
        return match renderer.render_page(path, request, &[], RenderMode::Page).await {
            Ok(body) => Response::html(Status::Ok, body),
            Err(e) => {
                let report = e.into_report(settings.show_errors);
                tracing::error!(
                    location = %request.path,
                    page_line = ?report.page_line,
                    "page failed:\n{}",
                    report.message,
                );
                internal_error(renderer, request, report).await
            }
        };
    }

    match tokio::fs::read(path).await {
        Ok(bytes) => Response::new(Status::Ok, content_type_for(path, &settings.page_extension), bytes),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read file");
            let report =
                ErrorReport::plain(format!("failed to read {}: {e}", request.path), settings.show_errors);
            internal_error(renderer, request, report).await
        }
    }
}

async fn not_found<R: ScriptRunner>(renderer: &Renderer<R>, request: &Request) -> Response {
    let body = renderer.render_error_page(Status::NotFound, request, &[]).await;
    Response::html(Status::NotFound, body)
}

/// The 403 page receives the request path.
async fn forbidden<R: ScriptRunner>(renderer: &Renderer<R>, request: &Request) -> Response {
    let args = [request.path.clone()];
    let body = renderer.render_error_page(Status::Forbidden, request, &args).await;
    Response::html(Status::Forbidden, body)
}

/// The 500 page receives the client message and the detail flag.
async fn internal_error<R: ScriptRunner>(
    renderer: &Renderer<R>,
    request: &Request,
    report: ErrorReport,
) -> Response {
    let args = [report.client_message().to_string(), report.detail_flag().to_string()];
    let body = renderer.render_error_page(Status::InternalServerError, request, &args).await;
    Response::html(Status::InternalServerError, body)
}

#[cfg(test)]
#[path = "respond_tests.rs"]
mod tests;
