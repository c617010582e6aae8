// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error page specs
//!
//! 404, 403 and 500 responses render their templates, or a fixed body when
//! the template is missing or broken.

use crate::prelude::*;

const FAILING_PAGE: &str = "<html>\n<p>before</p>\n<?\nx = 1\ny = undefined_name\n?>\n</html>\n";

#[tokio::test]
async fn missing_resource_without_template_uses_fixed_body() {
    let server = Site::empty().serve().await;

    let reply = server.get("/missing.pyp").await;

    assert_eq!(reply.status_line, "HTTP/1.1 404 Not Found");
    assert_eq!(reply.content_type, "text/html");
    assert!(reply.body.contains("404 Not Found"), "{}", reply.body);
    server.stop().await;
}

#[tokio::test]
async fn missing_resource_renders_404_template() {
    if !python_available() {
        return;
    }
    let server = Site::empty().with_error_pages().serve().await;

    let reply = server.get("/missing.pyp").await;

    assert_eq!(reply.status(), "404 Not Found");
    assert_eq!(reply.body, "<h1>Not here</h1>");
    assert!(server.leftover_artifacts().is_empty());
    server.stop().await;
}

#[tokio::test]
async fn forbidden_template_receives_location() {
    if !python_available() {
        return;
    }
    let server = Site::empty().with_error_pages().file("private/a.txt", "a").serve().await;

    let reply = server.get("/private/").await;

    assert_eq!(reply.status(), "403 Forbidden");
    assert_eq!(reply.body, "<h1>Forbidden: /private/</h1>");
    server.stop().await;
}

#[tokio::test]
async fn failing_page_shows_page_line_when_enabled() {
    if !python_available() {
        return;
    }
    let server = Site::empty().show_errors().with_error_pages().file("bad.pyp", FAILING_PAGE).serve().await;

    let reply = server.get("/bad.pyp").await;

    assert_eq!(reply.status(), "500 Internal Server Error");
    assert_eq!(reply.content_type, "text/html");
    assert!(reply.body.starts_with("<h1>Broken</h1>"), "{}", reply.body);
    assert!(reply.body.contains("\"/bad.pyp\", line 5"), "{}", reply.body);
    assert!(reply.body.contains("NameError"), "{}", reply.body);
    assert!(reply.body.ends_with("<p>detail=1</p>"), "{}", reply.body);
    let page_lines: Vec<&str> = FAILING_PAGE.lines().collect();
    assert!(page_lines[4].contains("undefined_name"));
    assert!(server.leftover_artifacts().is_empty());
    server.stop().await;
}

#[tokio::test]
async fn failing_page_hides_details_when_disabled() {
    if !python_available() {
        return;
    }
    let server = Site::empty().with_error_pages().file("bad.pyp", FAILING_PAGE).serve().await;

    let reply = server.get("/bad.pyp").await;

    assert_eq!(reply.status(), "500 Internal Server Error");
    assert_eq!(reply.body, "<h1>Broken</h1><pre></pre><p>detail=0</p>");
    assert!(!reply.body.contains("NameError"));
    assert!(!reply.body.contains("Traceback"));
    server.stop().await;
}

#[tokio::test]
async fn broken_error_template_falls_back() {
    if !python_available() {
        return;
    }
    let server = Site::empty()
        .show_errors()
        .file("500.pyp", "<? raise RuntimeError('template bug') ?>")
        .file("bad.pyp", FAILING_PAGE)
        .serve()
        .await;

    let reply = server.get("/bad.pyp").await;

    assert_eq!(reply.status(), "500 Internal Server Error");
    assert!(reply.body.contains("500 Internal Server Error"), "{}", reply.body);
    assert!(!reply.body.contains("template bug"));
    assert!(server.leftover_artifacts().is_empty());
    server.stop().await;
}

#[tokio::test]
async fn unterminated_code_is_an_internal_error() {
    if !python_available() {
        return;
    }
    let server = Site::empty().show_errors().with_error_pages().file("open.pyp", "<p>\n<? x = 1\n").serve().await;

    let reply = server.get("/open.pyp").await;

    assert_eq!(reply.status(), "500 Internal Server Error");
    assert!(reply.body.contains("line 2"), "{}", reply.body);
    server.stop().await;
}
