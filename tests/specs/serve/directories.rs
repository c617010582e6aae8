// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory specs
//!
//! Index selection, listings, and the forbidden fallback.

use crate::prelude::*;

#[tokio::test]
async fn index_html_served_for_directory() {
    let server = Site::empty().file("docs/index.html", "<h1>Docs</h1>").serve().await;

    let reply = server.get("/docs/").await;

    assert_eq!(reply.status(), "200 OK");
    assert_eq!(reply.content_type, "text/html");
    assert_eq!(reply.body, "<h1>Docs</h1>");
    server.stop().await;
}

#[tokio::test]
async fn directory_without_index_is_forbidden() {
    let server = Site::empty().file("files/a.txt", "a").serve().await;

    let reply = server.get("/files/").await;

    assert_eq!(reply.status(), "403 Forbidden");
    assert_eq!(reply.content_type, "text/html");
    assert!(!reply.body.contains("a.txt"), "{}", reply.body);
    server.stop().await;
}

#[tokio::test]
async fn listing_when_enabled() {
    let server = Site::empty()
        .list_directories()
        .file("files/b.txt", "b")
        .file("files/a.txt", "a")
        .file("files/sub/c.txt", "c")
        .serve()
        .await;

    let reply = server.get("/files/").await;

    assert_eq!(reply.status(), "200 OK");
    similar_asserts::assert_eq!(
        reply.body,
        "<h1>/files/ contains the following:</h1><ul>\n\
         <li><a href=\"/files/a.txt\">a.txt</a></li>\n\
         <li><a href=\"/files/b.txt\">b.txt</a></li>\n\
         <li><a href=\"/files/sub/\">sub/</a></li>\n\
         </ul>"
    );
    server.stop().await;
}

#[cfg(unix)]
#[tokio::test]
async fn listing_escapes_names() {
    let server = Site::empty()
        .list_directories()
        .file("files/<script>x.txt", "x")
        .serve()
        .await;

    let reply = server.get("/files/").await;

    assert!(!reply.body.contains("<script>"), "{}", reply.body);
    assert!(reply.body.contains("&lt;script&gt;x.txt"), "{}", reply.body);
    server.stop().await;
}
