// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static file specs
//!
//! Files outside the page extension are served byte for byte.

use crate::prelude::*;

#[tokio::test]
async fn serves_file_with_guessed_type() {
    let server = Site::empty().file("css/site.css", "body { color: red; }").serve().await;

    let reply = server.get("/css/site.css").await;

    assert_eq!(reply.status_line, "HTTP/1.1 200 OK");
    assert_eq!(reply.content_type, "text/css");
    assert_eq!(reply.body, "body { color: red; }");
    server.stop().await;
}

#[tokio::test]
async fn echoes_request_protocol() {
    let server = Site::empty().file("a.txt", "a").serve().await;

    let reply = server.send(b"GET /a.txt HTTP/1.0\r\n\r\n").await;

    assert_eq!(reply.status_line, "HTTP/1.0 200 OK");
    server.stop().await;
}

#[tokio::test]
async fn unknown_type_is_plain_text() {
    let server = Site::empty().file("data.qqq", "raw").serve().await;

    let reply = server.get("/data.qqq").await;

    assert_eq!(reply.content_type, "text/plain");
    assert_eq!(reply.body, "raw");
    server.stop().await;
}

#[tokio::test]
async fn percent_encoded_path_is_decoded() {
    let server = Site::empty().file("my file.txt", "spaced").serve().await;

    let reply = server.get("/my%20file.txt").await;

    assert_eq!(reply.status(), "200 OK");
    assert_eq!(reply.body, "spaced");
    server.stop().await;
}

#[tokio::test]
async fn query_string_ignored_for_static_files() {
    let server = Site::empty().file("a.txt", "a").serve().await;

    let reply = server.get("/a.txt?cache=1").await;

    assert_eq!(reply.body, "a");
    server.stop().await;
}

#[tokio::test]
async fn traversal_cannot_escape_root() {
    let server = Site::empty().file("inside.txt", "in").serve().await;
    let outside = server.root().parent().unwrap().join("weave-outside.txt");
    std::fs::write(&outside, "secret").unwrap();

    let reply = server.get("/../weave-outside.txt").await;
    std::fs::remove_file(&outside).unwrap();

    assert_eq!(reply.status(), "404 Not Found");
    assert!(!reply.body.contains("secret"));
    server.stop().await;
}

#[tokio::test]
async fn malformed_request_is_rejected() {
    let server = Site::empty().serve().await;

    let reply = server.send(b"HELLO\r\n\r\n").await;

    assert_eq!(reply.status(), "400 Bad Request");
    server.stop().await;
}
