// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Page rendering specs
//!
//! Run real pages through python3. Each spec returns early when python3 is
//! not installed.

use crate::prelude::*;

#[tokio::test]
async fn code_output_spliced_between_text() {
    if !python_available() {
        return;
    }
    let server = Site::empty()
        .file("loop.pyp", "<ul><? for i in range(3):\n    print(\"<li>%d</li>\" % i, end=\"\") ?></ul>")
        .serve()
        .await;

    let reply = server.get("/loop.pyp").await;

    assert_eq!(reply.status(), "200 OK");
    assert_eq!(reply.content_type, "text/html");
    similar_asserts::assert_eq!(reply.body, "<ul><li>0</li><li>1</li><li>2</li></ul>");
    assert!(server.leftover_artifacts().is_empty());
    server.stop().await;
}

#[tokio::test]
async fn indented_multiline_block() {
    if !python_available() {
        return;
    }
    let page = "<div>\n  <?\n    total = 0\n    for n in [1, 2, 3]:\n        total += n\n    print(total, end=\"\")\n  ?>\n</div>\n";
    let server = Site::empty().file("sum.pyp", page).serve().await;

    let reply = server.get("/sum.pyp").await;

    assert_eq!(reply.status(), "200 OK");
    assert_eq!(reply.body, "<div>\n  6\n</div>\n");
    server.stop().await;
}

#[tokio::test]
async fn else_clause_opened_on_marker_line() {
    if !python_available() {
        return;
    }
    let page = "<p><? if 1 > 2:\n    print(\"yes\", end=\"\")\nelse:\n    print(\"no\", end=\"\") ?></p>";
    let server = Site::empty().file("choice.pyp", page).serve().await;

    let reply = server.get("/choice.pyp").await;

    assert_eq!(reply.status(), "200 OK", "{}", reply.body);
    assert_eq!(reply.body, "<p>no</p>");
    server.stop().await;
}

#[tokio::test]
async fn relative_document_root() {
    if !python_available() {
        return;
    }
    let server = Site::relative()
        .file("docs/hi.pyp", "<p><? print(\"ok\", end=\"\") ?></p>")
        .serve()
        .await;
    assert!(server.root().is_relative());

    let reply = server.get("/docs/hi.pyp").await;

    assert_eq!(reply.status(), "200 OK", "{}", reply.body);
    assert_eq!(reply.body, "<p>ok</p>");
    assert!(server.leftover_artifacts().is_empty());
    server.stop().await;
}

#[tokio::test]
async fn index_page_rendered_for_directory() {
    if !python_available() {
        return;
    }
    let server = Site::empty()
        .file("blog/index.pyp", "<h1><? print(\"Blog\", end=\"\") ?></h1>")
        .file("blog/index.html", "<h1>static</h1>")
        .serve()
        .await;

    let reply = server.get("/blog/").await;

    assert_eq!(reply.body, "<h1>Blog</h1>");
    server.stop().await;
}

#[tokio::test]
async fn query_parameters_reach_the_page() {
    if !python_available() {
        return;
    }
    let page = "<? import RequestHeaders ?><p>Hello <? print(RequestHeaders[\"GET\"].get(\"name\", \"nobody\"), end=\"\") ?> via <? print(RequestHeaders[\"User-Agent\"], end=\"\") ?></p>";
    let server = Site::empty().file("hello.pyp", page).serve().await;

    let reply = server.get("/hello.pyp?name=Ada%20L&name=Grace").await;

    assert_eq!(reply.body, "<p>Hello Grace via specs</p>");
    assert!(server.leftover_artifacts().is_empty());
    server.stop().await;
}

#[tokio::test]
async fn form_body_reaches_the_page() {
    if !python_available() {
        return;
    }
    let page = "<? import RequestHeaders ?><p><? print(RequestHeaders[\"POST\"][\"title\"], end=\"\") ?></p>";
    let server = Site::empty().file("submit.pyp", page).serve().await;

    let reply = server.post("/submit.pyp", "title=Hello+World&x=1").await;

    assert_eq!(reply.body, "<p>Hello World</p>");
    server.stop().await;
}

#[tokio::test]
async fn server_root_available_on_request() {
    if !python_available() {
        return;
    }
    let page = "<? import ServerRoot ?><? print(ServerRoot, end=\"\") ?>";
    let server = Site::empty().file("root.pyp", page).serve().await;

    let reply = server.get("/root.pyp").await;

    assert_eq!(reply.body, server.root().display().to_string());
    server.stop().await;
}

#[tokio::test]
async fn relative_files_resolve_from_page_directory() {
    if !python_available() {
        return;
    }
    let page = "<? print(open(\"data.txt\").read().strip(), end=\"\") ?>";
    let server = Site::empty().file("app/data.txt", "from disk\n").file("app/read.pyp", page).serve().await;

    let reply = server.get("/app/read.pyp").await;

    assert_eq!(reply.body, "from disk");
    server.stop().await;
}

#[tokio::test]
async fn identical_requests_identical_bodies() {
    if !python_available() {
        return;
    }
    let page = "<p>a</p><? print(2 + 2, end=\"\") ?><p>b</p>";
    let server = Site::empty().file("same.pyp", page).serve().await;

    let first = server.get("/same.pyp").await;
    let second = server.get("/same.pyp").await;

    assert_eq!(first.body, "<p>a</p>4<p>b</p>");
    assert_eq!(first.body, second.body);
    server.stop().await;
}

#[tokio::test]
async fn early_exit_keeps_rendered_prefix() {
    if !python_available() {
        return;
    }
    let page = "<p>kept</p><? import sys\nsys.exit(0) ?><p>dropped</p>";
    let server = Site::empty().file("exit.pyp", page).serve().await;

    let reply = server.get("/exit.pyp").await;

    assert_eq!(reply.status(), "200 OK");
    assert_eq!(reply.body, "<p>kept</p>");
    server.stop().await;
}
