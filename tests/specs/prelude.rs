// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for the end-to-end specs.

use std::net::SocketAddr;
use std::path::Path;

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use weave_exec::ProcessRunner;
use weave_server::{bind, Listener, Renderer, Settings};

/// A document root under construction.
pub struct Site {
    dir: TempDir,
    settings: Settings,
}

impl Site {
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings { root: dir.path().to_path_buf(), port: 0, ..Settings::default() };
        Self { dir, settings }
    }

    /// A root named by a path relative to the working directory.
    pub fn relative() -> Self {
        let dir = tempfile::Builder::new().prefix("weave-site").tempdir_in(".").unwrap();
        let settings = Settings { root: dir.path().to_path_buf(), port: 0, ..Settings::default() };
        Self { dir, settings }
    }

    /// Write `contents` at `path` relative to the root.
    pub fn file(self, path: &str, contents: &str) -> Self {
        let full = self.dir.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, contents).unwrap();
        self
    }

    pub fn show_errors(mut self) -> Self {
        self.settings.show_errors = true;
        self
    }

    pub fn list_directories(mut self) -> Self {
        self.settings.list_directories = true;
        self
    }

    /// Bind a loopback port and start serving in the background.
    pub async fn serve(self) -> Server {
        let runner = ProcessRunner::new(self.settings.interpreter.clone())
            .with_program_args(self.settings.interpreter_args.clone())
            .with_timeout(self.settings.script_timeout());
        let tcp = bind(&self.settings).await.unwrap();
        let shutdown = CancellationToken::new();
        let listener = Listener::new(tcp, Renderer::new(runner, self.settings), shutdown.clone());
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(listener.run());
        Server { dir: self.dir, addr, shutdown, task }
    }
}

/// A running server over a [`Site`].
pub struct Server {
    dir: TempDir,
    addr: SocketAddr,
    shutdown: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

impl Server {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub async fn get(&self, target: &str) -> Reply {
        self.send(format!("GET {target} HTTP/1.1\r\nHost: localhost\r\nUser-Agent: specs\r\n\r\n").as_bytes()).await
    }

    pub async fn post(&self, target: &str, form: &str) -> Reply {
        let raw = format!(
            "POST {target} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\r\n{form}",
            form.len()
        );
        self.send(raw.as_bytes()).await
    }

    pub async fn send(&self, raw: &[u8]) -> Reply {
        let mut stream = TcpStream::connect(self.addr).await.unwrap();
        stream.write_all(raw).await.unwrap();
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes).await.unwrap();
        Reply::parse(&bytes)
    }

    /// Names in the root that look like leftover render artifacts.
    pub fn leftover_artifacts(&self) -> Vec<String> {
        let mut leftovers = Vec::new();
        collect_artifacts(self.dir.path(), &mut leftovers);
        leftovers
    }

    pub async fn stop(self) {
        self.shutdown.cancel();
        self.task.await.unwrap();
    }
}

fn collect_artifacts(dir: &Path, out: &mut Vec<String>) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_artifacts(&path, out);
        } else if matches!(path.extension().and_then(|e| e.to_str()), Some("py" | "header")) {
            out.push(path.display().to_string());
        }
    }
}

/// A parsed response.
#[derive(Debug)]
pub struct Reply {
    pub status_line: String,
    pub content_type: String,
    pub body: String,
}

impl Reply {
    fn parse(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes).into_owned();
        let (head, body) = text.split_once("\n\n").unwrap_or_else(|| panic!("no header terminator in {text:?}"));
        let mut lines = head.lines();
        let status_line = lines.next().unwrap_or_default().to_string();
        let content_type = lines
            .find_map(|l| l.strip_prefix("Content-type:"))
            .map(|v| v.trim().to_string())
            .unwrap_or_default();
        Self { status_line, content_type, body: body.to_string() }
    }

    pub fn status(&self) -> &str {
        self.status_line.split_once(' ').map(|(_, s)| s).unwrap_or_default()
    }
}

/// Whether `python3` can run; page specs return early without it.
pub fn python_available() -> bool {
    std::process::Command::new("python3")
        .arg("--version")
        .output()
        .is_ok_and(|o| o.status.success())
}

/// Error pages that print their arguments.
pub const ERROR_PAGES: &[(&str, &str)] = &[
    ("404.pyp", "<h1>Not here</h1>"),
    (
        "403.pyp",
        "<? import sys ?><h1>Forbidden: <? print(sys.argv[1], end=\"\") ?></h1>",
    ),
    (
        "500.pyp",
        "<? import sys ?><h1>Broken</h1><pre><? print(sys.argv[1], end=\"\") ?></pre><p>detail=<? print(sys.argv[2], end=\"\") ?></p>",
    ),
];

impl Site {
    pub fn with_error_pages(self) -> Self {
        ERROR_PAGES.iter().fold(self, |site, (name, body)| site.file(name, body))
    }
}
