// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server settings: TOML file, then environment, then command line.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::env;

/// Name of the settings file looked up in the working and config directories.
pub const CONFIG_FILE_NAME: &str = "weave.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("document root {path} is unusable: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Server settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Document root; every request path resolves beneath it
    pub root: PathBuf,
    pub host: String,
    pub port: u16,
    /// Pending-connection queue length
    pub backlog: u32,
    /// List directories that have no index file instead of answering 403
    pub list_directories: bool,
    /// Show translated script errors to clients
    pub show_errors: bool,
    /// Interpreter that runs generated page scripts
    pub interpreter: String,
    /// Arguments placed before the script path
    pub interpreter_args: Vec<String>,
    /// Extension (without the dot) that marks a file as a page
    pub page_extension: String,
    /// Kill page scripts after this long; 0 disables the limit
    pub script_timeout_ms: u64,
    pub read_timeout_ms: u64,
    pub max_request_bytes: usize,
    /// Log every raw request at info level
    pub log_requests: bool,
    /// Write logs to this file instead of stderr
    pub log_file: Option<PathBuf>,
    /// Error pages, relative to `root`
    pub not_found_page: PathBuf,
    pub forbidden_page: PathBuf,
    pub error_page: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./www"),
            host: "127.0.0.1".to_string(),
            port: 8080,
            backlog: 5,
            list_directories: false,
            show_errors: false,
            interpreter: "python3".to_string(),
            interpreter_args: Vec::new(),
            page_extension: "pyp".to_string(),
            script_timeout_ms: 30_000,
            read_timeout_ms: 5_000,
            max_request_bytes: 1024 * 1024,
            log_requests: false,
            log_file: None,
            not_found_page: PathBuf::from("404.pyp"),
            forbidden_page: PathBuf::from("403.pyp"),
            error_page: PathBuf::from("500.pyp"),
        }
    }
}

impl Settings {
    /// Load settings from the first file found, then apply environment
    /// overrides.
    ///
    /// Lookup: `explicit`, `WEAVE_CONFIG`, `./weave.toml`, then
    /// `<config dir>/weave/weave.toml`. Defaults apply when none exists. An
    /// explicitly named file must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let named = explicit.map(Path::to_path_buf).or_else(env::config_path);
        let mut settings = match named {
            Some(path) => Self::from_file(&path)?,
            None => match discover() {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        settings.apply_env();
        Ok(settings)
    }

    /// Parse one settings file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let settings = toml::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Apply `WEAVE_*` overrides. Unparsable values are ignored.
    pub fn apply_env(&mut self) {
        if let Some(root) = env::root() {
            self.root = root;
        }
        if let Some(host) = env::host() {
            self.host = host;
        }
        if let Some(port) = env::port() {
            self.port = port;
        }
        if let Some(show) = env::show_errors() {
            self.show_errors = show;
        }
        if let Some(list) = env::list_directories() {
            self.list_directories = list;
        }
    }

    /// Make `root` absolute. Pages see it as `ServerRoot` from their own
    /// directory, so a relative root must not survive startup.
    pub fn resolve_root(&mut self) -> Result<(), ConfigError> {
        self.root = std::fs::canonicalize(&self.root)
            .map_err(|source| ConfigError::Root { path: self.root.clone(), source })?;
        Ok(())
    }

    pub fn script_timeout(&self) -> Option<Duration> {
        (self.script_timeout_ms > 0).then(|| Duration::from_millis(self.script_timeout_ms))
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// `host:port` for binding
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn not_found_path(&self) -> PathBuf {
        self.root.join(&self.not_found_page)
    }

    pub fn forbidden_path(&self) -> PathBuf {
        self.root.join(&self.forbidden_page)
    }

    pub fn error_path(&self) -> PathBuf {
        self.root.join(&self.error_page)
    }
}

fn discover() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    let user = dirs::config_dir()?.join("weave").join(CONFIG_FILE_NAME);
    user.is_file().then_some(user)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
