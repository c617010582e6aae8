// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the server crate.

use std::path::PathBuf;

/// Config file path override (`WEAVE_CONFIG`)
pub fn config_path() -> Option<PathBuf> {
    std::env::var("WEAVE_CONFIG").ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Tracing filter directives (`WEAVE_LOG`), e.g. `weave_server=debug`
pub fn log_filter() -> Option<String> {
    std::env::var("WEAVE_LOG").ok().filter(|s| !s.is_empty())
}

/// Document root override
pub fn root() -> Option<PathBuf> {
    std::env::var("WEAVE_ROOT").ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

/// Bind host override
pub fn host() -> Option<String> {
    std::env::var("WEAVE_HOST").ok().filter(|s| !s.is_empty())
}

/// Bind port override
pub fn port() -> Option<u16> {
    std::env::var("WEAVE_PORT").ok().and_then(|s| s.parse::<u16>().ok())
}

/// Whether translated script errors reach the client
pub fn show_errors() -> Option<bool> {
    std::env::var("WEAVE_SHOW_ERRORS").ok().and_then(|s| parse_flag(&s))
}

/// Whether directories without an index are listed
pub fn list_directories() -> Option<bool> {
    std::env::var("WEAVE_LIST_DIRECTORIES").ok().and_then(|s| parse_flag(&s))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
