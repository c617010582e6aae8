// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! weave-server: the page server
//!
//! Resolves request paths under a document root, serves static files and
//! directory listings, and renders pages through an out-of-process script
//! runner. Connections are handled one at a time.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod env;
pub mod listener;
pub mod listing;
pub mod logging;
pub mod render;
pub mod resolve;
pub mod respond;

pub use config::{ConfigError, Settings};
pub use listener::{bind, Listener, ServeError};
pub use logging::LoggingError;
pub use render::{fallback_body, RenderError, RenderMode, Renderer};
pub use resolve::{resolve, select_index, DirectoryArtifact, Resolution};
pub use respond::respond;
