// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource resolution: map a request path onto the document root.

use std::path::{Component, Path, PathBuf};

/// What a request path names under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    NotFound,
    File(PathBuf),
    Directory(PathBuf),
    /// Exists but is neither a file nor a directory (socket, fifo, device)
    Anomalous,
}

/// What to serve for a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryArtifact {
    Page(PathBuf),
    Html(PathBuf),
    Listing,
    Forbidden,
}

/// Resolve an already percent-decoded request path against `root`.
///
/// Paths must be absolute and may not climb out of the root with `..`;
/// anything else is `NotFound`, as are broken symlinks.
pub fn resolve(root: &Path, location: &str) -> Resolution {
    let Some(relative) = location.strip_prefix('/') else {
        return Resolution::NotFound;
    };
    let relative = Path::new(relative);
    if !relative.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir)) {
        return Resolution::NotFound;
    }

    let path = root.join(relative);
    // Follows symlinks, so a dangling link fails here
    let Ok(metadata) = std::fs::metadata(&path) else {
        return Resolution::NotFound;
    };
    if metadata.is_file() {
        Resolution::File(path)
    } else if metadata.is_dir() {
        Resolution::Directory(path)
    } else {
        Resolution::Anomalous
    }
}

/// Choose what a directory serves: `index.<page_extension>`, then
/// `index.html`, then a listing when enabled, else forbidden.
pub fn select_index(dir: &Path, page_extension: &str, list_directories: bool) -> DirectoryArtifact {
    let page = dir.join(format!("index.{page_extension}"));
    if page.is_file() {
        return DirectoryArtifact::Page(page);
    }
    let html = dir.join("index.html");
    if html.is_file() {
        return DirectoryArtifact::Html(html);
    }
    if list_directories {
        DirectoryArtifact::Listing
    } else {
        DirectoryArtifact::Forbidden
    }
}

/// Whether `path` has the page extension (case-insensitive).
pub fn is_page(path: &Path, page_extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case(page_extension))
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
