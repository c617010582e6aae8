// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! weave-page: page template compilation and output handling
//!
//! A page is literal text with embedded code between `<?` and `?>`. This crate
//! turns a page into a standalone script plus its literal text segments,
//! stitches the script's output back together, and maps interpreter errors
//! back onto the page's own line numbers.

pub mod compile;
pub mod reassemble;
pub mod segment;
pub mod token;
pub mod translate;

pub use compile::{compile, CompiledPage, PageImports};
pub use reassemble::reassemble;
pub use segment::{segment, CompileError, Segment, Segments, CODE_END, CODE_START};
pub use token::{RenderToken, TokenError};
pub use translate::{translate, ErrorReport, Frame};

/// File suffix of the generated script artifact.
pub const SCRIPT_SUFFIX: &str = "py";

/// File suffix of the side-channel artifact carrying request data.
pub const SIDE_CHANNEL_SUFFIX: &str = "header";

/// Strip a leading UTF-8 byte-order mark, if present.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}
