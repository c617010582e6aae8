// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP wire handling for the page server.
//!
//! Inbound: `METHOD SP TARGET SP PROTOCOL`, `Name: value` header lines, a blank
//! line, then an optional urlencoded body.
//!
//! Outbound: `PROTOCOL SP STATUS\nContent-type: MIME\n\nBODY`

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod mime;
mod request;
mod response;
mod wire;

pub use mime::{content_type_for, mime_from_extension, HTML, PLAIN_TEXT};
pub use request::Request;
pub use response::{Response, Status};
pub use wire::{read_request, write_response, ProtocolError};
