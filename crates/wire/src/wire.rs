// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reading requests from and writing responses to a connection.

use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::response::Response;

/// Errors from the wire layer
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("empty request")]
    Empty,

    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),

    #[error("request larger than {0} bytes")]
    TooLarge(usize),

    #[error("timed out reading request")]
    Timeout,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read one request: the head up to the blank line, then `Content-Length`
/// body bytes if the header is present. Stops early at EOF.
///
/// Returns an empty buffer when the peer closes without sending anything.
pub async fn read_request<R>(
    reader: &mut R,
    timeout: Duration,
    max_bytes: usize,
) -> Result<Vec<u8>, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    tokio::time::timeout(timeout, read_until_complete(reader, max_bytes))
        .await
        .map_err(|_| ProtocolError::Timeout)?
}

async fn read_until_complete<R>(reader: &mut R, max_bytes: usize) -> Result<Vec<u8>, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 4096];
    loop {
        if expected_len(&buf).is_some_and(|expected| buf.len() >= expected) {
            break;
        }
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.len() > max_bytes {
            return Err(ProtocolError::TooLarge(max_bytes));
        }
    }
    Ok(buf)
}

/// Total request length once the head is complete.
fn expected_len(buf: &[u8]) -> Option<usize> {
    let head_end = find(buf, b"\r\n\r\n").map(|p| p + 4).or_else(|| find(buf, b"\n\n").map(|p| p + 2))?;
    let head = String::from_utf8_lossy(&buf[..head_end]);
    let content_length = head
        .lines()
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    Some(head_end + content_length)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Serialize `response` for `protocol` and write it out.
pub async fn write_response<W>(
    writer: &mut W,
    protocol: &str,
    response: &Response,
) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&response.encode(protocol)).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
