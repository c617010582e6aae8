// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequential accept loop.
//!
//! One connection at a time: accept, read, respond, close. Shutdown is
//! checked between connections.

use std::net::SocketAddr;
use std::time::Instant;

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use weave_exec::ScriptRunner;
use weave_wire::{read_request, write_response, ProtocolError, Request, Response, Status, PLAIN_TEXT};

use crate::config::Settings;
use crate::render::Renderer;
use crate::respond::respond;

/// Protocol echoed when the request line is unusable.
const FALLBACK_PROTOCOL: &str = "HTTP/1.1";

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to resolve {address}: {source}")]
    Resolve {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{address} resolved to no usable address")]
    NoAddress { address: String },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Bind the listening socket with address reuse and the configured backlog.
pub async fn bind(settings: &Settings) -> Result<TcpListener, ServeError> {
    let address = settings.address();
    let addr = tokio::net::lookup_host(&address)
        .await
        .map_err(|source| ServeError::Resolve { address: address.clone(), source })?
        .next()
        .ok_or_else(|| ServeError::NoAddress { address: address.clone() })?;

    let open = |addr: SocketAddr| -> std::io::Result<TcpListener> {
        let socket = if addr.is_ipv4() { TcpSocket::new_v4()? } else { TcpSocket::new_v6()? };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        socket.listen(settings.backlog)
    };
    open(addr).map_err(|source| ServeError::Bind { address: addr, source })
}

/// Errors from a single connection. Logged, never fatal to the loop.
#[derive(Debug, Error)]
enum ConnectionError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Accepts connections and answers them one after another.
pub struct Listener<R> {
    listener: TcpListener,
    renderer: Renderer<R>,
    shutdown: CancellationToken,
}

impl<R: ScriptRunner> Listener<R> {
    pub fn new(listener: TcpListener, renderer: Renderer<R>, shutdown: CancellationToken) -> Self {
        Self { listener, renderer, shutdown }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run until the shutdown token is cancelled.
    pub async fn run(self) {
        loop {
            let accepted = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                result = self.listener.accept() => result,
            };
            match accepted {
                Ok((stream, peer)) => self.handle(stream, peer).await,
                Err(e) => error!("accept error: {}", e),
            }
        }
        info!("listener stopped");
    }

    async fn handle(&self, mut stream: TcpStream, peer: SocketAddr) {
        debug!(%peer, "connection accepted");
        if let Err(e) = self.serve_connection(&mut stream).await {
            log_connection_error(peer, e);
        }
        if let Err(e) = stream.shutdown().await {
            debug!(%peer, error = %e, "shutdown after response failed");
        }
    }

    async fn serve_connection(&self, stream: &mut TcpStream) -> Result<(), ConnectionError> {
        let settings = self.renderer.settings();
        let raw = match read_request(stream, settings.read_timeout(), settings.max_request_bytes).await {
            Ok(raw) => raw,
            Err(e @ ProtocolError::TooLarge(_)) => {
                warn!(error = %e, "rejecting request");
                write_response(stream, FALLBACK_PROTOCOL, &bad_request()).await?;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        if raw.is_empty() {
            debug!("connection closed without a request");
            return Ok(());
        }
        if settings.log_requests {
            info!(raw = %String::from_utf8_lossy(&raw), "raw request");
        }

        let request = match Request::parse(&raw) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "rejecting request");
                write_response(stream, FALLBACK_PROTOCOL, &bad_request()).await?;
                return Ok(());
            }
        };

        let started = Instant::now();
        let response = respond(&self.renderer, &request).await;
        info!(
            method = %request.method,
            location = %request.path,
            status = response.status.code(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request served",
        );
        write_response(stream, &request.protocol, &response).await?;
        Ok(())
    }
}

fn bad_request() -> Response {
    Response::new(Status::BadRequest, PLAIN_TEXT, Status::BadRequest.line())
}

fn log_connection_error(peer: SocketAddr, e: ConnectionError) {
    match e {
        ConnectionError::Protocol(ProtocolError::Timeout) => {
            warn!(%peer, "timed out waiting for request")
        }
        _ => error!(%peer, "connection error: {}", e),
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
