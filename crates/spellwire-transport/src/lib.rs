//! Line-stream abstraction layer for Spellwire.
//!
//! The game server speaks a newline-terminated text protocol. This crate
//! hides where those lines come from behind the [`LineStream`] trait so the
//! session core only ever sees two primitives: "send line" and "line
//! received".
//!
//! # Implementations
//!
//! - [`TextLineStream`] — any tokio `AsyncRead` + `AsyncWrite` pair. The
//!   [`TcpLineStream`] alias covers plain TCP; [`TextLineStream::duplex`]
//!   builds an in-memory pair for tests and embedding.
//! - `WebSocketLineStream` — one text frame per line (feature `websocket`,
//!   enabled by default).

#![allow(async_fn_in_trait)]

mod error;
mod text;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
pub use text::{TcpLineStream, TextLineStream};
#[cfg(feature = "websocket")]
pub use websocket::WebSocketLineStream;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier for a connection.
///
/// Only used to tell connections apart in logs; the wire protocol never
/// sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocates the next process-wide connection id.
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A duplex stream of text lines.
///
/// Lines are passed without their terminator in both directions: the
/// implementation appends `\n` on send and strips `\n` / `\r\n` on receive.
pub trait LineStream: Send + Sync + 'static {
    /// The error type for stream operations.
    type Error: std::error::Error + Send + Sync;

    /// Writes one line to the remote peer.
    async fn send_line(&self, line: &str) -> Result<(), Self::Error>;

    /// Waits for the next complete line from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    ///
    /// Implementations must be cancel-safe: the session driver calls this
    /// inside `tokio::select!`, and a partially received line must not be
    /// lost when the branch is dropped.
    async fn recv_line(&self) -> Result<Option<String>, Self::Error>;

    /// Closes the stream.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns the unique identifier for this stream.
    fn id(&self) -> ConnectionId;
}

/// Removes a trailing `\n` or `\r\n` from a received line.
pub(crate) fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Turns one received line into text, terminator stripped.
///
/// Invalid UTF-8 sequences become U+FFFD. The line still reaches the
/// decoder, which drops it only if the damage broke its shape.
pub(crate) fn decode_line_lossy(conn_id: ConnectionId, bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    if let std::borrow::Cow::Owned(_) = text {
        tracing::warn!(%conn_id, len = bytes.len(), "line is not valid UTF-8, decoded lossily");
    }
    strip_terminator(&text).to_string()
}
