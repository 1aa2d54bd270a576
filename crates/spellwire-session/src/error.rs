//! Error types for the session layer.

use spellwire_protocol::{MessageId, ResponseOutcome};

/// Session-level failures.
///
/// Every variant except [`SessionError::CommandCancelled`] ends the
/// session: it is published as [`SessionEvent::Fatal`](crate::SessionEvent)
/// right before the transition to `Disconnected`.
///
/// `Clone` because the same error goes out to observers and into the
/// driver's own logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The server speaks a different protocol version.
    ///
    /// `got` is `None` when the welcome line's version field is not a
    /// number at all.
    #[error("protocol version mismatch: expected {expected}, server sent {}", describe_version(.got))]
    VersionMismatch { expected: u32, got: Option<u32> },

    /// A pending command missed too many heartbeat ticks. The link is
    /// considered dead.
    #[error("server timeout: command {msg_id} got no response")]
    ServerTimeout { msg_id: MessageId },

    /// The line stream reported an error.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server refused the login.
    #[error("login rejected: {0}")]
    LoginRejected(ResponseOutcome),

    /// The command was discarded by a disconnect before the server
    /// answered it. Only ever seen by the issuer of that command.
    #[error("command cancelled by disconnect")]
    CommandCancelled,
}

impl SessionError {
    /// `true` for the errors that terminate a session.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::CommandCancelled)
    }
}

fn describe_version(got: &Option<u32>) -> String {
    match got {
        Some(version) => version.to_string(),
        None => "garbage".to_string(),
    }
}
