//! Connection status: where the session is in its lifecycle.

use std::fmt;

/// The current status of the connection to the server.
///
/// ```text
/// Disconnected ──connect──→ Connecting ──stream up──→ AwaitingWelcome
///      ↑                                                    │
///      │                                           welcome (version ok)
///      │                                                    ▼
///      │      any fatal error / disconnect             LoggingIn
///      ├────────────────────────────────────────            │
///      │                                               login ok
///      │                                                    ▼
///      │                         Playing ←─create/join ok── Idle
///      │                            └───────leave ok────────→┘
/// ```
///
/// Only the [`Session`](crate::Session) changes it. Everything else reads
/// it, usually through [`SessionEvent::StatusChanged`](crate::SessionEvent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    /// A connection was requested; the stream is not up yet.
    Connecting,
    /// The stream is up; waiting for the server's `welcome` line.
    AwaitingWelcome,
    /// The login command is in flight.
    LoggingIn,
    /// Logged in, in the lobby.
    Idle,
    /// Inside a game.
    Playing,
}

impl ConnectionStatus {
    /// `true` once the stream is up, until the session is torn down.
    ///
    /// This is exactly the window in which the heartbeat runs.
    pub fn is_live(self) -> bool {
        !matches!(self, Self::Disconnected | Self::Connecting)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::AwaitingWelcome => "awaiting welcome",
            Self::LoggingIn => "logging in",
            Self::Idle => "idle",
            Self::Playing => "playing",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_live_excludes_disconnected_and_connecting() {
        assert!(!ConnectionStatus::Disconnected.is_live());
        assert!(!ConnectionStatus::Connecting.is_live());
        assert!(ConnectionStatus::AwaitingWelcome.is_live());
        assert!(ConnectionStatus::LoggingIn.is_live());
        assert!(ConnectionStatus::Idle.is_live());
        assert!(ConnectionStatus::Playing.is_live());
    }

    #[test]
    fn test_default_is_disconnected() {
        assert_eq!(ConnectionStatus::default(), ConnectionStatus::Disconnected);
    }
}
