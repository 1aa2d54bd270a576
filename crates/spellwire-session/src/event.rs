//! Everything the session tells the outside world.

use spellwire_protocol::{ChatEvent, GameEvent, GameSummary, ProtocolError};

use crate::{ConnectionStatus, SessionError};

/// A notification produced by the [`Session`](crate::Session).
///
/// Events are queued in the exact order their causes were processed, so
/// draining the queue after each stimulus preserves arrival order.
/// Command results are not events: they go straight to the issuer's
/// [`CommandHandle`](crate::CommandHandle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The connection status changed. Never emitted for a no-op transition.
    StatusChanged(ConnectionStatus),

    /// The server's greeting, after the protocol version was accepted.
    Welcome { message: String },

    /// The server told us which player id we have in the current game.
    PlayerIdAssigned { player_id: i32, name: String },

    /// An unsolicited lobby entry (`list_games`).
    GameListed(GameSummary),

    /// A `public` or `private` game event.
    Game(GameEvent),

    /// A `chat` event.
    Chat(ChatEvent),

    /// An inbound line was dropped. The session carries on.
    ProtocolError(ProtocolError),

    /// The session is going down; a `StatusChanged(Disconnected)` follows.
    Fatal(SessionError),
}
