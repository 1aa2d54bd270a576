//! Identity and outcome types shared by every layer.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// MessageId
// ---------------------------------------------------------------------------

/// Correlation key for an outgoing command.
///
/// The client prefixes every command line with its message id
/// (`"7|list_players"`), and the server echoes the id back in the `resp`
/// line that answers it, and in the leading field of every list record it
/// streams for that command.
///
/// Newtype over `u32` so a message id can't be confused with the many
/// other integers on the wire (player ids, card ids, counters).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct MessageId(pub u32);

impl MessageId {
    /// Returns the underlying `u32`.
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Formats as the bare number, which is also its wire form.
impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ResponseOutcome
// ---------------------------------------------------------------------------

/// The server's verdict on a command, carried by a `resp` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseOutcome {
    /// `resp|<id>|ok`
    Ok,
    /// Any token other than `ok` or `password`.
    Err,
    /// `resp|<id>|password` — the game or account needs a password.
    PasswordRequired,
}

impl ResponseOutcome {
    /// Maps the outcome token of a `resp` line. Unknown tokens are errors,
    /// never decode failures.
    pub fn from_token(token: &str) -> Self {
        match token {
            "ok" => Self::Ok,
            "password" => Self::PasswordRequired,
            _ => Self::Err,
        }
    }

    /// `true` only for [`ResponseOutcome::Ok`].
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for ResponseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ok => "ok",
            Self::Err => "error",
            Self::PasswordRequired => "password required",
        };
        f.write_str(s)
    }
}
