//! Wire protocol for Spellwire.
//!
//! This crate defines the "language" the client and the game server speak:
//! newline-terminated UTF-8 lines whose fields are separated by `|`.
//!
//! - **Types** ([`MessageId`], [`ResponseOutcome`], records, events) —
//!   what travels on the wire.
//! - **Decoding** ([`decode_line`], [`InboundLine`]) — one inbound line to
//!   one structured message.
//! - **Encoding** ([`Command`]) — one outgoing command to its line(s).
//! - **Errors** ([`ProtocolError`]) — what can be wrong with a line.
//!
//! # Architecture
//!
//! The protocol layer sits between the line stream and the session. It
//! keeps no state: it doesn't know which commands are pending or what the
//! connection status is.
//!
//! ```text
//! Transport (lines) → Protocol (InboundLine / Command) → Session (state)
//! ```

mod command;
mod decode;
mod error;
mod events;
mod records;
mod types;

pub use command::{Command, DECK_TERMINATOR};
pub use decode::{INVALID_ID, InboundLine, decode_line};
pub use error::ProtocolError;
pub use events::{
    ChatEvent, ChatEventKind, EventScope, GameEvent, GameEventKind,
};
pub use records::{
    CounterColor, CounterSummary, GameSummary, ListRecord, PlayerSummary,
    ZoneCard, ZoneKind, ZoneSummary,
};
pub use types::{MessageId, ResponseOutcome};

/// Protocol version this client speaks. The server announces its own in
/// the `welcome` line; a mismatch ends the session.
pub const PROTOCOL_VERSION: u32 = 1;
