//! Error types for the protocol layer.
//!
//! Every variant describes one inbound line that could not be used. None
//! of them is fatal on its own: the session drops the line, reports the
//! error to observers, and carries on with the next line.

use crate::MessageId;

/// A line-level protocol violation.
///
/// `Clone` and `PartialEq` so the session can hand copies to observers and
/// tests can compare them directly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The line had no content at all.
    #[error("empty line")]
    EmptyLine,

    /// The first field is not a known record family.
    #[error("unknown line prefix `{0}`")]
    UnknownPrefix(String),

    /// A fixed-shape record had the wrong number of fields after its prefix.
    #[error("`{prefix}` expects {expected} fields, got {actual}")]
    FieldCount {
        prefix: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An event line was too short to carry its header fields.
    #[error("`{prefix}` expects at least {minimum} fields, got {actual}")]
    TooFewFields {
        prefix: &'static str,
        minimum: usize,
        actual: usize,
    },

    /// A field the line cannot be routed without was not a number.
    #[error("`{prefix}` field `{field}` is not a valid number: `{value}`")]
    InvalidNumber {
        prefix: &'static str,
        field: &'static str,
        value: String,
    },

    /// A list record named a command that is not pending, or whose pending
    /// command does not collect this kind of record.
    #[error("`{prefix}` record for command {command} has no matching listing command")]
    UnroutableRecord {
        prefix: &'static str,
        command: MessageId,
    },

    /// The line decoded fine but is not valid at this point of the protocol.
    ///
    /// Example: a `player_id` event without exactly an id and a name, or a
    /// `welcome` line while already logged in.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
