//! Wire record decoders.
//!
//! [`decode_line`] turns one inbound line into an [`InboundLine`]. It is a
//! pure function: no state, no I/O, no knowledge of which commands are
//! pending. Routing the result is the session's job.
//!
//! # Line shape
//!
//! ```text
//! <prefix>|<field>|<field>|...
//! ```
//!
//! The prefix picks the record family. Fixed-shape families must have an
//! exact field count after the prefix; event families have a short header
//! followed by free-form data fields.
//!
//! # Numbers
//!
//! Fields the line can't be routed without (message ids, command ids) must
//! parse, or the whole line is rejected. Everything else falls back to a
//! sentinel: `-1` for ids, `0` for quantities.

use std::str::FromStr;

use crate::{
    ChatEvent, ChatEventKind, CounterColor, CounterSummary, EventScope,
    GameEvent, GameEventKind, GameSummary, ListRecord, MessageId,
    PlayerSummary, ProtocolError, ResponseOutcome, ZoneCard, ZoneKind,
    ZoneSummary,
};

/// Sentinel substituted for an id field that is not a number.
pub const INVALID_ID: i32 = -1;

/// One decoded inbound line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundLine {
    /// `welcome|<protocol version>|<message>`.
    ///
    /// `version` is `None` when the field is not a number; the session
    /// treats that as a version mismatch.
    Welcome {
        version: Option<u32>,
        message: String,
    },

    /// `resp|<msg id>|<outcome>` — the final answer to a command.
    Response {
        id: MessageId,
        outcome: ResponseOutcome,
    },

    /// `list_games|...` — an unsolicited lobby entry.
    GameListing(GameSummary),

    /// A list record addressed to the pending command `command`.
    Record {
        command: MessageId,
        record: ListRecord,
    },

    /// `public|...` or `private|...`.
    Game(GameEvent),

    /// `chat|...`.
    Chat(ChatEvent),
}

/// The record family selected by a line's first field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix {
    Welcome,
    Resp,
    ListGames,
    ListPlayers,
    ListZones,
    DumpZone,
    ListCounters,
    Public,
    Private,
    Chat,
}

impl Prefix {
    fn from_wire(token: &str) -> Option<Self> {
        let prefix = match token {
            "welcome" => Self::Welcome,
            "resp" => Self::Resp,
            "list_games" => Self::ListGames,
            "list_players" => Self::ListPlayers,
            "list_zones" => Self::ListZones,
            "dump_zone" => Self::DumpZone,
            "list_counters" => Self::ListCounters,
            "public" => Self::Public,
            "private" => Self::Private,
            "chat" => Self::Chat,
            _ => return None,
        };
        Some(prefix)
    }

    fn as_wire(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Resp => "resp",
            Self::ListGames => "list_games",
            Self::ListPlayers => "list_players",
            Self::ListZones => "list_zones",
            Self::DumpZone => "dump_zone",
            Self::ListCounters => "list_counters",
            Self::Public => "public",
            Self::Private => "private",
            Self::Chat => "chat",
        }
    }
}

/// Decodes one line (with or without its trailing newline).
///
/// # Errors
///
/// - [`ProtocolError::EmptyLine`] for a blank line
/// - [`ProtocolError::UnknownPrefix`] for an unrecognized first field
/// - [`ProtocolError::FieldCount`] when a fixed-shape record has the wrong
///   number of fields
/// - [`ProtocolError::TooFewFields`] when an event line is missing its
///   header
/// - [`ProtocolError::InvalidNumber`] when a message id or command id does
///   not parse
pub fn decode_line(line: &str) -> Result<InboundLine, ProtocolError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ProtocolError::EmptyLine);
    }

    let mut fields = line.split('|');
    // `split` always yields at least one item, even for "".
    let head = fields.next().unwrap_or_default();
    let values: Vec<&str> = fields.collect();

    let prefix = Prefix::from_wire(head)
        .ok_or_else(|| ProtocolError::UnknownPrefix(head.to_string()))?;

    match prefix {
        Prefix::Welcome => decode_welcome(&values),
        Prefix::Resp => decode_response(&values),
        Prefix::ListGames => decode_game_listing(&values),
        Prefix::ListPlayers => decode_player_record(&values),
        Prefix::ListZones => decode_zone_record(&values),
        Prefix::DumpZone => decode_card_record(&values),
        Prefix::ListCounters => decode_counter_record(&values),
        Prefix::Public => decode_game_event(EventScope::Public, &values),
        Prefix::Private => decode_game_event(EventScope::Private, &values),
        Prefix::Chat => decode_chat_event(&values),
    }
}

// ---------------------------------------------------------------------------
// Per-family decoders
// ---------------------------------------------------------------------------

fn decode_welcome(values: &[&str]) -> Result<InboundLine, ProtocolError> {
    expect_fields(Prefix::Welcome, values, 2)?;
    Ok(InboundLine::Welcome {
        version: values[0].parse().ok(),
        message: values[1].to_string(),
    })
}

fn decode_response(values: &[&str]) -> Result<InboundLine, ProtocolError> {
    expect_fields(Prefix::Resp, values, 2)?;
    Ok(InboundLine::Response {
        id: parse_message_id(Prefix::Resp, "msg id", values[0])?,
        outcome: ResponseOutcome::from_token(values[1]),
    })
}

fn decode_game_listing(values: &[&str]) -> Result<InboundLine, ProtocolError> {
    expect_fields(Prefix::ListGames, values, 8)?;
    Ok(InboundLine::GameListing(GameSummary {
        game_id: parse_or(values[0], INVALID_ID),
        description: values[1].to_string(),
        has_password: flag(values[2]),
        player_count: parse_or(values[3], 0),
        max_players: parse_or(values[4], 0),
        creator: values[5].to_string(),
        spectators_allowed: flag(values[6]),
        spectator_count: parse_or(values[7], 0),
    }))
}

fn decode_player_record(values: &[&str]) -> Result<InboundLine, ProtocolError> {
    expect_fields(Prefix::ListPlayers, values, 4)?;
    let command = parse_message_id(Prefix::ListPlayers, "cmd id", values[0])?;
    let record = ListRecord::Player(PlayerSummary {
        id: parse_or(values[1], INVALID_ID),
        name: values[2].to_string(),
        score: parse_or(values[3], 0),
    });
    Ok(InboundLine::Record { command, record })
}

fn decode_zone_record(values: &[&str]) -> Result<InboundLine, ProtocolError> {
    expect_fields(Prefix::ListZones, values, 6)?;
    let command = parse_message_id(Prefix::ListZones, "cmd id", values[0])?;
    let record = ListRecord::Zone(ZoneSummary {
        player_id: parse_or(values[1], INVALID_ID),
        name: values[2].to_string(),
        kind: ZoneKind::from_wire(values[3]),
        has_coords: flag(values[4]),
        card_count: parse_or(values[5], 0),
    });
    Ok(InboundLine::Record { command, record })
}

fn decode_card_record(values: &[&str]) -> Result<InboundLine, ProtocolError> {
    expect_fields(Prefix::DumpZone, values, 11)?;
    let command = parse_message_id(Prefix::DumpZone, "cmd id", values[0])?;
    let record = ListRecord::Card(ZoneCard {
        id: parse_or(values[1], INVALID_ID),
        name: values[2].to_string(),
        x: parse_or(values[3], 0),
        color: values[4].to_string(),
        y: parse_or(values[5], 0),
        counters: parse_or(values[6], 0),
        rotation: parse_or(values[7], 0),
        tapped: flag(values[8]),
        face_down: flag(values[9]),
        annotation: values[10].to_string(),
    });
    Ok(InboundLine::Record { command, record })
}

fn decode_counter_record(
    values: &[&str],
) -> Result<InboundLine, ProtocolError> {
    expect_fields(Prefix::ListCounters, values, 6)?;
    let command =
        parse_message_id(Prefix::ListCounters, "cmd id", values[0])?;
    let record = ListRecord::Counter(CounterSummary {
        id: parse_or(values[1], INVALID_ID),
        player_id: parse_or(values[2], INVALID_ID),
        name: values[3].to_string(),
        color: CounterColor::from_packed(parse_or(values[4], 0)),
        count: parse_or(values[5], 0),
    });
    Ok(InboundLine::Record { command, record })
}

fn decode_game_event(
    scope: EventScope,
    values: &[&str],
) -> Result<InboundLine, ProtocolError> {
    let prefix = match scope {
        EventScope::Public => Prefix::Public,
        EventScope::Private => Prefix::Private,
    };
    expect_at_least(prefix, values, 3)?;

    Ok(InboundLine::Game(GameEvent {
        scope,
        player_id: parse_or(values[0], INVALID_ID),
        player_name: values[1].to_string(),
        kind: GameEventKind::from_wire(values[2]),
        data: owned(&values[3..]),
    }))
}

fn decode_chat_event(values: &[&str]) -> Result<InboundLine, ProtocolError> {
    expect_at_least(Prefix::Chat, values, 1)?;
    Ok(InboundLine::Chat(ChatEvent {
        kind: ChatEventKind::from_wire(values[0]),
        data: owned(&values[1..]),
    }))
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn expect_fields(
    prefix: Prefix,
    values: &[&str],
    expected: usize,
) -> Result<(), ProtocolError> {
    if values.len() != expected {
        return Err(ProtocolError::FieldCount {
            prefix: prefix.as_wire(),
            expected,
            actual: values.len(),
        });
    }
    Ok(())
}

fn expect_at_least(
    prefix: Prefix,
    values: &[&str],
    minimum: usize,
) -> Result<(), ProtocolError> {
    if values.len() < minimum {
        return Err(ProtocolError::TooFewFields {
            prefix: prefix.as_wire(),
            minimum,
            actual: values.len(),
        });
    }
    Ok(())
}

fn parse_message_id(
    prefix: Prefix,
    field: &'static str,
    value: &str,
) -> Result<MessageId, ProtocolError> {
    value
        .parse()
        .map(MessageId)
        .map_err(|_| ProtocolError::InvalidNumber {
            prefix: prefix.as_wire(),
            field,
            value: value.to_string(),
        })
}

/// Parses a non-critical numeric field, substituting `fallback` on failure.
fn parse_or<T: FromStr + Copy + std::fmt::Debug>(value: &str, fallback: T) -> T {
    value.parse().unwrap_or_else(|_| {
        tracing::trace!(value, ?fallback, "non-numeric field, using fallback");
        fallback
    })
}

fn flag(value: &str) -> bool {
    value == "1"
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}
