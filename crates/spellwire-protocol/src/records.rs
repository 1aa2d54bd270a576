//! Fixed-shape list and dump records.
//!
//! The server answers listing commands (`list_players`, `list_zones`,
//! `dump_zone`, `list_counters`, `dump_all`) by streaming one record line
//! per item, each tagged with the id of the command it belongs to, and
//! then a single `resp` line. `list_games` records are unsolicited lobby
//! updates and carry no command id.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Lobby
// ---------------------------------------------------------------------------

/// One game in the lobby (`list_games`, 8 fields).
///
/// Wire order: `game id | description | has password | player count |
/// max players | creator | spectators allowed | spectator count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: i32,
    pub description: String,
    pub has_password: bool,
    pub player_count: i32,
    pub max_players: i32,
    pub creator: String,
    pub spectators_allowed: bool,
    pub spectator_count: i32,
}

/// One player in the current game (`list_players`, cmd id + 3 fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: i32,
    pub name: String,
    pub score: i32,
}

// ---------------------------------------------------------------------------
// Zones and cards
// ---------------------------------------------------------------------------

/// Who can see the cards in a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    /// Everyone sees every card (battlefield, graveyard).
    Public,
    /// Only the owner sees the cards (hand).
    Private,
    /// Nobody sees the cards (library).
    Hidden,
}

impl ZoneKind {
    /// `private` and `hidden` are recognized; anything else is public.
    pub fn from_wire(token: &str) -> Self {
        match token {
            "private" => Self::Private,
            "hidden" => Self::Hidden,
            _ => Self::Public,
        }
    }

    /// The wire token for this kind.
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Hidden => "hidden",
        }
    }
}

/// One zone of a player (`list_zones`, cmd id + 5 fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSummary {
    pub player_id: i32,
    pub name: String,
    pub kind: ZoneKind,
    /// Cards in this zone are placed at x/y coordinates.
    pub has_coords: bool,
    pub card_count: i32,
}

/// One card of a dumped zone (`dump_zone`, cmd id + 10 fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneCard {
    pub id: i32,
    pub name: String,
    pub x: i32,
    pub color: String,
    pub y: i32,
    pub counters: i32,
    pub rotation: i32,
    pub tapped: bool,
    pub face_down: bool,
    pub annotation: String,
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

/// An RGB colour packed on the wire as `red * 65536 + green * 256 + blue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CounterColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl CounterColor {
    /// Largest value a packed colour can hold (`0xFFFFFF`).
    pub const MAX_PACKED: i32 = 0x00FF_FFFF;

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Unpacks a wire colour. Out-of-range values are clamped into
    /// `0..=0xFFFFFF` first, so every channel stays within 0–255.
    pub fn from_packed(value: i32) -> Self {
        let value = value.clamp(0, Self::MAX_PACKED);
        Self {
            red: (value / 65_536) as u8,
            green: ((value % 65_536) / 256) as u8,
            blue: (value % 256) as u8,
        }
    }

    /// Packs the colour for the wire.
    pub fn to_packed(self) -> i32 {
        i32::from(self.red) * 65_536
            + i32::from(self.green) * 256
            + i32::from(self.blue)
    }
}

/// One counter of a player (`list_counters`, cmd id + 5 fields).
///
/// The display radius chosen in `add_counter` is not echoed back by the
/// listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSummary {
    pub id: i32,
    pub player_id: i32,
    pub name: String,
    pub color: CounterColor,
    pub count: i32,
}

// ---------------------------------------------------------------------------
// ListRecord
// ---------------------------------------------------------------------------

/// A record addressed to a pending listing command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListRecord {
    Player(PlayerSummary),
    Zone(ZoneSummary),
    Card(ZoneCard),
    Counter(CounterSummary),
}

impl ListRecord {
    /// The wire prefix this record arrived with; used in diagnostics.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Player(_) => "list_players",
            Self::Zone(_) => "list_zones",
            Self::Card(_) => "dump_zone",
            Self::Counter(_) => "list_counters",
        }
    }
}
