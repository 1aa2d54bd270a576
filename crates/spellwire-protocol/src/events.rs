//! Unsolicited events pushed by the server: game events and chat events.
//!
//! Both families carry a closed set of kinds. Kind strings are matched
//! exactly; anything unrecognized maps to an `Invalid` kind instead of
//! failing the decode, so new server-side kinds degrade gracefully.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Game events
// ---------------------------------------------------------------------------

/// Whether a game event was broadcast to the table or sent to this client
/// only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventScope {
    /// Line prefix `public`.
    Public,
    /// Line prefix `private`.
    Private,
}

/// What happened in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEventKind {
    PlayerId,
    Say,
    Join,
    Leave,
    GameClosed,
    ReadyStart,
    SetupZones,
    GameStart,
    Shuffle,
    RollDie,
    Draw,
    MoveCard,
    CreateToken,
    SetCardAttr,
    AddCounter,
    SetCounter,
    DelCounter,
    SetActivePlayer,
    SetActivePhase,
    DumpZone,
    StopDumpZone,
    /// The kind string was not recognized.
    Invalid,
}

impl GameEventKind {
    /// Every recognized kind, in wire-table order.
    pub const ALL: [GameEventKind; 21] = [
        Self::PlayerId,
        Self::Say,
        Self::Join,
        Self::Leave,
        Self::GameClosed,
        Self::ReadyStart,
        Self::SetupZones,
        Self::GameStart,
        Self::Shuffle,
        Self::RollDie,
        Self::Draw,
        Self::MoveCard,
        Self::CreateToken,
        Self::SetCardAttr,
        Self::AddCounter,
        Self::SetCounter,
        Self::DelCounter,
        Self::SetActivePlayer,
        Self::SetActivePhase,
        Self::DumpZone,
        Self::StopDumpZone,
    ];

    /// Looks up a kind by its wire name.
    pub fn from_wire(name: &str) -> Self {
        match name {
            "player_id" => Self::PlayerId,
            "say" => Self::Say,
            "join" => Self::Join,
            "leave" => Self::Leave,
            "game_closed" => Self::GameClosed,
            "ready_start" => Self::ReadyStart,
            "setup_zones" => Self::SetupZones,
            "game_start" => Self::GameStart,
            "shuffle" => Self::Shuffle,
            "roll_die" => Self::RollDie,
            "draw" => Self::Draw,
            "move_card" => Self::MoveCard,
            "create_token" => Self::CreateToken,
            "set_card_attr" => Self::SetCardAttr,
            "add_counter" => Self::AddCounter,
            "set_counter" => Self::SetCounter,
            "del_counter" => Self::DelCounter,
            "set_active_player" => Self::SetActivePlayer,
            "set_active_phase" => Self::SetActivePhase,
            "dump_zone" => Self::DumpZone,
            "stop_dump_zone" => Self::StopDumpZone,
            _ => Self::Invalid,
        }
    }

    /// The wire name, or `None` for [`GameEventKind::Invalid`].
    pub fn as_wire(self) -> Option<&'static str> {
        let name = match self {
            Self::PlayerId => "player_id",
            Self::Say => "say",
            Self::Join => "join",
            Self::Leave => "leave",
            Self::GameClosed => "game_closed",
            Self::ReadyStart => "ready_start",
            Self::SetupZones => "setup_zones",
            Self::GameStart => "game_start",
            Self::Shuffle => "shuffle",
            Self::RollDie => "roll_die",
            Self::Draw => "draw",
            Self::MoveCard => "move_card",
            Self::CreateToken => "create_token",
            Self::SetCardAttr => "set_card_attr",
            Self::AddCounter => "add_counter",
            Self::SetCounter => "set_counter",
            Self::DelCounter => "del_counter",
            Self::SetActivePlayer => "set_active_player",
            Self::SetActivePhase => "set_active_phase",
            Self::DumpZone => "dump_zone",
            Self::StopDumpZone => "stop_dump_zone",
            Self::Invalid => return None,
        };
        Some(name)
    }
}

/// A decoded `public|...` or `private|...` line.
///
/// Wire shape: `<scope>|<player id>|<player name>|<kind>|<data>*`.
/// `data` is passed through untouched; its meaning depends on `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub scope: EventScope,
    /// Originating player, `-1` when the field was not a number.
    pub player_id: i32,
    pub player_name: String,
    pub kind: GameEventKind,
    pub data: Vec<String>,
}

impl GameEvent {
    /// `true` for events broadcast to the whole table.
    pub fn is_public(&self) -> bool {
        self.scope == EventScope::Public
    }
}

// ---------------------------------------------------------------------------
// Chat events
// ---------------------------------------------------------------------------

/// What happened in the chat subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChatEventKind {
    ListChannels,
    JoinChannel,
    ListPlayers,
    LeaveChannel,
    Say,
    ServerMessage,
    /// The kind string was not recognized.
    Invalid,
}

impl ChatEventKind {
    /// Every recognized kind, in wire-table order.
    pub const ALL: [ChatEventKind; 6] = [
        Self::ListChannels,
        Self::JoinChannel,
        Self::ListPlayers,
        Self::LeaveChannel,
        Self::Say,
        Self::ServerMessage,
    ];

    /// Looks up a kind by its wire name.
    pub fn from_wire(name: &str) -> Self {
        match name {
            "list_channels" => Self::ListChannels,
            "join_channel" => Self::JoinChannel,
            "list_players" => Self::ListPlayers,
            "leave_channel" => Self::LeaveChannel,
            "say" => Self::Say,
            "server_message" => Self::ServerMessage,
            _ => Self::Invalid,
        }
    }

    /// The wire name, or `None` for [`ChatEventKind::Invalid`].
    pub fn as_wire(self) -> Option<&'static str> {
        let name = match self {
            Self::ListChannels => "list_channels",
            Self::JoinChannel => "join_channel",
            Self::ListPlayers => "list_players",
            Self::LeaveChannel => "leave_channel",
            Self::Say => "say",
            Self::ServerMessage => "server_message",
            Self::Invalid => return None,
        };
        Some(name)
    }
}

/// A decoded `chat|<kind>|<data>*` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEvent {
    pub kind: ChatEventKind,
    pub data: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_event_kind_wire_names_are_inverse() {
        for kind in GameEventKind::ALL {
            let name = kind.as_wire().expect("recognized kinds have names");
            assert_eq!(GameEventKind::from_wire(name), kind);
        }
    }

    #[test]
    fn test_game_event_kind_unknown_is_invalid() {
        assert_eq!(GameEventKind::from_wire("fly"), GameEventKind::Invalid);
        // No prefix or case-insensitive matching.
        assert_eq!(GameEventKind::from_wire("Say"), GameEventKind::Invalid);
        assert_eq!(GameEventKind::from_wire("dump"), GameEventKind::Invalid);
        assert_eq!(GameEventKind::Invalid.as_wire(), None);
    }

    #[test]
    fn test_chat_event_kind_wire_names_are_inverse() {
        for kind in ChatEventKind::ALL {
            let name = kind.as_wire().expect("recognized kinds have names");
            assert_eq!(ChatEventKind::from_wire(name), kind);
        }
    }

    #[test]
    fn test_chat_event_kind_unknown_is_invalid() {
        assert_eq!(ChatEventKind::from_wire("shout"), ChatEventKind::Invalid);
        assert_eq!(ChatEventKind::Invalid.as_wire(), None);
    }

    #[test]
    fn test_game_event_is_public() {
        let event = GameEvent {
            scope: EventScope::Private,
            player_id: 1,
            player_name: "alice".into(),
            kind: GameEventKind::Draw,
            data: vec!["3".into()],
        };
        assert!(!event.is_public());
    }
}
