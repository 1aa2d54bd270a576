//! Outgoing commands and their line encoding.
//!
//! Every command goes out as one line:
//!
//! ```text
//! <msg id>|<command name>[|<field>]*
//! ```
//!
//! Booleans encode as `1` / `0`. `submit_deck` is the only multi-line
//! command: its deck lines follow the command line verbatim, terminated by
//! a line holding a single `.`.
//!
//! The protocol has no escaping, so fields must not contain `|` or line
//! breaks. Callers are responsible for that.

use serde::{Deserialize, Serialize};

use crate::{CounterColor, MessageId};

/// Terminator line sent after the deck lines of `submit_deck`.
pub const DECK_TERMINATOR: &str = ".";

/// A command the client can send to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    // -- Session --
    /// Heartbeat probe.
    Ping,
    Login { name: String, password: String },

    // -- Chat --
    ChatListChannels,
    ChatJoinChannel { name: String },
    ChatLeaveChannel { name: String },
    ChatSay { channel: String, text: String },

    // -- Lobby --
    ListGames,
    CreateGame {
        description: String,
        password: String,
        max_players: u32,
        spectators_allowed: bool,
    },
    JoinGame {
        game_id: i32,
        password: String,
        spectator: bool,
    },
    LeaveGame,

    // -- Game --
    ListPlayers,
    Say { text: String },
    Shuffle,
    RollDie { sides: u32 },
    DrawCards { count: u32 },
    /// `card_id` is the card's id when `start_zone` is public, otherwise
    /// the card's position inside the zone.
    MoveCard {
        card_id: i32,
        start_zone: String,
        target_zone: String,
        x: i32,
        y: i32,
        face_down: bool,
    },
    CreateToken {
        zone: String,
        name: String,
        power_toughness: String,
        x: i32,
        y: i32,
    },
    SetCardAttr {
        zone: String,
        card_id: i32,
        name: String,
        value: String,
    },
    SubmitDeck { lines: Vec<String> },
    ReadyStart,
    IncCounter { counter_id: i32, delta: i32 },
    AddCounter {
        name: String,
        color: CounterColor,
        radius: i32,
        value: i32,
    },
    SetCounter { counter_id: i32, value: i32 },
    DelCounter { counter_id: i32 },
    ListCounters { player_id: i32 },
    NextTurn,
    SetActivePhase { phase: i32 },
    ListZones { player_id: i32 },
    DumpZone {
        player_id: i32,
        zone: String,
        count: i32,
    },
    StopDumpZone { player_id: i32, zone: String },
    DumpAll,
}

impl Command {
    /// The wire name of the command.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Login { .. } => "login",
            Self::ChatListChannels => "chat_list_channels",
            Self::ChatJoinChannel { .. } => "chat_join_channel",
            Self::ChatLeaveChannel { .. } => "chat_leave_channel",
            Self::ChatSay { .. } => "chat_say",
            Self::ListGames => "list_games",
            Self::CreateGame { .. } => "create_game",
            Self::JoinGame { .. } => "join_game",
            Self::LeaveGame => "leave_game",
            Self::ListPlayers => "list_players",
            Self::Say { .. } => "say",
            Self::Shuffle => "shuffle",
            Self::RollDie { .. } => "roll_die",
            Self::DrawCards { .. } => "draw_cards",
            Self::MoveCard { .. } => "move_card",
            Self::CreateToken { .. } => "create_token",
            Self::SetCardAttr { .. } => "set_card_attr",
            Self::SubmitDeck { .. } => "submit_deck",
            Self::ReadyStart => "ready_start",
            Self::IncCounter { .. } => "inc_counter",
            Self::AddCounter { .. } => "add_counter",
            Self::SetCounter { .. } => "set_counter",
            Self::DelCounter { .. } => "del_counter",
            Self::ListCounters { .. } => "list_counters",
            Self::NextTurn => "next_turn",
            Self::SetActivePhase { .. } => "set_active_phase",
            Self::ListZones { .. } => "list_zones",
            Self::DumpZone { .. } => "dump_zone",
            Self::StopDumpZone { .. } => "stop_dump_zone",
            Self::DumpAll => "dump_all",
        }
    }

    /// The fields that follow the command name, already formatted.
    fn args(&self) -> Vec<String> {
        match self {
            Self::Ping
            | Self::ChatListChannels
            | Self::ListGames
            | Self::LeaveGame
            | Self::ListPlayers
            | Self::Shuffle
            | Self::SubmitDeck { .. }
            | Self::ReadyStart
            | Self::NextTurn
            | Self::DumpAll => Vec::new(),

            Self::Login { name, password } => {
                vec![name.clone(), password.clone()]
            }
            Self::ChatJoinChannel { name } | Self::ChatLeaveChannel { name } => {
                vec![name.clone()]
            }
            Self::ChatSay { channel, text } => {
                vec![channel.clone(), text.clone()]
            }
            Self::CreateGame {
                description,
                password,
                max_players,
                spectators_allowed,
            } => vec![
                description.clone(),
                password.clone(),
                max_players.to_string(),
                bit(*spectators_allowed),
            ],
            Self::JoinGame {
                game_id,
                password,
                spectator,
            } => vec![game_id.to_string(), password.clone(), bit(*spectator)],
            Self::Say { text } => vec![text.clone()],
            Self::RollDie { sides } => vec![sides.to_string()],
            Self::DrawCards { count } => vec![count.to_string()],
            Self::MoveCard {
                card_id,
                start_zone,
                target_zone,
                x,
                y,
                face_down,
            } => vec![
                card_id.to_string(),
                start_zone.clone(),
                target_zone.clone(),
                x.to_string(),
                y.to_string(),
                bit(*face_down),
            ],
            Self::CreateToken {
                zone,
                name,
                power_toughness,
                x,
                y,
            } => vec![
                zone.clone(),
                name.clone(),
                power_toughness.clone(),
                x.to_string(),
                y.to_string(),
            ],
            Self::SetCardAttr {
                zone,
                card_id,
                name,
                value,
            } => vec![
                zone.clone(),
                card_id.to_string(),
                name.clone(),
                value.clone(),
            ],
            Self::IncCounter { counter_id, delta } => {
                vec![counter_id.to_string(), delta.to_string()]
            }
            Self::AddCounter {
                name,
                color,
                radius,
                value,
            } => vec![
                name.clone(),
                color.to_packed().to_string(),
                radius.to_string(),
                value.to_string(),
            ],
            Self::SetCounter { counter_id, value } => {
                vec![counter_id.to_string(), value.to_string()]
            }
            Self::DelCounter { counter_id } => vec![counter_id.to_string()],
            Self::ListCounters { player_id } | Self::ListZones { player_id } => {
                vec![player_id.to_string()]
            }
            Self::SetActivePhase { phase } => vec![phase.to_string()],
            Self::DumpZone {
                player_id,
                zone,
                count,
            } => vec![player_id.to_string(), zone.clone(), count.to_string()],
            Self::StopDumpZone { player_id, zone } => {
                vec![player_id.to_string(), zone.clone()]
            }
        }
    }

    /// Encodes the command line for message id `id`, without terminator.
    pub fn encode(&self, id: MessageId) -> String {
        let mut line = format!("{id}|{}", self.name());
        for arg in self.args() {
            line.push('|');
            line.push_str(&arg);
        }
        line
    }

    /// Lines that must be sent right after the command line.
    ///
    /// Empty for everything except `submit_deck`, whose deck lines are
    /// followed by [`DECK_TERMINATOR`].
    pub fn trailer(&self) -> Vec<String> {
        match self {
            Self::SubmitDeck { lines } => lines
                .iter()
                .cloned()
                .chain(std::iter::once(DECK_TERMINATOR.to_string()))
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn bit(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> MessageId {
        MessageId(n)
    }

    #[test]
    fn test_encode_bare_command() {
        assert_eq!(Command::Ping.encode(id(1)), "1|ping");
        assert_eq!(Command::DumpAll.encode(id(42)), "42|dump_all");
        assert_eq!(Command::NextTurn.encode(id(3)), "3|next_turn");
    }

    #[test]
    fn test_encode_login() {
        let cmd = Command::Login {
            name: "alice".into(),
            password: "s3cret".into(),
        };
        assert_eq!(cmd.encode(id(1)), "1|login|alice|s3cret");
    }

    #[test]
    fn test_encode_create_game_booleans_are_bits() {
        let cmd = Command::CreateGame {
            description: "casual".into(),
            password: String::new(),
            max_players: 4,
            spectators_allowed: true,
        };
        assert_eq!(cmd.encode(id(5)), "5|create_game|casual||4|1");
    }

    #[test]
    fn test_encode_join_game() {
        let cmd = Command::JoinGame {
            game_id: 12,
            password: "pw".into(),
            spectator: false,
        };
        assert_eq!(cmd.encode(id(6)), "6|join_game|12|pw|0");
    }

    #[test]
    fn test_encode_move_card() {
        let cmd = Command::MoveCard {
            card_id: 17,
            start_zone: "hand".into(),
            target_zone: "table".into(),
            x: 3,
            y: -1,
            face_down: true,
        };
        assert_eq!(cmd.encode(id(9)), "9|move_card|17|hand|table|3|-1|1");
    }

    #[test]
    fn test_encode_add_counter_packs_color() {
        let cmd = Command::AddCounter {
            name: "poison".into(),
            color: CounterColor::new(0, 255, 0),
            radius: 10,
            value: 0,
        };
        assert_eq!(cmd.encode(id(2)), "2|add_counter|poison|65280|10|0");
    }

    #[test]
    fn test_encode_dump_zone_and_stop() {
        let dump = Command::DumpZone {
            player_id: 1,
            zone: "deck".into(),
            count: 5,
        };
        assert_eq!(dump.encode(id(4)), "4|dump_zone|1|deck|5");
        let stop = Command::StopDumpZone {
            player_id: 1,
            zone: "deck".into(),
        };
        assert_eq!(stop.encode(id(5)), "5|stop_dump_zone|1|deck");
    }

    #[test]
    fn test_encode_chat_commands() {
        assert_eq!(
            Command::ChatSay {
                channel: "lobby".into(),
                text: "gg".into()
            }
            .encode(id(8)),
            "8|chat_say|lobby|gg"
        );
        assert_eq!(
            Command::ChatJoinChannel {
                name: "lobby".into()
            }
            .encode(id(9)),
            "9|chat_join_channel|lobby"
        );
    }

    #[test]
    fn test_trailer_submit_deck_ends_with_dot() {
        let cmd = Command::SubmitDeck {
            lines: vec!["4 Forest".into(), "SB: 1 Naturalize".into()],
        };
        assert_eq!(cmd.encode(id(3)), "3|submit_deck");
        assert_eq!(
            cmd.trailer(),
            vec![
                "4 Forest".to_string(),
                "SB: 1 Naturalize".to_string(),
                ".".to_string()
            ]
        );
    }

    #[test]
    fn test_trailer_empty_deck_is_just_terminator() {
        let cmd = Command::SubmitDeck { lines: Vec::new() };
        assert_eq!(cmd.trailer(), vec![".".to_string()]);
    }

    #[test]
    fn test_trailer_other_commands_are_empty() {
        assert!(Command::Ping.trailer().is_empty());
        assert!(Command::ListPlayers.trailer().is_empty());
    }
}
