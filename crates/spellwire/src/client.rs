//! `Client` builder, handle and event channels.
//!
//! This is the entry point for talking to a game server. It ties together
//! all the layers: transport → protocol → session, with the heartbeat
//! ticker driving timeouts.

use std::time::Duration;

use spellwire_protocol::{ChatEvent, Command, CounterColor, GameEvent};
use spellwire_session::{CommandHandle, ConnectionStatus, Session, SessionEvent};
use spellwire_tick::HeartbeatTicker;
#[cfg(feature = "websocket")]
use spellwire_transport::WebSocketLineStream;
use spellwire_transport::{LineStream, TcpLineStream};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::driver::{ClientDriver, DriverCommand, EventSinks};
use crate::{ClientConfig, ClientError};

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for configuring and connecting a client.
///
/// # Example
///
/// ```rust,ignore
/// use spellwire::prelude::*;
///
/// let mut client = Client::builder()
///     .player("alice", "secret")
///     .connect_tcp("127.0.0.1:4747")
///     .await?;
/// client.handle.wait_for_status(ConnectionStatus::Idle).await?;
/// let games = client.handle.list_games();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the credentials sent with the automatic login.
    pub fn player(mut self, name: &str, password: &str) -> Self {
        self.config.player_name = name.to_string();
        self.config.password = password.to_string();
        self
    }

    /// Sets the protocol version the server must announce.
    pub fn protocol_version(mut self, version: u32) -> Self {
        self.config.protocol_version = version;
        self
    }

    /// Sets the time between heartbeat pings.
    pub fn heartbeat_interval(mut self, interval: Duration) -> Self {
        self.config.heartbeat_interval_ms = saturating_millis(interval);
        self
    }

    /// Delays the first ping by a random amount up to `max`.
    pub fn heartbeat_jitter(mut self, max: Duration) -> Self {
        self.config.heartbeat_jitter_ms = saturating_millis(max);
        self
    }

    /// Sets how many ticks a command may go unanswered.
    pub fn max_missed_ticks(mut self, ticks: u32) -> Self {
        self.config.max_missed_ticks = ticks;
        self
    }

    /// Connects over TCP and starts the driver task.
    pub async fn connect_tcp(self, addr: &str) -> Result<Client, ClientError> {
        let stream = TcpLineStream::connect(addr).await?;
        let (handle, events, driver) = self.attach(stream);
        let task = tokio::spawn(driver.run());
        Ok(Client {
            handle,
            events,
            task,
        })
    }

    /// Connects over WebSocket and starts the driver task.
    #[cfg(feature = "websocket")]
    pub async fn connect_websocket(
        self,
        url: &str,
    ) -> Result<Client, ClientError> {
        let stream = WebSocketLineStream::connect(url).await?;
        let (handle, events, driver) = self.attach(stream);
        let task = tokio::spawn(driver.run());
        Ok(Client {
            handle,
            events,
            task,
        })
    }

    /// Wraps an already-connected stream without spawning anything.
    ///
    /// The session starts out waiting for the server's `welcome`. Run the
    /// returned driver to get things moving.
    pub fn attach<S: LineStream>(
        self,
        stream: S,
    ) -> (ClientHandle, ClientEvents, ClientDriver<S>) {
        let mut session = Session::new(self.config.session_config());
        session.connect(&self.config.player_name, &self.config.password);
        session.on_connected();

        // Paused until the session goes live; the first resume spends the jitter.
        let ticker = HeartbeatTicker::paused(self.config.tick_config());

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (game_tx, game_rx) = mpsc::unbounded_channel();
        let (chat_tx, chat_rx) = mpsc::unbounded_channel();
        let (session_tx, session_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Disconnected);

        let sinks = EventSinks {
            game: game_tx,
            chat: chat_tx,
            session: session_tx,
            status: status_tx,
        };
        let driver =
            ClientDriver::new(stream, session, ticker, command_rx, sinks);
        let handle = ClientHandle {
            commands: command_tx,
            status: status_rx,
        };
        let events = ClientEvents {
            game: game_rx,
            chat: chat_rx,
            session: session_rx,
        };
        (handle, events, driver)
    }
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// A connected client: its handle, its event streams and its driver task.
pub struct Client {
    pub handle: ClientHandle,
    pub events: ClientEvents,
    /// Resolves when the session ends; carries the fatal error, if any.
    pub task: JoinHandle<Result<(), ClientError>>,
}

impl Client {
    /// Creates a new builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

// ---------------------------------------------------------------------------
// ClientEvents
// ---------------------------------------------------------------------------

/// Everything the server pushes, split by audience.
///
/// Each channel preserves arrival order. The game board only needs `game`,
/// a chat window only `chat`; `session` carries the rest (status changes,
/// welcome, lobby listings, protocol errors, the fatal error).
pub struct ClientEvents {
    pub game: mpsc::UnboundedReceiver<GameEvent>,
    pub chat: mpsc::UnboundedReceiver<ChatEvent>,
    pub session: mpsc::UnboundedReceiver<SessionEvent>,
}

// ---------------------------------------------------------------------------
// ClientHandle
// ---------------------------------------------------------------------------

/// Cheap, cloneable handle for issuing commands.
///
/// Every command method returns a [`CommandHandle`] right away. If the
/// driver has already stopped, that handle resolves to
/// [`SessionError::CommandCancelled`](spellwire_session::SessionError).
#[derive(Clone)]
pub struct ClientHandle {
    commands: mpsc::UnboundedSender<DriverCommand>,
    status: watch::Receiver<ConnectionStatus>,
}

impl ClientHandle {
    /// The last status the driver published.
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// Waits until the status becomes `target`.
    ///
    /// # Errors
    /// [`ClientError::DriverGone`] if the driver stops first.
    pub async fn wait_for_status(
        &self,
        target: ConnectionStatus,
    ) -> Result<(), ClientError> {
        let mut status = self.status.clone();
        status
            .wait_for(|s| *s == target)
            .await
            .map(|_| ())
            .map_err(|_| ClientError::DriverGone)
    }

    /// Asks the driver to tear the session down.
    pub fn disconnect(&self) {
        let _ = self.commands.send(DriverCommand::Disconnect);
    }

    /// Sends any command.
    pub fn issue(&self, command: Command) -> CommandHandle {
        let (completer, handle) = CommandHandle::channel();
        if self
            .commands
            .send(DriverCommand::Issue { command, completer })
            .is_err()
        {
            // The completer went down with the failed send.
            tracing::debug!("driver gone, command cancelled");
        }
        handle
    }

    // -- Session --

    pub fn ping(&self) -> CommandHandle {
        self.issue(Command::Ping)
    }

    /// Logs in again. The session does this by itself after `welcome`.
    pub fn login(&self, name: &str, password: &str) -> CommandHandle {
        self.issue(Command::Login {
            name: name.to_string(),
            password: password.to_string(),
        })
    }

    // -- Chat --

    pub fn chat_list_channels(&self) -> CommandHandle {
        self.issue(Command::ChatListChannels)
    }

    pub fn chat_join_channel(&self, name: &str) -> CommandHandle {
        self.issue(Command::ChatJoinChannel {
            name: name.to_string(),
        })
    }

    pub fn chat_leave_channel(&self, name: &str) -> CommandHandle {
        self.issue(Command::ChatLeaveChannel {
            name: name.to_string(),
        })
    }

    pub fn chat_say(&self, channel: &str, text: &str) -> CommandHandle {
        self.issue(Command::ChatSay {
            channel: channel.to_string(),
            text: text.to_string(),
        })
    }

    // -- Lobby --

    /// Asks for the lobby. Games arrive as
    /// [`SessionEvent::GameListed`] events.
    pub fn list_games(&self) -> CommandHandle {
        self.issue(Command::ListGames)
    }

    pub fn create_game(
        &self,
        description: &str,
        password: &str,
        max_players: u32,
        spectators_allowed: bool,
    ) -> CommandHandle {
        self.issue(Command::CreateGame {
            description: description.to_string(),
            password: password.to_string(),
            max_players,
            spectators_allowed,
        })
    }

    pub fn join_game(
        &self,
        game_id: i32,
        password: &str,
        spectator: bool,
    ) -> CommandHandle {
        self.issue(Command::JoinGame {
            game_id,
            password: password.to_string(),
            spectator,
        })
    }

    pub fn leave_game(&self) -> CommandHandle {
        self.issue(Command::LeaveGame)
    }

    // -- Game --

    /// Resolves with [`Records::Players`](spellwire_session::Records).
    pub fn list_players(&self) -> CommandHandle {
        self.issue(Command::ListPlayers)
    }

    pub fn say(&self, text: &str) -> CommandHandle {
        self.issue(Command::Say {
            text: text.to_string(),
        })
    }

    pub fn shuffle(&self) -> CommandHandle {
        self.issue(Command::Shuffle)
    }

    pub fn roll_die(&self, sides: u32) -> CommandHandle {
        self.issue(Command::RollDie { sides })
    }

    pub fn draw_cards(&self, count: u32) -> CommandHandle {
        self.issue(Command::DrawCards { count })
    }

    pub fn move_card(
        &self,
        card_id: i32,
        start_zone: &str,
        target_zone: &str,
        x: i32,
        y: i32,
        face_down: bool,
    ) -> CommandHandle {
        self.issue(Command::MoveCard {
            card_id,
            start_zone: start_zone.to_string(),
            target_zone: target_zone.to_string(),
            x,
            y,
            face_down,
        })
    }

    pub fn create_token(
        &self,
        zone: &str,
        name: &str,
        power_toughness: &str,
        x: i32,
        y: i32,
    ) -> CommandHandle {
        self.issue(Command::CreateToken {
            zone: zone.to_string(),
            name: name.to_string(),
            power_toughness: power_toughness.to_string(),
            x,
            y,
        })
    }

    pub fn set_card_attr(
        &self,
        zone: &str,
        card_id: i32,
        name: &str,
        value: &str,
    ) -> CommandHandle {
        self.issue(Command::SetCardAttr {
            zone: zone.to_string(),
            card_id,
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    /// Sends a deck list, one entry per line, passed through verbatim.
    pub fn submit_deck<I, L>(&self, lines: I) -> CommandHandle
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        self.issue(Command::SubmitDeck {
            lines: lines.into_iter().map(Into::into).collect(),
        })
    }

    pub fn ready_start(&self) -> CommandHandle {
        self.issue(Command::ReadyStart)
    }

    pub fn inc_counter(&self, counter_id: i32, delta: i32) -> CommandHandle {
        self.issue(Command::IncCounter { counter_id, delta })
    }

    pub fn add_counter(
        &self,
        name: &str,
        color: CounterColor,
        radius: i32,
        value: i32,
    ) -> CommandHandle {
        self.issue(Command::AddCounter {
            name: name.to_string(),
            color,
            radius,
            value,
        })
    }

    pub fn set_counter(&self, counter_id: i32, value: i32) -> CommandHandle {
        self.issue(Command::SetCounter { counter_id, value })
    }

    pub fn del_counter(&self, counter_id: i32) -> CommandHandle {
        self.issue(Command::DelCounter { counter_id })
    }

    /// Resolves with [`Records::Counters`](spellwire_session::Records).
    pub fn list_counters(&self, player_id: i32) -> CommandHandle {
        self.issue(Command::ListCounters { player_id })
    }

    pub fn next_turn(&self) -> CommandHandle {
        self.issue(Command::NextTurn)
    }

    pub fn set_active_phase(&self, phase: i32) -> CommandHandle {
        self.issue(Command::SetActivePhase { phase })
    }

    /// Resolves with [`Records::Zones`](spellwire_session::Records).
    pub fn list_zones(&self, player_id: i32) -> CommandHandle {
        self.issue(Command::ListZones { player_id })
    }

    /// Resolves with [`Records::Cards`](spellwire_session::Records).
    pub fn dump_zone(
        &self,
        player_id: i32,
        zone: &str,
        count: i32,
    ) -> CommandHandle {
        self.issue(Command::DumpZone {
            player_id,
            zone: zone.to_string(),
            count,
        })
    }

    pub fn stop_dump_zone(&self, player_id: i32, zone: &str) -> CommandHandle {
        self.issue(Command::StopDumpZone {
            player_id,
            zone: zone.to_string(),
        })
    }

    /// Resolves with [`Records::All`](spellwire_session::Records).
    pub fn dump_all(&self) -> CommandHandle {
        self.issue(Command::DumpAll)
    }
}
