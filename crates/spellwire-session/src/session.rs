//! The session: correlator, event router, state machine and heartbeat in
//! one owned struct.
//!
//! `Session` does no I/O. The host feeds it stimuli and collects what it
//! produces:
//!
//! ```text
//!            on_connected / on_line / on_tick / on_transport_error
//!  host ────────────────────────────────────────────────────────► Session
//!   ▲                                                                │
//!   │  drain_outbox(): lines to write     drain_events(): notices    │
//!   └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each stimulus is handled to completion before the next one, so the
//! order of outgoing lines, events and command completions is exactly the
//! order in which lines and ticks arrived.

use std::collections::VecDeque;

use spellwire_protocol::{
    Command, GameEvent, GameEventKind, InboundLine, ListRecord, MessageId,
    PROTOCOL_VERSION, ProtocolError, ResponseOutcome, decode_line,
};

use crate::registry::StatusHook;
use crate::{
    CommandHandle, Completer, ConnectionStatus, PendingCommand,
    PendingRegistry, ResponseAggregator, SessionError, SessionEvent,
};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Tunables for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The protocol version the server must announce in `welcome`.
    ///
    /// Default: [`PROTOCOL_VERSION`].
    pub protocol_version: u32,

    /// How many heartbeat ticks a command may wait for its answer. The
    /// tick after that is a server timeout.
    ///
    /// Default: 5.
    pub max_missed_ticks: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            max_missed_ticks: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// LocalPlayer
// ---------------------------------------------------------------------------

/// Who we are in the current game, as told by the `player_id` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPlayer {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
struct Credentials {
    name: String,
    password: String,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One client session with a game server.
pub struct Session {
    config: SessionConfig,
    status: ConnectionStatus,
    registry: PendingRegistry,
    credentials: Credentials,
    local_player: Option<LocalPlayer>,
    /// Lines waiting to be written, in send order.
    outbox: VecDeque<String>,
    events: VecDeque<SessionEvent>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            status: ConnectionStatus::Disconnected,
            registry: PendingRegistry::new(),
            credentials: Credentials::default(),
            local_player: None,
            outbox: VecDeque::new(),
            events: VecDeque::new(),
        }
    }

    // -- Accessors --------------------------------------------------------

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Our player in the current game, once the server has told us.
    pub fn local_player(&self) -> Option<&LocalPlayer> {
        self.local_player.as_ref()
    }

    /// Number of commands waiting for an answer.
    pub fn pending_count(&self) -> usize {
        self.registry.len()
    }

    pub fn is_pending(&self, id: MessageId) -> bool {
        self.registry.contains(id)
    }

    /// Whether the host should be delivering heartbeat ticks right now.
    pub fn heartbeat_running(&self) -> bool {
        self.status.is_live()
    }

    /// Takes the lines produced so far, oldest first.
    pub fn drain_outbox(&mut self) -> impl Iterator<Item = String> + '_ {
        self.outbox.drain(..)
    }

    /// Takes the events produced so far, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = SessionEvent> + '_ {
        self.events.drain(..)
    }

    // -- Lifecycle stimuli ------------------------------------------------

    /// Starts a new session as `name`.
    ///
    /// A live session is torn down first. The host should open the stream
    /// and then call [`on_connected`](Self::on_connected).
    pub fn connect(&mut self, name: &str, password: &str) {
        if self.status != ConnectionStatus::Disconnected {
            self.disconnect();
        }
        self.credentials = Credentials {
            name: name.to_string(),
            password: password.to_string(),
        };
        tracing::info!(player = name, "connecting");
        self.set_status(ConnectionStatus::Connecting);
    }

    /// The stream is up. Heartbeat starts now.
    pub fn on_connected(&mut self) {
        if self.status != ConnectionStatus::Connecting {
            tracing::warn!(status = %self.status, "stream connected outside of connect, ignored");
            return;
        }
        self.set_status(ConnectionStatus::AwaitingWelcome);
    }

    /// The stream failed. Always fatal.
    pub fn on_transport_error(&mut self, message: &str) {
        if self.status == ConnectionStatus::Disconnected {
            return;
        }
        self.fail(SessionError::Transport(message.to_string()));
    }

    /// Tears the session down: every pending command is cancelled, unsent
    /// lines are dropped. Safe to call in any state.
    pub fn disconnect(&mut self) {
        if self.status == ConnectionStatus::Disconnected {
            return;
        }
        let cancelled = self.registry.remove_all();
        if !cancelled.is_empty() {
            tracing::debug!(count = cancelled.len(), "cancelling pending commands");
        }
        // Dropping the commands drops their completers unfired.
        drop(cancelled);
        self.outbox.clear();
        self.local_player = None;
        self.set_status(ConnectionStatus::Disconnected);
    }

    /// One heartbeat period elapsed.
    ///
    /// Every pending command ages by one tick. If any has waited longer
    /// than `max_missed_ticks` the session times out; otherwise a `ping`
    /// goes out.
    pub fn on_tick(&mut self) {
        if !self.heartbeat_running() {
            return;
        }
        if let Some(msg_id) = self.registry.tick_all(self.config.max_missed_ticks) {
            self.fail(SessionError::ServerTimeout { msg_id });
            return;
        }
        self.issue_with(Command::Ping, Completer::detached());
    }

    // -- Correlator -------------------------------------------------------

    /// Sends a command and returns a handle to its completion.
    pub fn issue(&mut self, command: Command) -> CommandHandle {
        let (completer, handle) = CommandHandle::channel();
        self.issue_with(command, completer);
        handle
    }

    /// Sends a command whose completion goes to `completer`.
    ///
    /// Returns the message id it went out with, or `None` if the session
    /// is disconnected, in which case the command is cancelled on the spot.
    pub fn issue_with(
        &mut self,
        command: Command,
        completer: Completer,
    ) -> Option<MessageId> {
        if self.status == ConnectionStatus::Disconnected {
            tracing::warn!(command = command.name(), "not connected, command cancelled");
            return None;
        }

        let id = self.registry.allocate_id();
        self.outbox.push_back(command.encode(id));
        self.outbox.extend(command.trailer());

        let hook = match command {
            Command::Login { .. } => StatusHook::Login,
            Command::CreateGame { .. } | Command::JoinGame { .. } => {
                StatusHook::EnterGame
            }
            Command::LeaveGame => StatusHook::LeaveGame,
            _ => StatusHook::None,
        };
        self.registry.register(PendingCommand::new(
            id,
            command.name(),
            ResponseAggregator::for_command(&command),
            hook,
            completer,
        ));
        tracing::debug!(msg_id = %id, command = command.name(), "command issued");
        Some(id)
    }

    // -- Inbound lines ----------------------------------------------------

    /// Handles one inbound line (terminator already stripped).
    pub fn on_line(&mut self, line: &str) {
        if self.status == ConnectionStatus::Disconnected {
            tracing::debug!(line, "line after disconnect, ignored");
            return;
        }
        tracing::trace!("<< {line}");

        let inbound = match decode_line(line) {
            Ok(inbound) => inbound,
            Err(err) => {
                self.protocol_error(err);
                return;
            }
        };

        match inbound {
            InboundLine::Welcome { version, message } => {
                self.on_welcome(version, message);
            }
            InboundLine::Response { id, outcome } => {
                self.on_response(id, outcome);
            }
            InboundLine::GameListing(game) => {
                self.emit(SessionEvent::GameListed(game));
            }
            InboundLine::Record { command, record } => {
                self.route_record(command, record);
            }
            InboundLine::Game(event) => self.on_game_event(event),
            InboundLine::Chat(event) => self.emit(SessionEvent::Chat(event)),
        }
    }

    fn on_welcome(&mut self, version: Option<u32>, message: String) {
        if self.status != ConnectionStatus::AwaitingWelcome {
            self.protocol_error(ProtocolError::InvalidMessage(format!(
                "welcome while {}",
                self.status
            )));
            return;
        }

        let expected = self.config.protocol_version;
        if version != Some(expected) {
            self.fail(SessionError::VersionMismatch {
                expected,
                got: version,
            });
            return;
        }

        tracing::info!(%message, "server welcomed us");
        self.emit(SessionEvent::Welcome { message });
        self.set_status(ConnectionStatus::LoggingIn);

        let login = Command::Login {
            name: self.credentials.name.clone(),
            password: self.credentials.password.clone(),
        };
        self.issue_with(login, Completer::detached());
    }

    /// Resolves the pending command `id`: the issuer hears about it first,
    /// then any status change the command implies is applied.
    fn on_response(&mut self, id: MessageId, outcome: ResponseOutcome) {
        let Some(command) = self.registry.resolve(id) else {
            tracing::debug!(msg_id = %id, %outcome, "response for unknown command, dropped");
            return;
        };
        tracing::debug!(msg_id = %id, command = command.name(), %outcome, "command resolved");

        let hook = command.hook;
        command.complete(outcome);

        match hook {
            StatusHook::None => {}
            StatusHook::Login if outcome.is_ok() => {
                self.set_status(ConnectionStatus::Idle);
            }
            StatusHook::Login => self.fail(SessionError::LoginRejected(outcome)),
            StatusHook::EnterGame if outcome.is_ok() => {
                self.set_status(ConnectionStatus::Playing);
            }
            StatusHook::LeaveGame if outcome.is_ok() => {
                self.set_status(ConnectionStatus::Idle);
            }
            StatusHook::EnterGame | StatusHook::LeaveGame => {}
        }
    }

    /// Appends a list record to the pending command it names.
    fn route_record(&mut self, command: MessageId, record: ListRecord) {
        let Some(pending) = self.registry.get_mut(command) else {
            self.protocol_error(ProtocolError::UnroutableRecord {
                prefix: record.prefix(),
                command,
            });
            return;
        };
        if let Err(record) = pending.aggregator_mut().deliver(record) {
            self.protocol_error(ProtocolError::UnroutableRecord {
                prefix: record.prefix(),
                command,
            });
        }
    }

    /// Forwards a game event, except `player_id`, which is ours: it
    /// becomes [`SessionEvent::PlayerIdAssigned`] and is not forwarded.
    fn on_game_event(&mut self, event: GameEvent) {
        if event.kind != GameEventKind::PlayerId {
            self.emit(SessionEvent::Game(event));
            return;
        }
        match parse_player_id(&event.data) {
            Some(player) => {
                tracing::info!(player_id = player.id, name = %player.name, "player id assigned");
                self.emit(SessionEvent::PlayerIdAssigned {
                    player_id: player.id,
                    name: player.name.clone(),
                });
                self.local_player = Some(player);
            }
            None => {
                self.protocol_error(ProtocolError::InvalidMessage(format!(
                    "player_id event needs an id and a name, got {:?}",
                    event.data
                )));
            }
        }
    }

    // -- Plumbing ---------------------------------------------------------

    fn set_status(&mut self, status: ConnectionStatus) {
        if self.status == status {
            return;
        }
        tracing::info!(from = %self.status, to = %status, "status changed");
        self.status = status;
        self.emit(SessionEvent::StatusChanged(status));
    }

    fn protocol_error(&mut self, err: ProtocolError) {
        tracing::warn!(error = %err, "inbound line dropped");
        self.emit(SessionEvent::ProtocolError(err));
    }

    /// Publishes a fatal error and tears the session down.
    fn fail(&mut self, err: SessionError) {
        tracing::warn!(error = %err, "session failed");
        self.emit(SessionEvent::Fatal(err));
        self.disconnect();
    }

    fn emit(&mut self, event: SessionEvent) {
        self.events.push_back(event);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

/// `player_id` carries exactly `<id>|<name>`.
fn parse_player_id(data: &[String]) -> Option<LocalPlayer> {
    match data {
        [id, name] => Some(LocalPlayer {
            id: id.parse().ok()?,
            name: name.clone(),
        }),
        _ => None,
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `Session`, driven entirely through its stimuli.
    //!
    //! Naming: `test_{function}_{scenario}_{expected}`.

    use super::*;
    use crate::{Completion, Records};

    // -- Helpers ----------------------------------------------------------

    /// A session that has connected and is waiting for `welcome`.
    fn awaiting_welcome() -> Session {
        let mut session = Session::default();
        session.connect("alice", "pw");
        session.on_connected();
        drain(&mut session);
        session
    }

    /// A logged-in session with empty queues. Login used message id 1.
    fn idle() -> Session {
        let mut session = awaiting_welcome();
        session.on_line("welcome|1|hello");
        session.on_line("resp|1|ok");
        drain(&mut session);
        assert_eq!(session.status(), ConnectionStatus::Idle);
        session
    }

    fn drain(session: &mut Session) -> (Vec<String>, Vec<SessionEvent>) {
        (
            session.drain_outbox().collect(),
            session.drain_events().collect(),
        )
    }

    fn completed(handle: &mut CommandHandle) -> Completion {
        handle
            .try_result()
            .expect("command should have resolved")
            .expect("command should not be cancelled")
    }

    // =====================================================================
    // connect() / on_connected()
    // =====================================================================

    #[test]
    fn test_connect_from_disconnected_moves_to_connecting() {
        let mut session = Session::default();
        session.connect("alice", "pw");

        assert_eq!(session.status(), ConnectionStatus::Connecting);
        let (_, events) = drain(&mut session);
        assert_eq!(
            events,
            vec![SessionEvent::StatusChanged(ConnectionStatus::Connecting)]
        );
        assert!(!session.heartbeat_running());
    }

    #[test]
    fn test_on_connected_starts_heartbeat() {
        let session = awaiting_welcome();
        assert_eq!(session.status(), ConnectionStatus::AwaitingWelcome);
        assert!(session.heartbeat_running());
    }

    #[test]
    fn test_on_connected_without_connect_is_ignored() {
        let mut session = Session::default();
        session.on_connected();
        assert_eq!(session.status(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn test_connect_on_live_session_disconnects_first() {
        let mut session = idle();
        let mut handle = session.issue(Command::ListGames);

        session.connect("bob", "");

        let (_, events) = drain(&mut session);
        assert_eq!(
            events,
            vec![
                SessionEvent::StatusChanged(ConnectionStatus::Disconnected),
                SessionEvent::StatusChanged(ConnectionStatus::Connecting),
            ]
        );
        assert_eq!(
            handle.try_result(),
            Some(Err(SessionError::CommandCancelled))
        );
    }

    // =====================================================================
    // welcome
    // =====================================================================

    #[test]
    fn test_welcome_matching_version_sends_login() {
        let mut session = awaiting_welcome();
        session.on_line("welcome|1|hello there");

        let (lines, events) = drain(&mut session);
        assert_eq!(lines, vec!["1|login|alice|pw".to_string()]);
        assert_eq!(
            events,
            vec![
                SessionEvent::Welcome {
                    message: "hello there".into()
                },
                SessionEvent::StatusChanged(ConnectionStatus::LoggingIn),
            ]
        );
    }

    #[test]
    fn test_welcome_wrong_version_is_fatal_without_login() {
        let mut session = Session::new(SessionConfig {
            protocol_version: 2,
            ..SessionConfig::default()
        });
        session.connect("alice", "pw");
        session.on_connected();
        drain(&mut session);

        session.on_line("welcome|1|hi");

        let (lines, events) = drain(&mut session);
        assert!(lines.is_empty(), "no login may be sent");
        assert_eq!(
            events,
            vec![
                SessionEvent::Fatal(SessionError::VersionMismatch {
                    expected: 2,
                    got: Some(1)
                }),
                SessionEvent::StatusChanged(ConnectionStatus::Disconnected),
            ]
        );
    }

    #[test]
    fn test_welcome_garbage_version_is_mismatch() {
        let mut session = awaiting_welcome();
        session.on_line("welcome|one|hi");

        let (_, events) = drain(&mut session);
        assert!(matches!(
            events[0],
            SessionEvent::Fatal(SessionError::VersionMismatch { got: None, .. })
        ));
        assert_eq!(session.status(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn test_welcome_when_idle_is_protocol_error() {
        let mut session = idle();
        session.on_line("welcome|1|again");

        let (lines, events) = drain(&mut session);
        assert!(lines.is_empty());
        assert!(matches!(
            events.as_slice(),
            [SessionEvent::ProtocolError(ProtocolError::InvalidMessage(_))]
        ));
        assert_eq!(session.status(), ConnectionStatus::Idle);
    }

    // =====================================================================
    // login
    // =====================================================================

    #[test]
    fn test_login_rejected_is_fatal() {
        let mut session = awaiting_welcome();
        session.on_line("welcome|1|hi");
        drain(&mut session);

        session.on_line("resp|1|password");

        let (_, events) = drain(&mut session);
        assert_eq!(
            events,
            vec![
                SessionEvent::Fatal(SessionError::LoginRejected(
                    ResponseOutcome::PasswordRequired
                )),
                SessionEvent::StatusChanged(ConnectionStatus::Disconnected),
            ]
        );
    }

    // =====================================================================
    // issue() / responses
    // =====================================================================

    #[test]
    fn test_issue_ids_increase_by_one() {
        let mut session = idle();
        session.issue(Command::ListGames);
        session.issue(Command::Shuffle);

        let (lines, _) = drain(&mut session);
        assert_eq!(lines, vec!["2|list_games", "3|shuffle"]);
    }

    #[test]
    fn test_issue_submit_deck_sends_trailer_after_command() {
        let mut session = idle();
        session.issue(Command::SubmitDeck {
            lines: vec!["4 Island".into()],
        });

        let (lines, _) = drain(&mut session);
        assert_eq!(lines, vec!["2|submit_deck", "4 Island", "."]);
    }

    #[test]
    fn test_issue_while_disconnected_is_cancelled() {
        let mut session = Session::default();
        let mut handle = session.issue(Command::Ping);

        assert_eq!(
            handle.try_result(),
            Some(Err(SessionError::CommandCancelled))
        );
        assert_eq!(session.pending_count(), 0);
        assert_eq!(session.drain_outbox().count(), 0);
    }

    #[test]
    fn test_response_unknown_id_is_dropped_quietly() {
        let mut session = idle();
        session.on_line("resp|99|ok");

        let (_, events) = drain(&mut session);
        assert!(events.is_empty());
        assert_eq!(session.status(), ConnectionStatus::Idle);
    }

    #[test]
    fn test_response_fires_once() {
        let mut session = idle();
        let mut handle = session.issue(Command::Shuffle);

        session.on_line("resp|2|ok");
        session.on_line("resp|2|error");

        let done = completed(&mut handle);
        assert_eq!(done.outcome, ResponseOutcome::Ok);
        assert!(!session.is_pending(MessageId(2)));
    }

    #[test]
    fn test_join_game_ok_enters_playing_then_leave_returns_idle() {
        let mut session = idle();
        session.issue(Command::JoinGame {
            game_id: 3,
            password: String::new(),
            spectator: false,
        });
        session.on_line("resp|2|ok");
        assert_eq!(session.status(), ConnectionStatus::Playing);

        session.issue(Command::LeaveGame);
        session.on_line("resp|3|ok");
        assert_eq!(session.status(), ConnectionStatus::Idle);
    }

    #[test]
    fn test_join_game_rejected_stays_idle() {
        let mut session = idle();
        let mut handle = session.issue(Command::JoinGame {
            game_id: 3,
            password: "wrong".into(),
            spectator: false,
        });
        session.on_line("resp|2|password");

        assert_eq!(session.status(), ConnectionStatus::Idle);
        assert_eq!(
            completed(&mut handle).outcome,
            ResponseOutcome::PasswordRequired
        );
    }

    // =====================================================================
    // records
    // =====================================================================

    #[test]
    fn test_record_for_unknown_command_is_protocol_error() {
        let mut session = idle();
        session.on_line("list_players|42|3|Alice|20");

        let (_, events) = drain(&mut session);
        assert_eq!(
            events,
            vec![SessionEvent::ProtocolError(ProtocolError::UnroutableRecord {
                prefix: "list_players",
                command: MessageId(42),
            })]
        );
    }

    #[test]
    fn test_record_for_wrong_kind_command_is_protocol_error() {
        let mut session = idle();
        let mut handle = session.issue(Command::ListZones { player_id: 1 });

        session.on_line("list_players|2|3|Alice|20");
        session.on_line("resp|2|ok");

        let (_, events) = drain(&mut session);
        assert!(matches!(
            events.as_slice(),
            [SessionEvent::ProtocolError(ProtocolError::UnroutableRecord { .. })]
        ));
        assert_eq!(completed(&mut handle).records, Records::Zones(Vec::new()));
    }

    // =====================================================================
    // events
    // =====================================================================

    #[test]
    fn test_player_id_event_sets_local_player() {
        let mut session = idle();
        session.on_line("private|-1||player_id|4|alice");

        assert_eq!(
            session.local_player(),
            Some(&LocalPlayer {
                id: 4,
                name: "alice".into()
            })
        );
        let (_, events) = drain(&mut session);
        assert_eq!(
            events,
            vec![SessionEvent::PlayerIdAssigned {
                player_id: 4,
                name: "alice".into()
            }],
            "player_id is consumed, not forwarded as a game event"
        );
    }

    #[test]
    fn test_player_id_event_wrong_field_count_is_protocol_error() {
        let mut session = idle();
        session.on_line("private|-1||player_id|4");

        assert!(session.local_player().is_none());
        let (_, events) = drain(&mut session);
        assert!(matches!(
            events.as_slice(),
            [SessionEvent::ProtocolError(ProtocolError::InvalidMessage(_))]
        ));
    }

    #[test]
    fn test_chat_and_lobby_lines_become_events() {
        let mut session = idle();
        session.on_line("chat|say|lobby|bob|hi");
        session.on_line("list_games|1|casual|0|1|4|bob|1|0");

        let (_, events) = drain(&mut session);
        assert!(matches!(events[0], SessionEvent::Chat(_)));
        assert!(matches!(events[1], SessionEvent::GameListed(_)));
    }

    // =====================================================================
    // on_tick()
    // =====================================================================

    #[test]
    fn test_on_tick_sends_ping() {
        let mut session = idle();
        session.on_tick();

        let (lines, _) = drain(&mut session);
        assert_eq!(lines, vec!["2|ping"]);
    }

    #[test]
    fn test_on_tick_while_connecting_does_nothing() {
        let mut session = Session::default();
        session.connect("alice", "pw");
        drain(&mut session);

        session.on_tick();

        let (lines, events) = drain(&mut session);
        assert!(lines.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn test_on_tick_answered_pings_never_time_out() {
        let mut session = idle();
        for _ in 0..20 {
            session.on_tick();
            let (lines, _) = drain(&mut session);
            let id = lines[0].split('|').next().unwrap().to_string();
            session.on_line(&format!("resp|{id}|ok"));
        }
        assert_eq!(session.status(), ConnectionStatus::Idle);
    }

    // =====================================================================
    // on_transport_error() / disconnect()
    // =====================================================================

    #[test]
    fn test_on_transport_error_is_fatal_with_message() {
        let mut session = idle();
        session.on_transport_error("connection reset");

        let (_, events) = drain(&mut session);
        assert_eq!(
            events,
            vec![
                SessionEvent::Fatal(SessionError::Transport(
                    "connection reset".into()
                )),
                SessionEvent::StatusChanged(ConnectionStatus::Disconnected),
            ]
        );
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let mut session = idle();
        session.disconnect();
        session.disconnect();

        let (_, events) = drain(&mut session);
        assert_eq!(
            events,
            vec![SessionEvent::StatusChanged(ConnectionStatus::Disconnected)]
        );
    }

    #[test]
    fn test_disconnect_drops_unsent_lines() {
        let mut session = idle();
        session.issue(Command::Shuffle);
        session.disconnect();
        assert_eq!(session.drain_outbox().count(), 0);
    }

    #[test]
    fn test_on_line_after_disconnect_is_ignored() {
        let mut session = idle();
        session.disconnect();
        drain(&mut session);

        session.on_line("garbage");
        assert_eq!(session.drain_events().count(), 0);
    }
}
