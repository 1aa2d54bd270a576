//! Integration tests for the client: builder, driver loop, handle and
//! event channels, against a scripted server on an in-memory pipe.

use std::time::Duration;

use spellwire::prelude::*;
use tokio::io::{AsyncWriteExt, DuplexStream, ReadHalf, WriteHalf};
use tokio::task::JoinHandle;

// =========================================================================
// Scripted server
// =========================================================================

type PeerStream = TextLineStream<ReadHalf<DuplexStream>, WriteHalf<DuplexStream>>;

/// The server end of the pipe. Tests drive it line by line.
struct FakeServer {
    stream: PeerStream,
}

impl FakeServer {
    async fn send(&self, line: &str) {
        self.stream.send_line(line).await.expect("client end is open");
    }

    async fn expect(&self, line: &str) {
        let got = self.stream.recv_line().await.expect("read failed");
        assert_eq!(got.as_deref(), Some(line));
    }

    /// Reads the next line or `None` at EOF.
    async fn next(&self) -> Option<String> {
        self.stream.recv_line().await.expect("read failed")
    }
}

struct Harness {
    handle: ClientHandle,
    events: ClientEvents,
    task: JoinHandle<Result<(), ClientError>>,
    server: FakeServer,
}

fn start(builder: ClientBuilder) -> Harness {
    let (stream, peer) = TextLineStream::duplex(64 * 1024);
    let (read, write) = tokio::io::split(peer);
    let (handle, events, driver) = builder.attach(stream);
    Harness {
        handle,
        events,
        task: tokio::spawn(driver.run()),
        server: FakeServer {
            stream: TextLineStream::new(read, write),
        },
    }
}

fn alice() -> ClientBuilder {
    Client::builder().player("alice", "pw")
}

/// Plays welcome + login; the client ends up `Idle` having used id 1.
async fn logged_in() -> Harness {
    let h = start(alice());
    h.server.send("welcome|1|hello").await;
    h.server.expect("1|login|alice|pw").await;
    h.server.send("resp|1|ok").await;
    h.handle
        .wait_for_status(ConnectionStatus::Idle)
        .await
        .expect("driver alive");
    h
}

// =========================================================================
// Connect and login
// =========================================================================

#[tokio::test]
async fn test_login_flow_reaches_idle_and_reports_each_step() {
    let mut h = logged_in().await;

    let mut seen = Vec::new();
    while let Ok(event) = h.events.session.try_recv() {
        seen.push(event);
    }
    assert_eq!(
        seen,
        vec![
            SessionEvent::StatusChanged(ConnectionStatus::Connecting),
            SessionEvent::StatusChanged(ConnectionStatus::AwaitingWelcome),
            SessionEvent::Welcome {
                message: "hello".into()
            },
            SessionEvent::StatusChanged(ConnectionStatus::LoggingIn),
            SessionEvent::StatusChanged(ConnectionStatus::Idle),
        ]
    );
    assert_eq!(h.handle.status(), ConnectionStatus::Idle);
}

#[tokio::test]
async fn test_login_rejected_ends_driver_with_error() {
    let h = start(alice());
    h.server.send("welcome|1|hello").await;
    h.server.expect("1|login|alice|pw").await;
    h.server.send("resp|1|error").await;

    let result = h.task.await.unwrap();
    assert!(matches!(
        result,
        Err(ClientError::Session(SessionError::LoginRejected(
            ResponseOutcome::Err
        )))
    ));
    assert_eq!(h.server.next().await, None, "stream closed");
}

#[tokio::test]
async fn test_version_mismatch_never_sends_login() {
    let h = start(alice().protocol_version(2));
    h.server.send("welcome|1|hi").await;

    let result = h.task.await.unwrap();
    assert!(matches!(
        result,
        Err(ClientError::Session(SessionError::VersionMismatch {
            expected: 2,
            got: Some(1)
        }))
    ));
    // The only thing on the wire is EOF.
    assert_eq!(h.server.next().await, None);
}

#[tokio::test]
async fn test_non_utf8_line_does_not_end_the_session() {
    let (stream, mut peer) = TextLineStream::duplex(64 * 1024);
    let (handle, mut events, driver) = alice().attach(stream);
    let task = tokio::spawn(driver.run());

    peer.write_all(b"chat|say|lobby|bob|caf\xe9\nwelcome|1|hello\n")
        .await
        .unwrap();

    handle
        .wait_for_status(ConnectionStatus::LoggingIn)
        .await
        .expect("session survives the bad line");
    let chat = events.chat.recv().await.unwrap();
    assert_eq!(chat.kind, ChatEventKind::Say);
    assert_eq!(chat.data.last().map(String::as_str), Some("caf\u{FFFD}"));
    assert!(!task.is_finished());
}

// =========================================================================
// Commands
// =========================================================================

#[tokio::test]
async fn test_list_players_resolves_with_records() {
    let h = logged_in().await;

    let pending = h.handle.list_players();
    h.server.expect("2|list_players").await;
    h.server.send("list_players|2|3|Alice|20").await;
    h.server.send("list_players|2|4|Bob|18").await;
    h.server.send("resp|2|ok").await;

    let done = pending.wait().await.unwrap();
    assert_eq!(done.outcome, ResponseOutcome::Ok);
    let Records::Players(players) = done.records else {
        panic!("expected players");
    };
    let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
}

#[tokio::test]
async fn test_join_game_moves_status_to_playing() {
    let h = logged_in().await;

    let pending = h.handle.join_game(12, "", false);
    h.server.expect("2|join_game|12||0").await;
    h.server.send("resp|2|ok").await;

    assert_eq!(pending.wait().await.unwrap().outcome, ResponseOutcome::Ok);
    h.handle
        .wait_for_status(ConnectionStatus::Playing)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_submit_deck_sends_lines_and_terminator() {
    let h = logged_in().await;

    let _pending = h.handle.submit_deck(["4 Forest", "20 Island"]);
    h.server.expect("2|submit_deck").await;
    h.server.expect("4 Forest").await;
    h.server.expect("20 Island").await;
    h.server.expect(".").await;
}

#[tokio::test]
async fn test_add_counter_sends_packed_color() {
    let h = logged_in().await;

    let _pending =
        h.handle
            .add_counter("poison", CounterColor::new(0, 0, 255), 10, 0);
    h.server.expect("2|add_counter|poison|255|10|0").await;
}

// =========================================================================
// Events
// =========================================================================

#[tokio::test]
async fn test_game_and_chat_events_go_to_their_own_channels() {
    let mut h = logged_in().await;

    h.server.send("public|2|bob|roll_die|20|17").await;
    h.server.send("chat|say|lobby|bob|hi").await;
    h.server.send("public|2|bob|shuffle").await;

    let first = h.events.game.recv().await.unwrap();
    assert_eq!(first.kind, GameEventKind::RollDie);
    assert_eq!(first.data, vec!["20".to_string(), "17".to_string()]);
    let second = h.events.game.recv().await.unwrap();
    assert_eq!(second.kind, GameEventKind::Shuffle);

    let chat = h.events.chat.recv().await.unwrap();
    assert_eq!(chat.kind, ChatEventKind::Say);
}

#[tokio::test]
async fn test_malformed_line_is_reported_and_session_continues() {
    let mut h = logged_in().await;
    while h.events.session.try_recv().is_ok() {}

    h.server.send("list_games|1|2|3").await;
    h.server.send("list_games|7|casual|0|1|4|bob|1|0").await;

    let error = h.events.session.recv().await.unwrap();
    assert!(matches!(
        error,
        SessionEvent::ProtocolError(ProtocolError::FieldCount { .. })
    ));
    let SessionEvent::GameListed(game) = h.events.session.recv().await.unwrap()
    else {
        panic!("expected a lobby entry");
    };
    assert_eq!(game.game_id, 7);
    assert_eq!(h.handle.status(), ConnectionStatus::Idle);
}

// =========================================================================
// Teardown
// =========================================================================

#[tokio::test]
async fn test_disconnect_cancels_pending_and_stops_cleanly() {
    let h = logged_in().await;

    let pending = h.handle.dump_all();
    h.server.expect("2|dump_all").await;
    h.handle.disconnect();

    assert_eq!(pending.wait().await, Err(SessionError::CommandCancelled));
    assert!(h.task.await.unwrap().is_ok());
    assert_eq!(h.handle.status(), ConnectionStatus::Disconnected);
}

#[tokio::test]
async fn test_server_hangup_is_transport_error() {
    let h = logged_in().await;
    drop(h.server);

    let result = h.task.await.unwrap();
    assert!(matches!(
        result,
        Err(ClientError::Session(SessionError::Transport(_)))
    ));
}

#[tokio::test]
async fn test_commands_after_driver_stopped_are_cancelled() {
    let h = logged_in().await;
    h.handle.disconnect();
    h.task.await.unwrap().unwrap();

    let pending = h.handle.ping();
    assert_eq!(pending.wait().await, Err(SessionError::CommandCancelled));
    assert!(matches!(
        h.handle.wait_for_status(ConnectionStatus::Idle).await,
        Err(ClientError::DriverGone)
    ));
}

// =========================================================================
// Heartbeat
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_heartbeat_pings_every_interval() {
    let h = start(alice().heartbeat_interval(Duration::from_millis(500)));
    h.server.send("welcome|1|hello").await;
    h.server.expect("1|login|alice|pw").await;
    h.server.send("resp|1|ok").await;

    let started = tokio::time::Instant::now();
    h.server.expect("2|ping").await;
    h.server.send("resp|2|ok").await;
    h.server.expect("3|ping").await;

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(500));
    assert!(elapsed <= Duration::from_millis(1100));
}

#[tokio::test(start_paused = true)]
async fn test_heartbeat_jitter_delays_first_ping() {
    let mut firsts = Vec::new();
    for _ in 0..10 {
        let h = start(
            alice()
                .heartbeat_interval(Duration::from_millis(100))
                .heartbeat_jitter(Duration::from_secs(1)),
        );
        let started = tokio::time::Instant::now();
        // Pings go out while the client still waits for `welcome`.
        h.server.expect("1|ping").await;
        firsts.push(started.elapsed());
        h.handle.disconnect();
        h.task.await.unwrap().unwrap();
    }

    assert!(firsts.iter().all(|d| *d >= Duration::from_millis(100)));
    assert!(firsts.iter().all(|d| *d <= Duration::from_millis(1_101)));
    assert!(
        firsts.iter().any(|d| *d > Duration::from_millis(110)),
        "first ping never jittered: {firsts:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn test_unanswered_command_times_out_the_session() {
    let h = logged_in().await;

    let stalled = h.handle.list_zones(1);
    h.server.expect("2|list_zones|1").await;

    // The server never answers anything again.
    let result = h.task.await.unwrap();
    assert!(matches!(
        result,
        Err(ClientError::Session(SessionError::ServerTimeout {
            msg_id: MessageId(2)
        }))
    ));
    assert_eq!(stalled.wait().await, Err(SessionError::CommandCancelled));
    assert_eq!(h.handle.status(), ConnectionStatus::Disconnected);
}
