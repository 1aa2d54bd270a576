//! The client driver: one Tokio task that owns the session.
//!
//! All session work happens here, one stimulus at a time, so the session
//! itself needs no locks. Everything else talks to the driver through
//! channels.
//!
//! ```text
//!   ClientHandle ──DriverCommand──►┐
//!   LineStream ────── line ───────►├─► Session ──► lines ──► LineStream
//!   HeartbeatTicker ── tick ──────►┘      │
//!                                         └──► events ──► ClientEvents
//! ```

use spellwire_protocol::{ChatEvent, Command, GameEvent};
use spellwire_session::{
    Completer, ConnectionStatus, Session, SessionError, SessionEvent,
};
use spellwire_tick::HeartbeatTicker;
use spellwire_transport::LineStream;
use tokio::sync::{mpsc, watch};

use crate::ClientError;

/// A request from a [`ClientHandle`](crate::ClientHandle) to the driver.
#[derive(Debug)]
pub(crate) enum DriverCommand {
    /// Send a command; its completion goes to `completer`.
    Issue {
        command: Command,
        completer: Completer,
    },
    /// Tear the session down and stop.
    Disconnect,
}

/// Sending sides of the event channels.
pub(crate) struct EventSinks {
    pub(crate) game: mpsc::UnboundedSender<GameEvent>,
    pub(crate) chat: mpsc::UnboundedSender<ChatEvent>,
    pub(crate) session: mpsc::UnboundedSender<SessionEvent>,
    pub(crate) status: watch::Sender<ConnectionStatus>,
}

/// Runs one session over one line stream.
///
/// Created by [`ClientBuilder::attach`](crate::ClientBuilder::attach);
/// call [`run`](Self::run), usually inside `tokio::spawn`.
pub struct ClientDriver<S: LineStream> {
    stream: S,
    session: Session,
    ticker: HeartbeatTicker,
    commands: mpsc::UnboundedReceiver<DriverCommand>,
    sinks: EventSinks,
    /// The fatal error that ended the session, if any.
    fatal: Option<SessionError>,
}

impl<S: LineStream> ClientDriver<S> {
    pub(crate) fn new(
        stream: S,
        session: Session,
        ticker: HeartbeatTicker,
        commands: mpsc::UnboundedReceiver<DriverCommand>,
        sinks: EventSinks,
    ) -> Self {
        Self {
            stream,
            session,
            ticker,
            commands,
            sinks,
            fatal: None,
        }
    }

    /// Drives the session until it disconnects, then closes the stream.
    ///
    /// # Errors
    /// Returns the fatal [`SessionError`] that ended the session. A
    /// disconnect asked for by the caller, or every handle being dropped,
    /// ends with `Ok(())`.
    pub async fn run(mut self) -> Result<(), ClientError> {
        let conn_id = self.stream.id();
        tracing::info!(%conn_id, "client driver started");

        loop {
            self.flush().await;
            if self.session.status() == ConnectionStatus::Disconnected {
                break;
            }
            self.ticker.set_running(self.session.heartbeat_running());

            // Buffered lines win over a due tick, so a late `resp` still
            // lands before the tick that would have timed it out.
            tokio::select! {
                biased;

                line = self.stream.recv_line() => match line {
                    Ok(Some(line)) => self.session.on_line(&line),
                    Ok(None) => {
                        self.session.on_transport_error("connection closed by server");
                    }
                    Err(e) => self.session.on_transport_error(&e.to_string()),
                },
                info = self.ticker.wait_for_tick() => {
                    tracing::trace!(%conn_id, tick = info.tick, "heartbeat");
                    self.session.on_tick();
                }
                command = self.commands.recv() => match command {
                    Some(DriverCommand::Issue { command, completer }) => {
                        self.session.issue_with(command, completer);
                    }
                    Some(DriverCommand::Disconnect) => {
                        tracing::info!(%conn_id, "disconnect requested");
                        self.session.disconnect();
                    }
                    None => {
                        tracing::info!(%conn_id, "all client handles dropped");
                        self.session.disconnect();
                    }
                },
            }
        }

        if let Err(e) = self.stream.close().await {
            tracing::debug!(%conn_id, error = %e, "close failed");
        }
        tracing::info!(%conn_id, "client driver stopped");

        match self.fatal {
            Some(err) => Err(ClientError::Session(err)),
            None => Ok(()),
        }
    }

    /// Writes every queued line, then publishes every queued event.
    ///
    /// A failed write is itself a stimulus: the session goes down and the
    /// remaining lines are dropped with it.
    async fn flush(&mut self) {
        let lines: Vec<String> = self.session.drain_outbox().collect();
        for line in lines {
            tracing::trace!(">> {line}");
            if let Err(e) = self.stream.send_line(&line).await {
                self.session.on_transport_error(&e.to_string());
                break;
            }
        }
        self.publish();
    }

    fn publish(&mut self) {
        // A dropped receiver just means nobody is listening to that kind.
        for event in self.session.drain_events() {
            match event {
                SessionEvent::Game(event) => {
                    let _ = self.sinks.game.send(event);
                }
                SessionEvent::Chat(event) => {
                    let _ = self.sinks.chat.send(event);
                }
                other => {
                    match &other {
                        SessionEvent::StatusChanged(status) => {
                            self.sinks.status.send_replace(*status);
                        }
                        SessionEvent::Fatal(err) => {
                            self.fatal = Some(err.clone());
                        }
                        _ => {}
                    }
                    let _ = self.sinks.session.send(other);
                }
            }
        }
    }
}
