//! # Spellwire
//!
//! Async client for card game servers that speak a line-oriented,
//! pipe-delimited text protocol.
//!
//! Spellwire connects, greets and logs in, keeps the link alive with
//! heartbeat pings, correlates every command with its answer, collects
//! listing records, and routes game and chat events to you in arrival
//! order.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spellwire::prelude::*;
//!
//! # async fn demo() -> Result<(), ClientError> {
//! let mut client = Client::builder()
//!     .player("alice", "secret")
//!     .connect_tcp("127.0.0.1:4747")
//!     .await?;
//!
//! client.handle.wait_for_status(ConnectionStatus::Idle).await?;
//! let players = client.handle.list_players().wait().await?;
//! println!("{:?}", players.records);
//!
//! while let Some(event) = client.events.game.recv().await {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod driver;
mod error;

pub use client::{Client, ClientBuilder, ClientEvents, ClientHandle};
pub use config::ClientConfig;
pub use driver::ClientDriver;
pub use error::ClientError;

/// The types most programs need, in one import.
pub mod prelude {
    pub use crate::{
        Client, ClientBuilder, ClientConfig, ClientDriver, ClientError,
        ClientEvents, ClientHandle,
    };
    pub use spellwire_protocol::{
        ChatEvent, ChatEventKind, Command, CounterColor, CounterSummary,
        EventScope, GameEvent, GameEventKind, GameSummary, MessageId,
        PROTOCOL_VERSION, PlayerSummary, ProtocolError, ResponseOutcome,
        ZoneCard, ZoneKind, ZoneSummary,
    };
    pub use spellwire_session::{
        CommandHandle, Completion, ConnectionStatus, GameDump, Records,
        SessionError, SessionEvent,
    };
    pub use spellwire_transport::{LineStream, TcpLineStream, TextLineStream};
}
