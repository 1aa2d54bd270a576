//! Client configuration.

use std::time::Duration;

use serde::Deserialize;
use spellwire_protocol::PROTOCOL_VERSION;
use spellwire_session::SessionConfig;
use spellwire_tick::TickConfig;

/// Everything a client needs to know before it connects.
///
/// Deserializable so hosts can keep it in a config file; any field left
/// out takes its default.
///
/// ```json
/// { "player_name": "alice", "password": "secret", "heartbeat_interval_ms": 500 }
/// ```
///
/// Clients started in bulk (bots, load tests) should set
/// `heartbeat_jitter_ms` so their pings spread out:
///
/// ```json
/// { "player_name": "bot-17", "heartbeat_jitter_ms": 1000 }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub player_name: String,
    pub password: String,
    /// Version the server must announce. Default: [`PROTOCOL_VERSION`].
    pub protocol_version: u32,
    /// Time between heartbeat pings. Default: 1000.
    pub heartbeat_interval_ms: u64,
    /// Upper bound of the random delay added before the first ping.
    /// Default: 0.
    pub heartbeat_jitter_ms: u64,
    /// Ticks a command may go unanswered before the server is considered
    /// dead. Default: 5.
    pub max_missed_ticks: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            player_name: String::new(),
            password: String::new(),
            protocol_version: PROTOCOL_VERSION,
            heartbeat_interval_ms: 1_000,
            heartbeat_jitter_ms: 0,
            max_missed_ticks: session.max_missed_ticks,
        }
    }
}

impl ClientConfig {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            protocol_version: self.protocol_version,
            max_missed_ticks: self.max_missed_ticks,
        }
    }

    pub fn tick_config(&self) -> TickConfig {
        TickConfig {
            interval: Duration::from_millis(self.heartbeat_interval_ms),
            initial_jitter: Duration::from_millis(self.heartbeat_jitter_ms),
        }
    }
}
