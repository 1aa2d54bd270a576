//! Client session core for Spellwire.
//!
//! This crate is the heart of the client: it turns inbound lines into
//! command completions, events and status changes, and outgoing commands
//! into lines.
//!
//! 1. **Registry** ([`PendingRegistry`]) — commands waiting for an answer,
//!    keyed by message id
//! 2. **Aggregators** ([`ResponseAggregator`]) — collect the records a
//!    listing command streams back
//! 3. **Session** ([`Session`]) — correlates responses, routes events,
//!    runs the connection state machine and the heartbeat
//!
//! # How it fits in the stack
//!
//! ```text
//! Client facade (above)  ← owns one Session inside a driver task
//!     ↕
//! Session Layer (this crate)  ← pending commands, status, events
//!     ↕
//! Protocol Layer (below)  ← decode_line, Command, record types
//! ```
//!
//! The session never touches a socket or a clock. The host feeds it lines
//! and ticks, then drains the lines to send and the events to publish.

mod aggregate;
mod completion;
mod error;
mod event;
mod registry;
mod session;
mod status;

pub use aggregate::{GameDump, Records, ResponseAggregator};
pub use completion::{CommandHandle, Completer, Completion};
pub use error::SessionError;
pub use event::SessionEvent;
pub use registry::{PendingCommand, PendingRegistry};
pub use session::{LocalPlayer, Session, SessionConfig};
pub use status::ConnectionStatus;
