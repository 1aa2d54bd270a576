//! Completion delivery: the one-shot link between a pending command and
//! whoever issued it.
//!
//! ```text
//! issuer                         session
//!   │   CommandHandle::channel()    │
//!   │◄──────── handle ──── completer ─►  stored on the pending command
//!   │                               │
//!   │          resp|<id>|ok         │
//!   │◄──────── Completion ──────────┤  send() consumes the completer
//! ```
//!
//! A completer is consumed when it fires, so a command cannot complete
//! twice. Dropping it unfired (what a disconnect does) shows up on the
//! handle as [`SessionError::CommandCancelled`].

use spellwire_protocol::{MessageId, ResponseOutcome};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::{Records, SessionError};

/// The final result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// The message id the command went out with.
    pub id: MessageId,
    pub outcome: ResponseOutcome,
    /// Collected records; empty unless a listing command resolved `Ok`.
    pub records: Records,
}

/// Sending half, owned by the pending command.
#[derive(Debug)]
pub struct Completer {
    /// `None` for fire-and-forget commands (heartbeat pings, the automatic
    /// login) that nobody waits on.
    sender: Option<oneshot::Sender<Completion>>,
}

impl Completer {
    /// A completer with no one listening.
    pub fn detached() -> Self {
        Self { sender: None }
    }

    /// Delivers the completion, consuming the completer.
    pub(crate) fn complete(self, completion: Completion) {
        if let Some(sender) = self.sender {
            // The issuer may have dropped its handle; nothing to do then.
            let _ = sender.send(completion);
        }
    }
}

/// Receiving half, held by the issuer.
///
/// Await it with [`CommandHandle::wait`], or poll it without a runtime via
/// [`CommandHandle::try_result`].
#[derive(Debug)]
pub struct CommandHandle {
    receiver: oneshot::Receiver<Completion>,
}

impl CommandHandle {
    /// Creates a linked completer / handle pair.
    pub fn channel() -> (Completer, CommandHandle) {
        let (tx, rx) = oneshot::channel();
        (
            Completer { sender: Some(tx) },
            CommandHandle { receiver: rx },
        )
    }

    /// Waits for the command to resolve.
    ///
    /// # Errors
    /// [`SessionError::CommandCancelled`] if the session dropped the command
    /// (disconnect, timeout, transport failure) before it resolved.
    pub async fn wait(self) -> Result<Completion, SessionError> {
        self.receiver
            .await
            .map_err(|_| SessionError::CommandCancelled)
    }

    /// Non-blocking check.
    ///
    /// `None` while the command is still pending.
    pub fn try_result(&mut self) -> Option<Result<Completion, SessionError>> {
        match self.receiver.try_recv() {
            Ok(completion) => Some(Ok(completion)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(SessionError::CommandCancelled)),
        }
    }
}
