//! The pending command registry.
//!
//! Every command the client sends is parked here, keyed by its message id,
//! until the server answers it or the session ends. The registry also owns
//! the message id counter so ids are never reused for as long as the
//! registry lives, reconnects included.

use std::collections::BTreeMap;

use spellwire_protocol::{MessageId, ResponseOutcome};

use crate::{Completer, Completion, ResponseAggregator};

// ---------------------------------------------------------------------------
// StatusHook
// ---------------------------------------------------------------------------

/// Connection status change a command triggers when it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusHook {
    None,
    /// `Ok` → Idle, anything else is a fatal login rejection.
    Login,
    /// `create_game` / `join_game`: `Ok` → Playing.
    EnterGame,
    /// `leave_game`: `Ok` → Idle.
    LeaveGame,
}

// ---------------------------------------------------------------------------
// PendingCommand
// ---------------------------------------------------------------------------

/// A command that went out and has not been answered yet.
#[derive(Debug)]
pub struct PendingCommand {
    id: MessageId,
    name: &'static str,
    /// Heartbeat ticks seen while waiting.
    missed_ticks: u32,
    aggregator: ResponseAggregator,
    pub(crate) hook: StatusHook,
    completer: Completer,
}

impl PendingCommand {
    pub(crate) fn new(
        id: MessageId,
        name: &'static str,
        aggregator: ResponseAggregator,
        hook: StatusHook,
        completer: Completer,
    ) -> Self {
        Self {
            id,
            name,
            missed_ticks: 0,
            aggregator,
            hook,
            completer,
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Wire name of the command, for logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn missed_ticks(&self) -> u32 {
        self.missed_ticks
    }

    pub fn aggregator_mut(&mut self) -> &mut ResponseAggregator {
        &mut self.aggregator
    }

    /// Fires the completion. Consumes the command, so it can only happen once.
    pub(crate) fn complete(self, outcome: ResponseOutcome) {
        let records = self.aggregator.resolve(outcome);
        self.completer.complete(Completion {
            id: self.id,
            outcome,
            records,
        });
    }
}

// ---------------------------------------------------------------------------
// PendingRegistry
// ---------------------------------------------------------------------------

/// All in-flight commands of one session.
///
/// A `BTreeMap` rather than a `HashMap` so iteration (timeouts, teardown)
/// follows id order, which is also send order.
#[derive(Debug, Default)]
pub struct PendingRegistry {
    commands: BTreeMap<MessageId, PendingCommand>,
    /// Last id handed out; 0 means none yet.
    last_id: u32,
}

impl PendingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the next message id: 1, 2, 3, ...
    pub fn allocate_id(&mut self) -> MessageId {
        self.last_id = self.last_id.wrapping_add(1);
        MessageId(self.last_id)
    }

    /// Parks a command until it resolves.
    pub fn register(&mut self, command: PendingCommand) {
        let id = command.id();
        if self.commands.insert(id, command).is_some() {
            // Only possible after the 32-bit counter wraps.
            tracing::warn!(msg_id = %id, "message id reused, old command dropped");
        }
    }

    /// Removes and returns the command with this id, if it is pending.
    pub fn resolve(&mut self, id: MessageId) -> Option<PendingCommand> {
        self.commands.remove(&id)
    }

    pub fn get_mut(&mut self, id: MessageId) -> Option<&mut PendingCommand> {
        self.commands.get_mut(&id)
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.commands.contains_key(&id)
    }

    /// Empties the registry, returning every pending command in id order.
    ///
    /// Dropping the returned commands cancels them without firing their
    /// completion.
    pub fn remove_all(&mut self) -> Vec<PendingCommand> {
        std::mem::take(&mut self.commands).into_values().collect()
    }

    /// Counts one more missed tick on every pending command.
    ///
    /// Returns the oldest command that has now missed more than
    /// `max_missed` ticks, if any.
    pub fn tick_all(&mut self, max_missed: u32) -> Option<MessageId> {
        let mut stalled = None;
        for command in self.commands.values_mut() {
            command.missed_ticks += 1;
            if stalled.is_none() && command.missed_ticks > max_missed {
                stalled = Some(command.id);
            }
        }
        stalled
    }

    /// The id the next [`allocate_id`](Self::allocate_id) call returns.
    pub fn peek_next_id(&self) -> MessageId {
        MessageId(self.last_id.wrapping_add(1))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
