//! Lifecycle guard for the hold container object.
//!
//! The engine's natural teardown of the container would discard the
//! authoritative contents without telling any replica. The guard converts
//! that implicit destruction into an explicit, replicated clear and then
//! vetoes the teardown itself.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::events::{Event, EventBus, LifecycleEvent};
use crate::workers::Command;

bitflags::bitflags! {
    /// Capability markers attached to in-world objects.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
    pub struct ObjectCaps: u8 {
        const GRABBABLE = 1 << 0;
        const SCRAP = 1 << 1;
        /// The object backing the hold itself.
        const HOLD_CONTAINER = 1 << 2;
    }
}

/// Whether an intercepted teardown may proceed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DespawnVerdict {
    Proceed,
    Suppress,
}

/// Guard phases. `Clearing` only spans the enqueue of the clear mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    Normal,
    Clearing,
}

/// Interceptor sitting between the engine's object teardown and the store.
pub struct LifecycleGuard {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    state: GuardState,
}

impl LifecycleGuard {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
            state: GuardState::Normal,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Intercepts a pending object teardown.
    ///
    /// Objects without the container marker proceed untouched. The container
    /// itself has its contents cleared through the command queue, so a
    /// deposit already queued ahead of the teardown still lands first, and
    /// the teardown is then suppressed so the object survives.
    pub async fn intercept_despawn(&mut self, caps: ObjectCaps) -> DespawnVerdict {
        if !caps.contains(ObjectCaps::HOLD_CONTAINER) {
            return DespawnVerdict::Proceed;
        }

        // Re-entrant interception while the clear is being queued must not
        // queue a second clear.
        if self.state == GuardState::Clearing {
            return DespawnVerdict::Suppress;
        }

        self.state = GuardState::Clearing;
        if self
            .command_tx
            .send(Command::ContainerDespawning)
            .await
            .is_err()
        {
            warn!(
                target: "runtime::guard",
                "Store worker gone, suppressing teardown anyway"
            );
        }
        self.state = GuardState::Normal;

        debug!(target: "runtime::guard", caps = ?caps, "Suppressed container despawn");
        self.event_bus
            .publish(Event::Lifecycle(LifecycleEvent::DespawnSuppressed { caps }));
        DespawnVerdict::Suppress
    }
}
