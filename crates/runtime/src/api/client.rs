//! Client-side surface: a replica fed from the bus plus advisory checks.
//!
//! [`ClientHandle`] models one connected participant. Its replica only moves
//! when the authority pushes state; local intent is expressed as
//! fire-and-forget deposit requests whose outcome shows up in a later frame.
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::warn;

use hold_core::{
    Admission, AdmissionContext, CallerRole, HeldItem, HoldConfig, InteractHint, ItemCatalog,
    ItemRecord, Lexicon, evaluate, hint,
};

use super::errors::{Result, SessionError};
use crate::events::Event;
use crate::protocol::ProtocolError;
use crate::replica::Replica;
use crate::workers::Command;

/// One participant's view of the session.
///
/// Not `Clone`: each participant attaches its own handle so its receivers
/// track its own consumption position on the bus.
pub struct ClientHandle {
    command_tx: mpsc::Sender<Command>,
    catalog: Arc<dyn ItemCatalog>,
    replica: Replica,
    replication_rx: broadcast::Receiver<Event>,
    hold_rx: broadcast::Receiver<Event>,
}

impl ClientHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        catalog: Arc<dyn ItemCatalog>,
        replication_rx: broadcast::Receiver<Event>,
        hold_rx: broadcast::Receiver<Event>,
    ) -> Self {
        Self {
            command_tx,
            catalog,
            replica: Replica::new(),
            replication_rx,
            hold_rx,
        }
    }

    /// Request a deposit of the held item.
    ///
    /// Fire-and-forget: there is no reply. The outcome is observed through
    /// the next full-state frame, or not at all if the host rejected.
    pub async fn request_deposit(&self, held: &HeldItem) -> Result<()> {
        let record = ItemRecord::from_held(held);
        self.command_tx
            .send(Command::RequestDeposit {
                origin: CallerRole::Client,
                record,
            })
            .await
            .map_err(|_| SessionError::CommandChannelClosed)
    }

    /// Ask the authority to re-publish its full state.
    pub async fn resync(&self) -> Result<()> {
        self.command_tx
            .send(Command::Resync)
            .await
            .map_err(|_| SessionError::CommandChannelClosed)
    }

    /// Advisory admissibility check against the local replica.
    ///
    /// Drives the interaction affordance only; the authoritative check runs
    /// again on the host when a request actually lands.
    pub fn check_deposit(&self, candidate: Option<&HeldItem>) -> Admission {
        let config = self.replica.config();
        let ctx = AdmissionContext {
            role: CallerRole::Client,
            occupancy: self.replica.occupancy(),
            capacity: config.capacity(),
            permission: config.permission,
            override_mode: config.override_mode,
            require_in_transit: config.require_in_transit,
            in_transit: self.replica.in_transit(),
            blacklist: self.replica.blacklist(),
            catalog: self.catalog.as_ref(),
        };
        evaluate(&ctx, candidate)
    }

    /// Interaction affordance and tooltip for the current candidate.
    pub fn interact_hint(&self, candidate: Option<&HeldItem>, lexicon: &dyn Lexicon) -> InteractHint {
        hint(self.check_deposit(candidate), lexicon)
    }

    /// Receives and applies the next event from the authority.
    pub async fn recv(&mut self) -> Result<()> {
        loop {
            let event = tokio::select! {
                event = self.replication_rx.recv() => event,
                event = self.hold_rx.recv() => event,
            };
            match event {
                Ok(event) => {
                    self.replica.apply(&event);
                    return Ok(());
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Frames are full-state; the next one catches us up.
                    warn!(
                        target: "runtime::client",
                        skipped,
                        "Replica lagged behind the bus"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(SessionError::EventChannelClosed);
                }
            }
        }
    }

    /// Receives until the replica has observed at least `revision`.
    pub async fn sync_past(&mut self, revision: u64) -> Result<()> {
        while self.replica.revision() < revision {
            self.recv().await?;
        }
        Ok(())
    }

    /// Applies everything currently buffered without waiting.
    ///
    /// Returns how many events changed the replica.
    pub fn try_drain(&mut self) -> usize {
        let mut applied = drain_receiver(&mut self.replication_rx, &mut self.replica);
        applied += drain_receiver(&mut self.hold_rx, &mut self.replica);
        applied
    }

    /// Decodes and applies a raw wire frame, bypassing the bus.
    ///
    /// A malformed frame fails that frame only; the replica keeps its state.
    pub fn apply_frame(&mut self, bytes: &[u8]) -> std::result::Result<bool, ProtocolError> {
        self.replica.apply_frame(bytes)
    }

    pub fn records(&self) -> &[ItemRecord] {
        self.replica.records()
    }

    /// Display-ordered defensive copy, resolved through the session catalog.
    pub fn sorted_records(&self) -> Vec<ItemRecord> {
        self.replica.sorted(self.catalog.as_ref())
    }

    pub fn occupancy(&self) -> usize {
        self.replica.occupancy()
    }

    pub fn total_value(&self) -> i64 {
        self.replica.total_value()
    }

    pub fn revision(&self) -> u64 {
        self.replica.revision()
    }

    pub fn in_transit(&self) -> bool {
        self.replica.in_transit()
    }

    pub fn config(&self) -> &HoldConfig {
        self.replica.config()
    }
}

fn drain_receiver(rx: &mut broadcast::Receiver<Event>, replica: &mut Replica) -> usize {
    let mut applied = 0;
    loop {
        match rx.try_recv() {
            Ok(event) => {
                if replica.apply(&event) {
                    applied += 1;
                }
            }
            // Skipping ahead is safe for the same reason lagging is.
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    applied
}
