//! Store worker that owns the authoritative hold contents.
//!
//! Receives commands from [`HostHandle`](crate::api::HostHandle), applies the
//! admissibility rules, and publishes events to the EventBus. Single writer:
//! every mutation funnels through [`StoreWorker::replace_contents`].

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use hold_core::{
    Admission, AdmissionContext, Blacklist, CallerRole, HeldItem, HoldConfig, Inventory,
    ItemCatalog, ItemRecord, evaluate,
};

use crate::events::{Event, EventBus, HoldEvent, SyncEvent};
use crate::protocol::{self, ProtocolError};

use super::release::ReleaseBatch;

/// Commands that can be sent to the store worker
pub enum Command {
    /// Ask to store one record. Rejections are dropped, not answered.
    RequestDeposit {
        origin: CallerRole,
        record: ItemRecord,
    },
    /// Withdraw up to `count` records matching `matching`.
    /// Returns the records actually removed.
    Withdraw {
        matching: ItemRecord,
        count: usize,
        reply: oneshot::Sender<Vec<ItemRecord>>,
    },
    /// Swap in new contents wholesale.
    Replace {
        records: Vec<ItemRecord>,
        broadcast_all: bool,
    },
    /// Query the current store state (read-only).
    Query { reply: oneshot::Sender<HoldView> },
    /// Replace the runtime settings.
    UpdateConfig { config: HoldConfig },
    /// Flip the in-transit flag.
    SetTransit { in_transit: bool },
    /// Apply end-of-round retention.
    ConcludeRound { outcome: RoundOutcome },
    /// The hold container is being torn down; clear and rebroadcast.
    ContainerDespawning,
    /// Encode the current contents for persistence.
    ExportSnapshot {
        reply: oneshot::Sender<Result<Vec<u8>, ProtocolError>>,
    },
    /// Re-publish the full authority state for late joiners.
    Resync,
    /// Stop the worker loop.
    Shutdown,
}

/// How a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RoundOutcome {
    Survived,
    Wiped,
}

/// Read-only view of the store returned by [`Command::Query`].
#[derive(Clone, Debug)]
pub struct HoldView {
    pub records: Vec<ItemRecord>,
    pub occupancy: usize,
    pub total_value: i64,
    pub revision: u64,
}

/// Background task that processes store commands.
///
/// Commands are applied strictly in arrival order, which is what makes the
/// queue the ordering authority: a deposit enqueued before a teardown lands
/// before it, with no further locking anywhere.
pub struct StoreWorker {
    inventory: Inventory,
    config: HoldConfig,
    blacklist: Blacklist,
    revision: u64,
    in_transit: bool,
    catalog: Arc<dyn ItemCatalog>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    release_tx: mpsc::Sender<ReleaseBatch>,
}

impl StoreWorker {
    /// Creates a new store worker.
    pub fn new(
        inventory: Inventory,
        revision: u64,
        config: HoldConfig,
        catalog: Arc<dyn ItemCatalog>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        release_tx: mpsc::Sender<ReleaseBatch>,
    ) -> Self {
        let blacklist = Blacklist::parse(&config.blacklist);
        info!(
            "StoreWorker initialized with occupancy: {}, capacity: {}, revision: {}",
            inventory.len(),
            config.capacity(),
            revision
        );

        Self {
            inventory,
            config,
            blacklist,
            revision,
            in_transit: false,
            catalog,
            command_rx,
            event_bus,
            release_tx,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    if matches!(cmd, Command::Shutdown) {
                        debug!(target: "runtime::store", "Store worker stopping");
                        break;
                    }
                    self.handle_command(cmd).await;
                }
                else => break,
            }
        }
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::RequestDeposit { origin, record } => {
                self.handle_deposit(origin, record);
            }
            Command::Withdraw {
                matching,
                count,
                reply,
            } => {
                let taken = self.handle_withdraw(matching, count).await;
                if reply.send(taken).is_err() {
                    debug!("Withdraw reply channel closed (caller dropped)");
                }
            }
            Command::Replace {
                records,
                broadcast_all,
            } => {
                self.replace_contents(records, broadcast_all);
            }
            Command::Query { reply } => {
                if reply.send(self.view()).is_err() {
                    debug!("Query reply channel closed (caller dropped)");
                }
            }
            Command::UpdateConfig { config } => {
                self.handle_update_config(config);
            }
            Command::SetTransit { in_transit } => {
                self.handle_set_transit(in_transit);
            }
            Command::ConcludeRound { outcome } => {
                self.handle_conclude_round(outcome);
            }
            Command::ContainerDespawning => {
                self.handle_container_despawning();
            }
            Command::ExportSnapshot { reply } => {
                let encoded = protocol::encode_snapshot(self.revision, self.inventory.records());
                if reply.send(encoded).is_err() {
                    debug!("ExportSnapshot reply channel closed (caller dropped)");
                }
            }
            Command::Resync => {
                self.handle_resync();
            }
            Command::Shutdown => {
                // Intercepted in run().
            }
        }
    }

    /// Applies the admissibility rules to a deposit request.
    ///
    /// A rejection is not an error: the request is dropped and the denial
    /// logged. The sender already ran the same rules as an advisory check,
    /// so a rejection here means its replica was behind.
    fn handle_deposit(&mut self, origin: CallerRole, record: ItemRecord) {
        // Instance-only state like used_up is not on the wire; the sender's
        // advisory check gates it.
        let candidate = HeldItem::new(record.kind);
        match self.admit(origin, &candidate) {
            Admission::Allowed => {
                let next = self.inventory.with_record(record);
                self.replace_contents(next, false);
                self.publish_sync();
            }
            Admission::Denied(reason) => {
                debug!(
                    target: "runtime::store",
                    origin = %origin,
                    kind = record.kind.0,
                    reason = reason.key(),
                    "Deposit rejected"
                );
            }
        }
    }

    /// Removes matching records and hands them to the release queue.
    async fn handle_withdraw(&mut self, matching: ItemRecord, count: usize) -> Vec<ItemRecord> {
        let taken = self.inventory.take(matching, count);
        if taken.is_empty() {
            return taken;
        }

        let next = self.inventory.without_each(&taken);
        self.replace_contents(next, false);
        self.publish_sync();

        let batch = ReleaseBatch {
            records: taken.clone(),
            delay: self.config.spawn_delay(),
        };
        if self.release_tx.send(batch).await.is_err() {
            warn!(
                target: "runtime::store",
                "Release worker gone, withdrawn records will not materialize"
            );
        }

        taken
    }

    fn handle_update_config(&mut self, config: HoldConfig) {
        if config.blacklist != self.config.blacklist {
            self.blacklist = Blacklist::parse(&config.blacklist);
            debug!(
                target: "runtime::store",
                entries = self.blacklist.len(),
                "Blacklist reparsed"
            );
        }
        self.config = config;
        self.event_bus.publish(Event::Hold(HoldEvent::ConfigChanged {
            config: self.config.clone(),
        }));
    }

    fn handle_set_transit(&mut self, in_transit: bool) {
        self.in_transit = in_transit;
        self.event_bus
            .publish(Event::Hold(HoldEvent::TransitChanged { in_transit }));
    }

    /// Applies end-of-round retention and pushes the result to every replica.
    ///
    /// A survived round carries everything over. A wipe keeps only valueless
    /// records, unless the hold is configured as a safe container.
    fn handle_conclude_round(&mut self, outcome: RoundOutcome) {
        let keep_all = outcome == RoundOutcome::Survived || self.config.safe_container;
        let survivors: Vec<ItemRecord> = self
            .inventory
            .records()
            .iter()
            .filter(|record| keep_all || record.value == 0)
            .map(|record| record.carried_over())
            .collect();

        info!(
            target: "runtime::store",
            outcome = %outcome,
            kept = survivors.len(),
            dropped = self.inventory.len() - survivors.len(),
            "Round concluded"
        );
        self.replace_contents(survivors, true);
    }

    /// Clears the store ahead of the container object being destroyed.
    ///
    /// Arrives through the command queue like any other mutation, so a
    /// deposit already queued ahead of the teardown still lands first and is
    /// carried into the rebroadcast before the clear erases it.
    fn handle_container_despawning(&mut self) {
        info!(
            target: "runtime::store",
            occupancy = self.inventory.len(),
            "Container despawning, clearing store"
        );
        self.replace_contents(Vec::new(), true);
    }

    /// Re-publishes the full authority state so a fresh replica converges.
    fn handle_resync(&mut self) {
        self.publish_sync();
        self.event_bus.publish(Event::Hold(HoldEvent::ConfigChanged {
            config: self.config.clone(),
        }));
        self.event_bus.publish(Event::Hold(HoldEvent::TransitChanged {
            in_transit: self.in_transit,
        }));
    }

    /// Sole mutation funnel.
    ///
    /// Swaps contents, bumps the revision, and always notifies local
    /// listeners of the new occupancy. `broadcast_all` additionally pushes a
    /// full-state frame to replicas; the deposit and withdraw paths pass
    /// `false` and push after their own bookkeeping instead.
    fn replace_contents(&mut self, records: Vec<ItemRecord>, broadcast_all: bool) {
        let (old_len, new_len) = self.inventory.replace(records);
        self.revision += 1;
        debug!(
            target: "runtime::store",
            old = old_len,
            new = new_len,
            revision = self.revision,
            "Store contents replaced"
        );

        self.event_bus
            .publish(Event::Hold(HoldEvent::OccupancyChanged {
                occupancy: self.inventory.len(),
                total_value: self.inventory.total_value(),
            }));

        if broadcast_all {
            self.publish_sync();
        }
    }

    fn publish_sync(&self) {
        self.event_bus
            .publish(Event::Replication(SyncEvent::SyncAll {
                revision: self.revision,
                records: self.inventory.records().to_vec(),
            }));
    }

    fn admit(&self, role: CallerRole, candidate: &HeldItem) -> Admission {
        let ctx = AdmissionContext {
            role,
            occupancy: self.inventory.len(),
            capacity: self.config.capacity(),
            permission: self.config.permission,
            override_mode: self.config.override_mode,
            require_in_transit: self.config.require_in_transit,
            in_transit: self.in_transit,
            blacklist: &self.blacklist,
            catalog: self.catalog.as_ref(),
        };
        evaluate(&ctx, Some(candidate))
    }

    fn view(&self) -> HoldView {
        HoldView {
            records: self.inventory.records().to_vec(),
            occupancy: self.inventory.len(),
            total_value: self.inventory.total_value(),
            revision: self.revision,
        }
    }
}
