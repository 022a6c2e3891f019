//! Cloneable façade for issuing commands to the authoritative store.
//!
//! [`HostHandle`] hides channel plumbing and offers async helpers for
//! mutating the hold, attaching client replicas, and streaming events from
//! specific topics.
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};

use hold_core::{CallerRole, HeldItem, HoldConfig, ItemCatalog, ItemRecord};

use super::client::ClientHandle;
use super::errors::{Result, SessionError};
use crate::events::{Event, EventBus, Topic};
use crate::guard::LifecycleGuard;
use crate::workers::{Command, HoldView, RoundOutcome};

/// Host-facing handle to interact with the session
#[derive(Clone)]
pub struct HostHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    catalog: Arc<dyn ItemCatalog>,
}

impl HostHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        catalog: Arc<dyn ItemCatalog>,
    ) -> Self {
        Self {
            command_tx,
            event_bus,
            catalog,
        }
    }

    /// Request a deposit of the held item as the host.
    ///
    /// Subject to the same authoritative admissibility check as any client
    /// request; a rejection is dropped and logged, not returned.
    pub async fn deposit(&self, held: &HeldItem) -> Result<()> {
        let record = ItemRecord::from_held(held);
        self.command_tx
            .send(Command::RequestDeposit {
                origin: CallerRole::Host,
                record,
            })
            .await
            .map_err(|_| SessionError::CommandChannelClosed)
    }

    /// Withdraw up to `count` records matching `matching`.
    ///
    /// Returns the records actually removed; they re-materialize one by one
    /// as paced `ItemReleased` events.
    pub async fn withdraw(&self, matching: ItemRecord, count: usize) -> Result<Vec<ItemRecord>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Withdraw {
                matching,
                count,
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::CommandChannelClosed)?;

        reply_rx.await.map_err(SessionError::ReplyChannelClosed)
    }

    /// Replace the whole contents.
    ///
    /// `broadcast_all` forces a full-state rebroadcast to every replica;
    /// pass `false` for host-local bookkeeping that replicates later.
    pub async fn replace(&self, records: Vec<ItemRecord>, broadcast_all: bool) -> Result<()> {
        self.command_tx
            .send(Command::Replace {
                records,
                broadcast_all,
            })
            .await
            .map_err(|_| SessionError::CommandChannelClosed)
    }

    /// Clear the store and force a full rebroadcast.
    pub async fn clear(&self) -> Result<()> {
        self.replace(Vec::new(), true).await
    }

    /// Query the current store state (read-only snapshot)
    pub async fn query(&self) -> Result<HoldView> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Query { reply: reply_tx })
            .await
            .map_err(|_| SessionError::CommandChannelClosed)?;

        reply_rx.await.map_err(SessionError::ReplyChannelClosed)
    }

    /// Swap in new runtime settings; the blacklist is re-derived as needed.
    pub async fn update_config(&self, config: HoldConfig) -> Result<()> {
        self.command_tx
            .send(Command::UpdateConfig { config })
            .await
            .map_err(|_| SessionError::CommandChannelClosed)
    }

    /// Flip the in-transit flag that gates location-bound deposits.
    pub async fn set_in_transit(&self, in_transit: bool) -> Result<()> {
        self.command_tx
            .send(Command::SetTransit { in_transit })
            .await
            .map_err(|_| SessionError::CommandChannelClosed)
    }

    /// Apply end-of-round retention and rebroadcast the survivors.
    pub async fn conclude_round(&self, outcome: RoundOutcome) -> Result<()> {
        self.command_tx
            .send(Command::ConcludeRound { outcome })
            .await
            .map_err(|_| SessionError::CommandChannelClosed)
    }

    /// Encode the current contents for persistence.
    pub async fn export_snapshot(&self) -> Result<Vec<u8>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::ExportSnapshot { reply: reply_tx })
            .await
            .map_err(|_| SessionError::CommandChannelClosed)?;

        let encoded = reply_rx.await.map_err(SessionError::ReplyChannelClosed)?;
        encoded.map_err(SessionError::from)
    }

    /// Ask the authority to re-publish its full state.
    pub async fn resync(&self) -> Result<()> {
        self.command_tx
            .send(Command::Resync)
            .await
            .map_err(|_| SessionError::CommandChannelClosed)
    }

    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| SessionError::CommandChannelClosed)
    }

    /// Attach a new client replica.
    ///
    /// The client is subscribed before the resync request goes out, so the
    /// full-state frame that answers it cannot be missed.
    pub async fn attach_client(&self) -> Result<ClientHandle> {
        let replication_rx = self.event_bus.subscribe(Topic::Replication);
        let hold_rx = self.event_bus.subscribe(Topic::Hold);
        let client = ClientHandle::new(
            self.command_tx.clone(),
            Arc::clone(&self.catalog),
            replication_rx,
            hold_rx,
        );

        self.command_tx
            .send(Command::Resync)
            .await
            .map_err(|_| SessionError::CommandChannelClosed)?;

        Ok(client)
    }

    /// Build the lifecycle guard for the container object.
    pub fn container_guard(&self) -> LifecycleGuard {
        LifecycleGuard::new(self.command_tx.clone(), self.event_bus.clone())
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Hold` - Occupancy, config, transit, and release notifications
    /// - `Topic::Replication` - Full-state frames pushed to replicas
    /// - `Topic::Lifecycle` - Intercepted container teardowns
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// The item catalog this session was built with.
    pub fn catalog(&self) -> &Arc<dyn ItemCatalog> {
        &self.catalog
    }
}
