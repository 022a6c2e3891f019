//! High-level session orchestrator.
//!
//! The session owns background workers, wires up command/event channels, and
//! exposes a builder-based API for hosting the authoritative hold.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use hold_core::{HoldConfig, Inventory, ItemCatalog};

use crate::api::{ClientHandle, HostHandle, Result, SessionError};
use crate::events::EventBus;
use crate::guard::LifecycleGuard;
use crate::protocol;
use crate::workers::{Command, ReleaseBatch, ReleaseWorker, StoreWorker};

/// Session configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub hold: HoldConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    pub release_buffer_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            hold: HoldConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            release_buffer_size: 64,
        }
    }
}

/// Main session that hosts the authoritative store.
///
/// Design: Session owns workers and coordinates lifecycle.
/// [`HostHandle`] provides a cloneable façade for callers.
pub struct Session {
    // Shared handle (can be cloned for callers)
    handle: HostHandle,

    // Background workers
    store_worker_handle: JoinHandle<()>,
    release_worker_handle: JoinHandle<()>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("store_worker_handle", &self.store_worker_handle)
            .field("release_worker_handle", &self.release_worker_handle)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a new session builder
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Get a cloneable handle to this session
    ///
    /// The handle can be shared across callers and async tasks.
    pub fn handle(&self) -> HostHandle {
        self.handle.clone()
    }

    /// Attach a new client replica to this session.
    pub async fn attach_client(&self) -> Result<ClientHandle> {
        self.handle.attach_client().await
    }

    /// Build the lifecycle guard for the container object.
    pub fn container_guard(&self) -> LifecycleGuard {
        self.handle.container_guard()
    }

    /// Shutdown the session gracefully
    pub async fn shutdown(self) -> Result<()> {
        // Best-effort: the worker may already be gone.
        let _ = self.handle.shutdown().await;
        drop(self.handle);

        self.store_worker_handle
            .await
            .map_err(SessionError::WorkerJoin)?;

        // The release worker drains once the store worker drops its queue.
        self.release_worker_handle
            .await
            .map_err(SessionError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Session`] with flexible configuration.
pub struct SessionBuilder {
    config: SessionConfig,
    catalog: Option<Arc<dyn ItemCatalog>>,
    snapshot: Option<Vec<u8>>,
}

impl SessionBuilder {
    fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            catalog: None,
            snapshot: None,
        }
    }

    /// Override session configuration
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Override just the hold settings
    pub fn hold_config(mut self, hold: HoldConfig) -> Self {
        self.config.hold = hold;
        self
    }

    /// Set the required item catalog
    pub fn catalog(mut self, catalog: Arc<dyn ItemCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Restore contents and revision from an exported snapshot.
    ///
    /// The revision continues where the exporting session left off, so
    /// replicas that saw the old session never mistake the restored state
    /// for something stale.
    pub fn restore_snapshot(mut self, bytes: Vec<u8>) -> Self {
        self.snapshot = Some(bytes);
        self
    }

    /// Build the session
    pub async fn build(self) -> Result<Session> {
        let catalog = self.catalog.ok_or(SessionError::MissingCatalog)?;

        let (inventory, revision) = match self.snapshot {
            Some(bytes) => {
                let snapshot = protocol::decode_snapshot(&bytes)?;
                (Inventory::from_records(snapshot.records), snapshot.revision)
            }
            None => (Inventory::new(), 0),
        };

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (release_tx, release_rx) =
            mpsc::channel::<ReleaseBatch>(self.config.release_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = HostHandle::new(command_tx, event_bus.clone(), Arc::clone(&catalog));

        // Create store worker
        let store_worker = StoreWorker::new(
            inventory,
            revision,
            self.config.hold.clone(),
            catalog,
            command_rx,
            event_bus.clone(),
            release_tx,
        );

        let store_worker_handle = tokio::spawn(async move {
            store_worker.run().await;
        });

        // Create release worker
        let release_worker = ReleaseWorker::new(release_rx, event_bus);

        let release_worker_handle = tokio::spawn(async move {
            release_worker.run().await;
        });

        Ok(Session {
            handle,
            store_worker_handle,
            release_worker_handle,
        })
    }
}
