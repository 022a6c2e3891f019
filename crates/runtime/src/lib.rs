//! Session orchestration for the host-authoritative hold.
//!
//! This crate wires together the authoritative store, its replication
//! events, client replicas, and the container lifecycle guard into a
//! cohesive API. Consumers embed [`Session`] to host the hold, attach
//! [`ClientHandle`] replicas, and mutate state through [`HostHandle`].
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream callers interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`replica`] keeps the client-side copy converging on authority state
//! - [`guard`] intercepts destructive container lifecycle events
//! - [`protocol`] fixes the snapshot and deposit wire layout
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod guard;
pub mod protocol;
pub mod replica;
pub mod session;

mod workers;

pub use api::{ClientHandle, HostHandle, Result, SessionError};
pub use events::{Event, EventBus, HoldEvent, LifecycleEvent, SyncEvent, Topic};
pub use guard::{DespawnVerdict, GuardState, LifecycleGuard, ObjectCaps};
pub use protocol::{ProtocolError, RECORD_WIRE_SIZE, SNAPSHOT_HEADER_SIZE, Snapshot};
pub use replica::Replica;
pub use session::{Session, SessionBuilder, SessionConfig};
pub use workers::{HoldView, RoundOutcome};
