//! Event payloads published by the session workers.

use hold_core::{HoldConfig, ItemRecord};
use serde::{Deserialize, Serialize};

use crate::guard::ObjectCaps;

/// Local notifications about the authoritative store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HoldEvent {
    /// Store contents changed; emitted on every mutation.
    OccupancyChanged { occupancy: usize, total_value: i64 },
    /// Runtime settings were replaced.
    ConfigChanged { config: HoldConfig },
    /// The in-transit flag flipped.
    TransitChanged { in_transit: bool },
    /// A withdrawn record left the pacing queue and should materialize.
    ItemReleased { record: ItemRecord },
}

/// Full-state frames pushed from the authority to replicas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SyncEvent {
    SyncAll {
        revision: u64,
        records: Vec<ItemRecord>,
    },
}

/// Object lifecycle notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LifecycleEvent {
    /// A container teardown was intercepted after its contents were cleared.
    DespawnSuppressed { caps: ObjectCaps },
}
