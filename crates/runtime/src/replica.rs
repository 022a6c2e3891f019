//! Client-side replica of the authoritative store.
//!
//! A replica never mutates itself from local intent; it only applies what the
//! authority pushed. Frames are full-state, so applying the newest frame from
//! any starting point converges to the same contents.

use tracing::debug;

use hold_core::{Blacklist, HoldConfig, Inventory, ItemCatalog, ItemRecord};

use crate::events::{Event, HoldEvent, SyncEvent};
use crate::protocol::{self, ProtocolError};

/// Passive copy of the authority state.
///
/// The revision gates stale frames: anything older than what the replica
/// already holds is ignored, and re-applying the current frame changes
/// nothing observable. Applying is therefore safe to repeat.
#[derive(Clone, Debug, Default)]
pub struct Replica {
    records: Inventory,
    revision: u64,
    config: HoldConfig,
    blacklist: Blacklist,
    in_transit: bool,
}

impl Replica {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one bus event. Returns whether replica state changed.
    pub fn apply(&mut self, event: &Event) -> bool {
        match event {
            Event::Replication(SyncEvent::SyncAll { revision, records }) => {
                self.apply_snapshot(*revision, records.clone())
            }
            Event::Hold(HoldEvent::ConfigChanged { config }) => {
                self.blacklist = Blacklist::parse(&config.blacklist);
                self.config = config.clone();
                true
            }
            Event::Hold(HoldEvent::TransitChanged { in_transit }) => {
                self.in_transit = *in_transit;
                true
            }
            _ => false,
        }
    }

    /// Applies a full-state snapshot unless it is older than what we hold.
    pub fn apply_snapshot(&mut self, revision: u64, records: Vec<ItemRecord>) -> bool {
        if revision < self.revision {
            debug!(
                target: "runtime::replica",
                incoming = revision,
                current = self.revision,
                "Ignoring stale snapshot"
            );
            return false;
        }
        self.revision = revision;
        self.records.replace(records);
        true
    }

    /// Decodes and applies a raw wire frame.
    ///
    /// A malformed frame is fatal to that frame only: the error surfaces to
    /// the caller and the replica keeps its current state.
    pub fn apply_frame(&mut self, bytes: &[u8]) -> Result<bool, ProtocolError> {
        let snapshot = protocol::decode_snapshot(bytes)?;
        Ok(self.apply_snapshot(snapshot.revision, snapshot.records))
    }

    pub fn records(&self) -> &[ItemRecord] {
        self.records.records()
    }

    /// Defensive display-ordered copy, same ordering as the authority's.
    pub fn sorted(&self, catalog: &dyn ItemCatalog) -> Vec<ItemRecord> {
        self.records.sorted(catalog)
    }

    pub fn occupancy(&self) -> usize {
        self.records.len()
    }

    pub fn total_value(&self) -> i64 {
        self.records.total_value()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn in_transit(&self) -> bool {
        self.in_transit
    }

    pub fn config(&self) -> &HoldConfig {
        &self.config
    }

    pub fn blacklist(&self) -> &Blacklist {
        &self.blacklist
    }
}
