//! Release worker that paces withdrawn records back into the world.
//!
//! Withdrawals remove records from the store immediately; materializing the
//! corresponding objects is deliberately spread out so a large batch does not
//! land in the same instant. The store worker queues batches here and moves
//! on.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use hold_core::ItemRecord;

use crate::events::{Event, EventBus, HoldEvent};

/// One withdrawal's worth of records plus the pacing gap between them.
pub struct ReleaseBatch {
    pub records: Vec<ItemRecord>,
    pub delay: Duration,
}

/// Background task that drains release batches.
///
/// Exits when the store worker drops its sender.
pub struct ReleaseWorker {
    queue_rx: mpsc::Receiver<ReleaseBatch>,
    event_bus: EventBus,
}

impl ReleaseWorker {
    pub fn new(queue_rx: mpsc::Receiver<ReleaseBatch>, event_bus: EventBus) -> Self {
        Self {
            queue_rx,
            event_bus,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        while let Some(batch) = self.queue_rx.recv().await {
            debug!(
                target: "runtime::release",
                count = batch.records.len(),
                delay_ms = batch.delay.as_millis() as u64,
                "Releasing withdrawn records"
            );
            for record in batch.records {
                self.event_bus
                    .publish(Event::Hold(HoldEvent::ItemReleased { record }));
                tokio::time::sleep(batch.delay).await;
            }
        }
    }
}
