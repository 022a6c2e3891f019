//! Scripted walkthrough of one hold session.
//!
//! Drives the session the way a round of play would: host deposits, a
//! client replica converging on pushed frames, advisory checks feeding the
//! interaction prompt, retrieval, a container teardown attempt, and round
//! conclusion.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use hold_core::{HeldItem, ItemCatalog, ItemKindId, Lexicon};
use runtime::{Event, HoldEvent, ObjectCaps, RoundOutcome, Session, Topic};

// Kind ids as assigned in data/items.ron.
const FLASHLIGHT: ItemKindId = ItemKindId(1);
const SHOVEL: ItemKindId = ItemKindId(2);
const GOLD_BAR: ItemKindId = ItemKindId(3);
const PICKLES: ItemKindId = ItemKindId(4);
const BOOMBOX: ItemKindId = ItemKindId(5);
const BODY: ItemKindId = ItemKindId(6);

pub async fn run(session: &Session, lexicon: &dyn Lexicon) -> Result<()> {
    let host = session.handle();
    let catalog = Arc::clone(host.catalog());

    // Whatever a previous run left behind (snapshot restore).
    let view = host.query().await?;
    info!(
        occupancy = view.occupancy,
        total_value = view.total_value,
        revision = view.revision,
        "Hold opened"
    );

    // A participant joins; attaching resyncs its replica from the authority.
    let mut client = session.attach_client().await?;
    client.sync_past(view.revision).await?;

    // Host stores a tool and some scrap.
    host.deposit(&HeldItem {
        save_state: Some(1),
        ..HeldItem::new(FLASHLIGHT)
    })
    .await?;
    host.deposit(&HeldItem::scrap(GOLD_BAR, 210)).await?;
    let view = host.query().await?;
    client.sync_past(view.revision).await?;
    info!(
        occupancy = view.occupancy,
        total_value = view.total_value,
        "Host deposits stored"
    );

    // Advisory checks drive the client's interaction prompt. Nothing here
    // reaches the authority; denied candidates are filtered at the source.
    for candidate in [
        None,
        Some(HeldItem::scrap(PICKLES, 35)),
        Some(HeldItem::new(BOOMBOX)),
        Some(HeldItem::new(BODY)),
    ] {
        let held_name = match &candidate {
            Some(held) => kind_name(catalog.as_ref(), held.kind),
            None => "empty hand".to_owned(),
        };
        let hint = client.interact_hint(candidate.as_ref(), lexicon);
        info!(
            held = %held_name,
            interactable = hint.interactable,
            tooltip = %hint.tooltip,
            "Interaction prompt"
        );
    }

    // The pickles passed the advisory check. The request is fire-and-forget;
    // its outcome is the next full-state frame.
    let pickles = HeldItem::scrap(PICKLES, 35);
    if client.check_deposit(Some(&pickles)).is_allowed() {
        client.request_deposit(&pickles).await?;
    }
    let view = host.query().await?;
    client.sync_past(view.revision).await?;
    info!(
        occupancy = client.occupancy(),
        total_value = client.total_value(),
        "Client deposit stored"
    );

    // Take the flashlight back out. The release worker publishes one event
    // per retrieved item, paced by the configured spawn delay.
    let mut hold_events = host.subscribe(Topic::Hold);
    if let Some(record) = view
        .records
        .iter()
        .copied()
        .find(|record| record.kind == FLASHLIGHT)
    {
        let taken = host.withdraw(record, 1).await?;
        info!(count = taken.len(), "Withdrawal granted");
        loop {
            match hold_events.recv().await {
                Ok(Event::Hold(HoldEvent::ItemReleased { record })) => {
                    info!(
                        kind = %kind_name(catalog.as_ref(), record.kind),
                        value = record.value,
                        "Item released back into the world"
                    );
                    break;
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
        let view = host.query().await?;
        client.sync_past(view.revision).await?;
    }

    // Engine-side teardown interception. Plain objects pass through; the
    // container itself is cleared and kept alive.
    let mut guard = session.container_guard();
    let verdict = guard
        .intercept_despawn(ObjectCaps::GRABBABLE | ObjectCaps::SCRAP)
        .await;
    info!(?verdict, "Teardown check for a plain scrap object");

    let verdict = guard
        .intercept_despawn(ObjectCaps::HOLD_CONTAINER | ObjectCaps::GRABBABLE)
        .await;
    info!(?verdict, "Teardown check for the hold container");
    let view = host.query().await?;
    client.sync_past(view.revision).await?;
    info!(occupancy = client.occupancy(), "Replica after container clear");

    // Next haul.
    host.deposit(&HeldItem::new(SHOVEL)).await?;
    host.deposit(&HeldItem::scrap(PICKLES, 42)).await?;

    // The round ends with the crew alive, so cargo carries over.
    host.conclude_round(RoundOutcome::Survived).await?;

    let view = host.query().await?;
    client.sync_past(view.revision).await?;
    info!(
        occupancy = view.occupancy,
        total_value = view.total_value,
        revision = view.revision,
        "Round concluded"
    );
    for record in client.sorted_records() {
        info!(
            kind = %kind_name(catalog.as_ref(), record.kind),
            value = record.value,
            carried_over = record.persisted_through_rounds,
            "Stored"
        );
    }

    Ok(())
}

fn kind_name(catalog: &dyn ItemCatalog, kind: ItemKindId) -> String {
    catalog
        .definition(kind)
        .map_or_else(|| format!("kind {}", kind.0), |def| def.name.clone())
}
