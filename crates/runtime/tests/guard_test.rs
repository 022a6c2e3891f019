//! Lifecycle guard semantics: interception, suppression, and queue ordering
//! against concurrent mutations.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use hold_content::CatalogData;
use hold_core::{HeldItem, HoldConfig, ItemDefinition, ItemKindId, ItemRecord};
use runtime::{DespawnVerdict, Event, GuardState, ObjectCaps, Session, SyncEvent, Topic};

const RADIO: ItemKindId = ItemKindId(2);

fn catalog() -> Arc<CatalogData> {
    let mut radio = ItemDefinition::new(RADIO, "Radio");
    radio.is_scrap = true;
    Arc::new(CatalogData::from_definitions(vec![radio]))
}

async fn start() -> Session {
    Session::builder()
        .hold_config(HoldConfig::new())
        .catalog(catalog())
        .build()
        .await
        .expect("Session should build")
}

async fn next_sync(rx: &mut broadcast::Receiver<Event>) -> (u64, Vec<ItemRecord>) {
    loop {
        let event = tokio::time::timeout(Duration::from_millis(200), rx.recv())
            .await
            .expect("Should receive frame")
            .expect("Frame should be valid");
        if let Event::Replication(SyncEvent::SyncAll { revision, records }) = event {
            return (revision, records);
        }
    }
}

async fn assert_no_sync(rx: &mut broadcast::Receiver<Event>) {
    let outcome = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
    assert!(outcome.is_err(), "unexpected frame: {:?}", outcome);
}

#[tokio::test]
async fn test_container_teardown_clears_and_rebroadcasts_once() {
    let session = start().await;
    let handle = session.handle();
    let mut replication = handle.subscribe(Topic::Replication);

    handle
        .deposit(&HeldItem::scrap(RADIO, 30))
        .await
        .expect("Deposit should enqueue");
    let _ = next_sync(&mut replication).await;

    let mut guard = session.container_guard();
    assert_eq!(guard.state(), GuardState::Normal);

    let verdict = guard.intercept_despawn(ObjectCaps::HOLD_CONTAINER).await;
    assert_eq!(verdict, DespawnVerdict::Suppress);
    assert_eq!(guard.state(), GuardState::Normal);

    let (revision, records) = next_sync(&mut replication).await;
    assert_eq!(revision, 2);
    assert!(records.is_empty());
    assert_no_sync(&mut replication).await;

    let view = handle.query().await.expect("Query should answer");
    assert_eq!(view.occupancy, 0);

    session.shutdown().await.expect("Session should shut down");
}

#[tokio::test]
async fn test_unrelated_objects_proceed_without_side_effects() {
    let session = start().await;
    let handle = session.handle();
    let mut replication = handle.subscribe(Topic::Replication);
    let mut guard = session.container_guard();

    for caps in [
        ObjectCaps::empty(),
        ObjectCaps::GRABBABLE,
        ObjectCaps::GRABBABLE | ObjectCaps::SCRAP,
    ] {
        let verdict = guard.intercept_despawn(caps).await;
        assert_eq!(verdict, DespawnVerdict::Proceed);
    }

    assert_no_sync(&mut replication).await;
    let view = handle.query().await.expect("Query should answer");
    assert_eq!(view.revision, 0);

    session.shutdown().await.expect("Session should shut down");
}

#[tokio::test]
async fn test_deposit_queued_before_teardown_lands_first() {
    let session = start().await;
    let handle = session.handle();
    let mut replication = handle.subscribe(Topic::Replication);
    let mut guard = session.container_guard();

    // The deposit is enqueued ahead of the intercepted teardown, so queue
    // order decides the race: the record lands, then the clear erases it.
    handle
        .deposit(&HeldItem::scrap(RADIO, 12))
        .await
        .expect("Deposit should enqueue");
    let verdict = guard.intercept_despawn(ObjectCaps::HOLD_CONTAINER).await;
    assert_eq!(verdict, DespawnVerdict::Suppress);

    let (revision, records) = next_sync(&mut replication).await;
    assert_eq!(revision, 1);
    assert_eq!(records.len(), 1);

    let (revision, records) = next_sync(&mut replication).await;
    assert_eq!(revision, 2);
    assert!(records.is_empty());

    session.shutdown().await.expect("Session should shut down");
}

#[tokio::test]
async fn test_clearing_an_empty_hold_still_rebroadcasts() {
    let session = start().await;
    let handle = session.handle();
    let mut replication = handle.subscribe(Topic::Replication);
    let mut guard = session.container_guard();

    let verdict = guard.intercept_despawn(ObjectCaps::HOLD_CONTAINER).await;
    assert_eq!(verdict, DespawnVerdict::Suppress);

    let (revision, records) = next_sync(&mut replication).await;
    assert_eq!(revision, 1);
    assert!(records.is_empty());

    session.shutdown().await.expect("Session should shut down");
}

#[tokio::test]
async fn test_guard_suppresses_even_without_a_store_worker() {
    let session = start().await;
    let mut guard = session.container_guard();
    session.shutdown().await.expect("Session should shut down");

    // The store is gone; the teardown veto must hold regardless, since
    // letting the object die cannot make anything more consistent.
    let verdict = guard.intercept_despawn(ObjectCaps::HOLD_CONTAINER).await;
    assert_eq!(verdict, DespawnVerdict::Suppress);
}
