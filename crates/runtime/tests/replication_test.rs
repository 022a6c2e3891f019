//! Replication semantics: convergence, ordering, idempotence, and the
//! silence of authoritative rejections.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use hold_content::CatalogData;
use hold_core::{
    Admission, HeldItem, HoldConfig, ItemDefinition, ItemKindId, ItemRecord, OverrideMode,
    PermissionLevel,
};
use runtime::{Event, Session, SyncEvent, Topic};

const APPLE: ItemKindId = ItemKindId(1);
const RADIO: ItemKindId = ItemKindId(2);
const JAR: ItemKindId = ItemKindId(3);

fn catalog() -> Arc<CatalogData> {
    let mut radio = ItemDefinition::new(RADIO, "Radio");
    radio.is_scrap = true;
    let mut jar = ItemDefinition::new(JAR, "Jar");
    jar.is_scrap = true;
    Arc::new(CatalogData::from_definitions(vec![
        ItemDefinition::new(APPLE, "Apple"),
        radio,
        jar,
    ]))
}

async fn start(config: HoldConfig) -> Session {
    Session::builder()
        .hold_config(config)
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
async fn test_client_observes_mutations_in_commit_order() {
    let session = start(HoldConfig::new()).await;
    let handle = session.handle();
    let mut client = session.attach_client().await.expect("Client should attach");

    for value in [10, 20, 30, 40] {
        handle
            .deposit(&HeldItem::scrap(RADIO, value))
            .await
            .expect("Deposit should enqueue");
    }

    // Observe frames until the last mutation lands; revisions must never
    // step backwards, so no later mutation is visible before an earlier one.
    let mut seen = vec![client.revision()];
    while client.occupancy() < 4 {
        client.recv().await.expect("event stream should stay open");
        seen.push(client.revision());
    }
    assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(client.revision(), 4);
    assert_eq!(client.total_value(), 100);

    session.shutdown().await.expect("Session should shut down");
}

#[tokio::test]
async fn test_resync_reframes_are_idempotent() {
    let session = start(HoldConfig::new()).await;
    let handle = session.handle();
    let mut replication = handle.subscribe(Topic::Replication);

    handle
        .deposit(&HeldItem::scrap(JAR, 15))
        .await
        .expect("Deposit should enqueue");
    let first = next_sync(&mut replication).await;

    handle.resync().await.expect("Resync should enqueue");
    handle.resync().await.expect("Resync should enqueue");
    let second = next_sync(&mut replication).await;
    let third = next_sync(&mut replication).await;

    assert_eq!(first, second);
    assert_eq!(second, third);

    session.shutdown().await.expect("Session should shut down");
}

#[tokio::test]
async fn test_late_joiner_converges_to_authority_state() {
    let session = start(HoldConfig::new()).await;
    let handle = session.handle();

    handle
        .deposit(&HeldItem::scrap(RADIO, 60))
        .await
        .expect("Deposit should enqueue");
    handle
        .deposit(&HeldItem::new(APPLE))
        .await
        .expect("Deposit should enqueue");
    let view = handle.query().await.expect("Query should answer");

    // Nothing before this point was observable by the late joiner.
    let mut client = session.attach_client().await.expect("Client should attach");
    client
        .sync_past(view.revision)
        .await
        .expect("Client should converge");

    assert_eq!(client.records(), view.records.as_slice());
    assert_eq!(client.total_value(), view.total_value);

    session.shutdown().await.expect("Session should shut down");
}

#[tokio::test]
async fn test_raw_frames_gate_on_revision() {
    let session = start(HoldConfig::new()).await;
    let mut client = session.attach_client().await.expect("Client should attach");

    let newer = runtime::protocol::encode_snapshot(
        5,
        &[ItemRecord::from_held(&HeldItem::scrap(RADIO, 9))],
    )
    .expect("encode");
    let stale = runtime::protocol::encode_snapshot(2, &[]).expect("encode");

    assert!(client.apply_frame(&newer).expect("apply"));
    assert!(!client.apply_frame(&stale).expect("apply"));
    assert_eq!(client.revision(), 5);
    assert_eq!(client.occupancy(), 1);

    // Malformed input fails that frame only.
    assert!(client.apply_frame(&[0xff, 0x01]).is_err());
    assert_eq!(client.revision(), 5);

    session.shutdown().await.expect("Session should shut down");
}

#[tokio::test]
async fn test_no_one_permission_drops_every_request() {
    let mut config = HoldConfig::new();
    config.permission = PermissionLevel::NoOne;

    let session = start(config).await;
    let handle = session.handle();
    let client = session.attach_client().await.expect("Client should attach");
    let mut replication = handle.subscribe(Topic::Replication);

    handle
        .deposit(&HeldItem::scrap(RADIO, 5))
        .await
        .expect("Deposit should enqueue");
    client
        .request_deposit(&HeldItem::scrap(JAR, 5))
        .await
        .expect("Request should enqueue");

    let view = handle.query().await.expect("Query should answer");
    assert_eq!(view.occupancy, 0);
    assert_eq!(view.revision, 0);
    assert_no_sync(&mut replication).await;

    session.shutdown().await.expect("Session should shut down");
}

#[tokio::test]
async fn test_host_only_permission_distinguishes_origin() {
    let mut config = HoldConfig::new();
    config.permission = PermissionLevel::HostOnly;

    let session = start(config).await;
    let handle = session.handle();
    let client = session.attach_client().await.expect("Client should attach");

    handle
        .deposit(&HeldItem::scrap(RADIO, 5))
        .await
        .expect("Deposit should enqueue");
    client
        .request_deposit(&HeldItem::scrap(JAR, 5))
        .await
        .expect("Request should enqueue");

    let view = handle.query().await.expect("Query should answer");
    assert_eq!(view.occupancy, 1);
    assert_eq!(view.records[0].kind, RADIO);

    session.shutdown().await.expect("Session should shut down");
}

#[tokio::test]
async fn test_transit_requirement_gates_deposits() {
    let mut config = HoldConfig::new();
    config.require_in_transit = true;

    let session = start(config).await;
    let handle = session.handle();
    let mut client = session.attach_client().await.expect("Client should attach");

    handle
        .deposit(&HeldItem::scrap(RADIO, 5))
        .await
        .expect("Deposit should enqueue");
    let view = handle.query().await.expect("Query should answer");
    assert_eq!(view.occupancy, 0);

    handle
        .set_in_transit(true)
        .await
        .expect("Transit should enqueue");
    handle
        .deposit(&HeldItem::scrap(RADIO, 5))
        .await
        .expect("Deposit should enqueue");
    let view = handle.query().await.expect("Query should answer");
    assert_eq!(view.occupancy, 1);

    // The replica sees the flag too, so its advisory check agrees.
    tokio::time::timeout(Duration::from_millis(500), async {
        while !client.in_transit() {
            client.recv().await.expect("event stream should stay open");
        }
    })
    .await
    .expect("replica should observe transit");

    session.shutdown().await.expect("Session should shut down");
}

#[tokio::test]
async fn test_capacity_race_resolves_at_the_authority() {
    let mut config = HoldConfig::new();
    config.capacity = 1;

    let session = start(config).await;
    let handle = session.handle();
    let mut client = session.attach_client().await.expect("Client should attach");
    tokio::time::timeout(Duration::from_millis(500), async {
        while client.config().capacity != 1 {
            client.recv().await.expect("event stream should stay open");
        }
    })
    .await
    .expect("replica should receive config");

    // Advisory check passes against the still-empty replica.
    let held = HeldItem::scrap(JAR, 5);
    assert_eq!(client.check_deposit(Some(&held)), Admission::Allowed);

    // The host fills the only slot before the client's request lands.
    handle
        .deposit(&HeldItem::scrap(RADIO, 5))
        .await
        .expect("Deposit should enqueue");
    client
        .request_deposit(&held)
        .await
        .expect("Request should enqueue");

    let view = handle.query().await.expect("Query should answer");
    assert_eq!(view.occupancy, 1);
    assert_eq!(view.records[0].kind, RADIO);
    assert_eq!(view.revision, 1);

    session.shutdown().await.expect("Session should shut down");
}

#[tokio::test]
async fn test_config_update_reparses_blacklist_for_the_authority() {
    let session = start(HoldConfig::new()).await;
    let handle = session.handle();

    handle
        .deposit(&HeldItem::scrap(RADIO, 5))
        .await
        .expect("Deposit should enqueue");

    let mut config = HoldConfig::new();
    config.blacklist = "Radio".to_owned();
    handle
        .update_config(config)
        .await
        .expect("Config should enqueue");

    handle
        .deposit(&HeldItem::scrap(RADIO, 5))
        .await
        .expect("Deposit should enqueue");
    handle
        .deposit(&HeldItem::scrap(JAR, 5))
        .await
        .expect("Deposit should enqueue");

    let view = handle.query().await.expect("Query should answer");
    assert_eq!(view.occupancy, 2);
    assert!(view.records.iter().any(|record| record.kind == JAR));
    assert_eq!(
        view.records
            .iter()
            .filter(|record| record.kind == RADIO)
            .count(),
        1
    );

    session.shutdown().await.expect("Session should shut down");
}

#[tokio::test]
async fn test_override_modes_bypass_the_rule_chain() {
    let mut config = HoldConfig::new();
    config.blacklist = "radio".to_owned();
    config.override_mode = OverrideMode::Always;

    let session = start(config).await;
    let handle = session.handle();

    // Always admits even a blacklisted kind.
    handle
        .deposit(&HeldItem::scrap(RADIO, 5))
        .await
        .expect("Deposit should enqueue");
    let view = handle.query().await.expect("Query should answer");
    assert_eq!(view.occupancy, 1);

    let mut config = HoldConfig::new();
    config.override_mode = OverrideMode::Never;
    handle
        .update_config(config)
        .await
        .expect("Config should enqueue");

    // Never rejects even a perfectly legal deposit.
    handle
        .deposit(&HeldItem::scrap(JAR, 5))
        .await
        .expect("Deposit should enqueue");
    let view = handle.query().await.expect("Query should answer");
    assert_eq!(view.occupancy, 1);

    session.shutdown().await.expect("Session should shut down");
}
