use std::sync::Arc;
use std::time::Duration;

use devinfo::core::battery_listener::{
    spawn_battery_monitor, BatteryEvent, BatteryListener, EventOutcome, BATTERY_TITLE,
};
use devinfo::core::item::{Category, ChartIcon};
use devinfo::core::store::ItemStore;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::time::timeout;

use super::support::FakePlatform;

#[tokio::test]
async fn test_event_upserts_battery_item_and_acknowledges() {
    let store = Arc::new(ItemStore::new());
    let listener = BatteryListener::new(Arc::clone(&store), Arc::new(FakePlatform::new(34)));

    let (event, ack) = BatteryEvent::new();
    assert_eq!(listener.handle(event).await, EventOutcome::Upserted);
    assert_eq!(ack.await.unwrap(), EventOutcome::Upserted);

    let item = store.get(BATTERY_TITLE, Category::Hardware).unwrap();
    assert_eq!(item.subtitle(), Some("72%, Discharging (Battery)"));
    let chart = item.chart().unwrap();
    assert_eq!(chart.icon, ChartIcon::Battery);
    assert_eq!(chart.used, 72);
}

#[tokio::test]
async fn test_failed_probe_still_acknowledges() {
    let store = Arc::new(ItemStore::new());
    let platform = Arc::new(FakePlatform::new(34).without_battery());
    let listener = BatteryListener::new(Arc::clone(&store), platform);

    let (event, ack) = BatteryEvent::new();
    assert_eq!(listener.handle(event).await, EventOutcome::NoItem);
    assert_eq!(ack.await.unwrap(), EventOutcome::NoItem);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_monitor_reports_then_stops() {
    let store = Arc::new(ItemStore::new());
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let monitor = spawn_battery_monitor(
        &Handle::current(),
        Arc::clone(&store),
        Arc::new(FakePlatform::new(34)),
        shutdown_rx,
    );

    // The first poll fires immediately
    let mut snapshots = store.subscribe();
    timeout(
        Duration::from_secs(5),
        snapshots.wait_for(|s| s.get(BATTERY_TITLE, Category::Hardware).is_some()),
    )
    .await
    .unwrap()
    .unwrap();

    shutdown_tx.send(()).unwrap();
    timeout(Duration::from_secs(5), monitor).await.unwrap().unwrap();
}
