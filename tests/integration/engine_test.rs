use std::sync::Arc;

use devinfo::core::engine::InfoEngine;
use devinfo::core::item::{Category, Item};
use devinfo::core::orchestrator::Status;
use devinfo::core::permissions::{GrantedPermissions, Permission, PermissionGrant};
use devinfo::core::query::QueryFilter;
use tokio::runtime::Handle;

use super::support::FakePlatform;

fn engine(version: u32) -> InfoEngine {
    InfoEngine::new(
        Handle::current(),
        Arc::new(FakePlatform::new(version)),
        Arc::new(GrantedPermissions::new()),
    )
}

fn unchanged_except<'a>(before: &'a [Item], after: &'a [Item], title: &str) -> bool {
    before
        .iter()
        .zip(after)
        .filter(|(b, _)| b.title != title)
        .all(|(b, a)| b == a)
}

#[tokio::test]
async fn test_start_collects_every_category() {
    let engine = engine(34);
    let reports = engine.start().wait().await;
    assert_eq!(reports.len(), 4);

    let snapshot = engine.store().snapshot();
    for category in Category::ALL {
        assert!(snapshot.items().any(|i| i.category == category));
    }

    let mut status = engine.subscribe_status();
    status.wait_for(|s| *s == Status::Succeeded).await.unwrap();
}

#[tokio::test]
async fn test_grant_reresolves_only_waiting_items() {
    let engine = engine(34);
    engine.start().wait().await;

    let before: Vec<Item> = engine.store().snapshot().items().cloned().collect();
    let revision = engine.store().snapshot().revision();

    let reports = engine
        .on_permission_result(PermissionGrant::granted(Permission::AccessFineLocation))
        .wait()
        .await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].category, Category::Network);

    let after: Vec<Item> = engine.store().snapshot().items().cloned().collect();
    assert_eq!(before.len(), after.len());
    assert!(unchanged_except(&before, &after, "Wi-Fi SSID"));
    assert_eq!(engine.store().snapshot().revision(), revision + 1);
    assert_eq!(
        engine
            .store()
            .get("Wi-Fi SSID", Category::Network)
            .unwrap()
            .subtitle(),
        Some("home")
    );

    // Still waiting on a different permission
    assert!(engine
        .store()
        .get("Data Network Type", Category::Network)
        .unwrap()
        .is_unavailable());
}

#[tokio::test]
async fn test_denied_permission_changes_nothing() {
    let engine = engine(34);
    engine.start().wait().await;
    let revision = engine.store().snapshot().revision();

    let handle =
        engine.on_permission_result(PermissionGrant::denied(Permission::AccessFineLocation));
    assert!(handle.is_empty());
    assert_eq!(engine.store().snapshot().revision(), revision);
}

#[tokio::test]
async fn test_live_query_follows_collection() {
    let engine = engine(34);
    let mut query = engine.query(QueryFilter::new().category(Category::Hardware));
    assert!(query.current().is_empty());

    engine.load_category(Category::Hardware).wait().await;
    let items = query.next().await.unwrap();
    assert!(!items.is_empty());
    assert!(items.iter().all(|i| i.category == Category::Hardware));

    let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
    let mut sorted = titles.clone();
    sorted.sort();
    assert_eq!(titles, sorted);
}

#[tokio::test]
async fn test_reset_clears_store() {
    let engine = engine(34);
    engine.start().wait().await;
    assert!(!engine.store().is_empty());

    engine.reset();
    assert!(engine.store().is_empty());
}
