use devinfo::core::item::{Category, Item, Reading, Unavailable};
use devinfo::core::permissions::Permission;
use devinfo::core::query::{LiveQuery, QueryFilter};
use devinfo::core::store::ItemStore;

fn titles(items: &[Item]) -> Vec<&str> {
    items.iter().map(|i| i.title.as_str()).collect()
}

fn store_with_unavailable() -> ItemStore {
    let store = ItemStore::new();
    store.upsert(Item::resolved("Model", Category::Device, "Pixel 8".into()));
    store.upsert(Item::resolved("Kernel Version", Category::Software, "6.1".into()));
    store.upsert(Item::resolved("Board", Category::Device, Reading::empty()));
    store.upsert(Item::unavailable(
        "IMEI",
        Category::Device,
        Unavailable::NoLongerPossible { since: 29 },
    ));
    store.upsert(Item::unavailable(
        "Wi-Fi SSID",
        Category::Network,
        Unavailable::needs_permission(Permission::AccessFineLocation),
    ));
    store
}

#[test]
fn test_hide_unavailable_drops_only_unavailable() {
    let store = store_with_unavailable();
    let all = QueryFilter::new().apply(&store.snapshot());
    assert_eq!(all.len(), 5);

    let visible = QueryFilter::new().hide_unavailable(true).apply(&store.snapshot());
    assert_eq!(titles(&visible), vec!["Board", "Kernel Version", "Model"]);
}

#[test]
fn test_filters_compose() {
    let store = store_with_unavailable();
    let items = QueryFilter::new()
        .category(Category::Device)
        .search("i")
        .hide_unavailable(true)
        .apply(&store.snapshot());
    // "Pixel 8" matches through its subtitle
    assert_eq!(titles(&items), vec!["Model"]);
}

#[tokio::test]
async fn test_live_query_redelivers_after_transition() {
    let store = store_with_unavailable();
    let mut query = LiveQuery::new(
        store.subscribe(),
        QueryFilter::new().hide_unavailable(true),
    );
    assert_eq!(query.current().len(), 3);

    store.upsert(Item::resolved("Wi-Fi SSID", Category::Network, "home".into()));
    let items = query.next().await.unwrap();
    assert_eq!(
        titles(&items),
        vec!["Board", "Kernel Version", "Model", "Wi-Fi SSID"]
    );
}

#[test]
fn test_toggle_hide_unavailable_without_collection() {
    let store = store_with_unavailable();
    let revision = store.snapshot().revision();
    let mut query = LiveQuery::new(store.subscribe(), QueryFilter::new());

    assert_eq!(query.set_hide_unavailable(true).len(), 3);
    assert_eq!(query.set_hide_unavailable(false).len(), 5);
    assert_eq!(store.snapshot().revision(), revision);
}
