//! In-memory item store.
//!
//! Items are keyed by `(category, title)`. Every change publishes a new
//! immutable snapshot on a watch channel, so readers never observe a
//! half-applied upsert and subscribers only wake when something changed.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::watch;

use super::item::{Category, Item, ItemKey};

/// Result of a single upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    Unchanged,
}

/// Consistent view of the store after some number of writes
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    revision: u64,
    items: BTreeMap<ItemKey, Item>,
}

impl StoreSnapshot {
    /// Incremented once per write that changed the contents
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Items in key order (category, then title)
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn get(&self, title: &str, category: Category) -> Option<&Item> {
        self.items.get(&ItemKey::new(title, category))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Shared item store
#[derive(Debug)]
pub struct ItemStore {
    tx: watch::Sender<Arc<StoreSnapshot>>,
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(StoreSnapshot::default()));
        Self { tx }
    }

    /// Insert the item, or replace the value of the item with the same key
    pub fn upsert(&self, item: Item) -> UpsertOutcome {
        let mut outcome = UpsertOutcome::Unchanged;

        self.tx.send_if_modified(|snapshot| {
            let key = item.key();
            if snapshot.items.get(&key) == Some(&item) {
                return false;
            }

            let state = Arc::make_mut(snapshot);
            outcome = match state.items.insert(key, item) {
                Some(_) => UpsertOutcome::Updated,
                None => UpsertOutcome::Inserted,
            };
            state.revision += 1;
            true
        });

        outcome
    }

    /// Drop every item
    pub fn remove_all(&self) {
        self.tx.send_if_modified(|snapshot| {
            if snapshot.items.is_empty() {
                return false;
            }
            let state = Arc::make_mut(snapshot);
            state.items.clear();
            state.revision += 1;
            true
        });
    }

    pub fn get(&self, title: &str, category: Category) -> Option<Item> {
        self.tx.borrow().get(title, category).cloned()
    }

    pub fn get_key(&self, key: &ItemKey) -> Option<Item> {
        self.tx.borrow().items.get(key).cloned()
    }

    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        Arc::clone(&self.tx.borrow())
    }

    /// Receiver that is notified after every change
    pub fn subscribe(&self) -> watch::Receiver<Arc<StoreSnapshot>> {
        self.tx.subscribe()
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }
}
