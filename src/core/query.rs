//! Filtered, sorted views over the item store.

use std::sync::Arc;

use tokio::sync::watch;

use super::item::{Category, Item};
use super::store::StoreSnapshot;

/// Which items a view shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    pub category: Option<Category>,
    pub search: String,
    pub hide_unavailable: bool,
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn search<S: Into<String>>(mut self, search: S) -> Self {
        self.search = search.into();
        self
    }

    pub fn hide_unavailable(mut self, hide: bool) -> Self {
        self.hide_unavailable = hide;
        self
    }

    pub fn matches(&self, item: &Item) -> bool {
        if self.category.is_some_and(|category| category != item.category) {
            return false;
        }

        // Empty items are not unavailable and stay visible
        if self.hide_unavailable && item.is_unavailable() {
            return false;
        }

        let needle = self.search.to_lowercase();
        if needle.is_empty() {
            return true;
        }

        item.title.to_lowercase().contains(&needle)
            || item
                .display_subtitle()
                .is_some_and(|subtitle| subtitle.to_lowercase().contains(&needle))
    }

    /// Matching items of `snapshot`, ordered by title
    pub fn apply(&self, snapshot: &StoreSnapshot) -> Vec<Item> {
        self.select(snapshot.items())
    }

    pub fn select<'a, I>(&self, items: I) -> Vec<Item>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let mut selected: Vec<Item> = items
            .into_iter()
            .filter(|item| self.matches(item))
            .cloned()
            .collect();
        sort_by_title(&mut selected);
        selected
    }
}

/// Ordinal title order; equal titles fall back to category order
pub fn sort_by_title(items: &mut [Item]) {
    items.sort_by(|a, b| {
        a.title
            .as_bytes()
            .cmp(b.title.as_bytes())
            .then(a.category.cmp(&b.category))
    });
}

/// A query that follows the store.
///
/// `next` resolves only when the visible result differs from the last one
/// handed out. Changing the filter re-evaluates against the latest snapshot
/// without touching any collector.
#[derive(Debug)]
pub struct LiveQuery {
    rx: watch::Receiver<Arc<StoreSnapshot>>,
    filter: QueryFilter,
    current: Vec<Item>,
}

impl LiveQuery {
    pub fn new(mut rx: watch::Receiver<Arc<StoreSnapshot>>, filter: QueryFilter) -> Self {
        let current = filter.apply(&rx.borrow_and_update());
        Self {
            rx,
            filter,
            current,
        }
    }

    pub fn filter(&self) -> &QueryFilter {
        &self.filter
    }

    /// Result as of the last evaluation
    pub fn current(&self) -> &[Item] {
        &self.current
    }

    /// Wait for the next visible change. `None` once the store is gone.
    pub async fn next(&mut self) -> Option<Vec<Item>> {
        loop {
            self.rx.changed().await.ok()?;
            if self.refresh() {
                return Some(self.current.clone());
            }
        }
    }

    pub fn set_category(&mut self, category: Option<Category>) -> &[Item] {
        self.filter.category = category;
        self.refresh();
        &self.current
    }

    pub fn set_search<S: Into<String>>(&mut self, search: S) -> &[Item] {
        self.filter.search = search.into();
        self.refresh();
        &self.current
    }

    pub fn set_hide_unavailable(&mut self, hide: bool) -> &[Item] {
        self.filter.hide_unavailable = hide;
        self.refresh();
        &self.current
    }

    /// Re-evaluate against the latest snapshot; true if the result changed
    fn refresh(&mut self) -> bool {
        let result = self.filter.apply(&self.rx.borrow_and_update());
        if result == self.current {
            return false;
        }
        self.current = result;
        true
    }
}
