//! Category collectors.
//!
//! A collector owns an ordered list of probes for one category and runs them
//! one after another through the availability policy. A failing probe only
//! ever produces an empty item; the remaining probes still run.

mod capacity;
pub mod device;
pub mod hardware;
pub mod network;
pub mod software;

pub use capacity::{capacity_reading, external_storage};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use log::debug;

use super::availability::{AvailabilityPolicy, Requirement};
use super::item::{Category, Item, ItemKey, Reading};
use super::permissions::Permission;
use super::store::ItemStore;
use crate::error::Result;
use crate::platform::Platform;

/// A single fallible read of one environment fact
pub type Probe = Box<dyn Fn() -> Result<Reading> + Send + Sync>;

/// One declared probe of a collector
pub struct ProbeSpec {
    pub title: String,
    pub requirement: Requirement,
    probe: Probe,
}

impl ProbeSpec {
    pub fn new<S, F>(title: S, requirement: Requirement, probe: F) -> Self
    where
        S: Into<String>,
        F: Fn() -> Result<Reading> + Send + Sync + 'static,
    {
        Self {
            title: title.into(),
            requirement,
            probe: Box::new(probe),
        }
    }

    pub fn run(&self) -> Result<Reading> {
        (self.probe)()
    }
}

impl fmt::Debug for ProbeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeSpec")
            .field("title", &self.title)
            .field("requirement", &self.requirement)
            .finish_non_exhaustive()
    }
}

/// Which probes of a collector a pass should run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every probe
    All,
    /// Only probes still waiting for this permission
    Pending(Permission),
}

impl Scope {
    /// Scope covering both `self` and `other`
    pub fn merge(self, other: Scope) -> Scope {
        if self == other {
            self
        } else {
            Scope::All
        }
    }
}

/// Fixed, ordered probe list for one category
#[derive(Debug)]
pub struct CategoryCollector {
    category: Category,
    probes: Vec<ProbeSpec>,
}

impl CategoryCollector {
    pub fn new(category: Category, probes: Vec<ProbeSpec>) -> Self {
        Self { category, probes }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Whether any probe is gated on `permission`
    pub fn requires(&self, permission: Permission) -> bool {
        self.probes
            .iter()
            .any(|spec| spec.requirement.permission == Some(permission))
    }

    /// Run every probe in declaration order
    pub fn collect(&self, policy: &AvailabilityPolicy) -> Vec<Item> {
        self.probes
            .iter()
            .map(|spec| self.evaluate(spec, policy))
            .collect()
    }

    /// Run the probes selected by `scope`, upserting each item as soon as it
    /// resolves. Returns the number of items written.
    ///
    /// Items already classified as permanently unavailable are left alone.
    pub fn collect_into(&self, policy: &AvailabilityPolicy, store: &ItemStore, scope: Scope) -> usize {
        let mut written = 0;

        for spec in &self.probes {
            let key = ItemKey::new(spec.title.as_str(), self.category);
            let existing = store.get_key(&key);
            let existing_reason = existing.as_ref().and_then(|item| item.unavailable_reason());

            if existing_reason.is_some_and(|reason| reason.is_permanent()) {
                debug!("'{}' is permanently unavailable, not re-evaluating", spec.title);
                continue;
            }

            if let Scope::Pending(permission) = scope {
                let gated = spec.requirement.permission == Some(permission);
                let waiting = existing.is_none()
                    || existing_reason.and_then(|reason| reason.permission()) == Some(permission);
                if !(gated && waiting) {
                    continue;
                }
            }

            store.upsert(self.evaluate(spec, policy));
            written += 1;
        }

        written
    }

    fn evaluate(&self, spec: &ProbeSpec, policy: &AvailabilityPolicy) -> Item {
        let value = policy.evaluate(&spec.title, &spec.requirement, || spec.run());
        Item::new(spec.title.clone(), self.category, value)
    }
}

/// Builds a collector whose probes all read from one platform
pub(crate) struct ProbeList {
    platform: Arc<dyn Platform>,
    probes: Vec<ProbeSpec>,
}

impl ProbeList {
    pub(crate) fn new(platform: &Arc<dyn Platform>) -> Self {
        Self {
            platform: Arc::clone(platform),
            probes: Vec::new(),
        }
    }

    pub(crate) fn add<F>(&mut self, title: &str, requirement: Requirement, read: F) -> &mut Self
    where
        F: Fn(&dyn Platform) -> Result<Reading> + Send + Sync + 'static,
    {
        let platform = Arc::clone(&self.platform);
        self.probes
            .push(ProbeSpec::new(title, requirement, move || read(platform.as_ref())));
        self
    }

    pub(crate) fn into_collector(self, category: Category) -> CategoryCollector {
        CategoryCollector::new(category, self.probes)
    }
}

/// Shorthand for probes that yield plain text
pub(crate) fn text(value: Result<String>) -> Result<Reading> {
    value.map(Reading::text)
}

/// The collectors a pass can run, one per category
#[derive(Debug, Default)]
pub struct CollectorRegistry {
    collectors: BTreeMap<Category, CategoryCollector>,
}

impl CollectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four built-in collectors reading from `platform`
    pub fn for_platform(platform: Arc<dyn Platform>) -> Self {
        let mut registry = Self::new();
        registry.register(device::collector(&platform));
        registry.register(network::collector(&platform));
        registry.register(software::collector(&platform));
        registry.register(hardware::collector(&platform));
        registry
    }

    /// Add or replace the collector for its category
    pub fn register(&mut self, collector: CategoryCollector) -> &mut Self {
        self.collectors.insert(collector.category(), collector);
        self
    }

    pub fn with(mut self, collector: CategoryCollector) -> Self {
        self.register(collector);
        self
    }

    pub fn get(&self, category: Category) -> Option<&CategoryCollector> {
        self.collectors.get(&category)
    }

    pub fn categories(&self) -> Vec<Category> {
        self.collectors.keys().copied().collect()
    }

    /// Categories with at least one probe gated on `permission`
    pub fn gated_on(&self, permission: Permission) -> Vec<Category> {
        self.collectors
            .values()
            .filter(|collector| collector.requires(permission))
            .map(CategoryCollector::category)
            .collect()
    }
}
