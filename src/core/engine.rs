//! Engine facade tying platform, permissions, store and orchestrator together.

use std::sync::Arc;

use log::info;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use super::availability::AvailabilityPolicy;
use super::battery_listener::{spawn_battery_monitor, BatteryListener};
use super::collectors::CollectorRegistry;
use super::item::Category;
use super::orchestrator::{Orchestrator, PassHandle, Status};
use super::permissions::{GrantedPermissions, PermissionGrant};
use super::query::{LiveQuery, QueryFilter};
use super::store::ItemStore;
use crate::platform::Platform;

pub struct InfoEngine {
    runtime: Handle,
    platform: Arc<dyn Platform>,
    permissions: Arc<GrantedPermissions>,
    store: Arc<ItemStore>,
    orchestrator: Orchestrator,
}

impl InfoEngine {
    /// Engine running the built-in collectors against `platform`
    pub fn new(
        runtime: Handle,
        platform: Arc<dyn Platform>,
        permissions: Arc<GrantedPermissions>,
    ) -> Self {
        let registry = CollectorRegistry::for_platform(Arc::clone(&platform));
        Self::with_registry(runtime, platform, permissions, registry)
    }

    pub fn with_registry(
        runtime: Handle,
        platform: Arc<dyn Platform>,
        permissions: Arc<GrantedPermissions>,
        registry: CollectorRegistry,
    ) -> Self {
        let store = Arc::new(ItemStore::new());
        let policy = AvailabilityPolicy::new(platform.version(), permissions.clone());
        let orchestrator = Orchestrator::new(
            runtime.clone(),
            Arc::new(registry),
            Arc::clone(&store),
            policy,
        );

        Self {
            runtime,
            platform,
            permissions,
            store,
            orchestrator,
        }
    }

    /// Collect every category
    pub fn start(&self) -> PassHandle {
        info!("Starting full collection (platform version {})", self.platform.version());
        self.orchestrator.full_pass()
    }

    /// Collect a single category, e.g. when its view is first opened
    pub fn load_category(&self, category: Category) -> PassHandle {
        self.orchestrator.targeted_pass(category)
    }

    pub fn query(&self, filter: QueryFilter) -> LiveQuery {
        LiveQuery::new(self.store.subscribe(), filter)
    }

    pub fn status(&self) -> Status {
        self.orchestrator.status()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<Status> {
        self.orchestrator.subscribe_status()
    }

    /// Record a permission result and re-collect what it unlocks
    pub fn on_permission_result(&self, grant: PermissionGrant) -> PassHandle {
        self.permissions.apply(grant);
        self.orchestrator.on_permission_result(grant)
    }

    /// Listener for a single battery event
    pub fn battery_listener(&self) -> BatteryListener {
        BatteryListener::new(Arc::clone(&self.store), Arc::clone(&self.platform))
    }

    pub fn spawn_battery_monitor(&self, shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        spawn_battery_monitor(
            &self.runtime,
            Arc::clone(&self.store),
            Arc::clone(&self.platform),
            shutdown,
        )
    }

    /// Drop every collected item
    pub fn reset(&self) {
        self.store.remove_all();
    }

    pub fn store(&self) -> &Arc<ItemStore> {
        &self.store
    }

    pub fn platform_version(&self) -> u32 {
        self.platform.version()
    }
}

impl std::fmt::Debug for InfoEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfoEngine")
            .field("version", &self.platform.version())
            .field("items", &self.store.len())
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}
