//! Collection orchestrator.
//!
//! Runs collectors on the blocking pool and publishes an overall status.
//! At most one worker runs per category. A pass requested while that
//! category is busy is folded into a single re-run of the running worker,
//! with the two scopes merged, so no request is lost.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, error, info};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};

use super::availability::AvailabilityPolicy;
use super::collectors::{CollectorRegistry, Scope};
use super::item::Category;
use super::permissions::PermissionGrant;
use super::store::ItemStore;

/// Overall collection status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Idle,
    Loading,
    Succeeded,
}

/// What one collector run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub category: Category,
    pub scope: Scope,
    pub items_written: usize,
}

/// Completion of a requested pass, one entry per category it covers
#[derive(Debug, Default)]
pub struct PassHandle {
    pending: Vec<oneshot::Receiver<PassReport>>,
}

impl PassHandle {
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    fn push(&mut self, rx: oneshot::Receiver<PassReport>) {
        self.pending.push(rx);
    }

    /// Wait until every covered category has been collected
    pub async fn wait(self) -> Vec<PassReport> {
        let mut reports = Vec::with_capacity(self.pending.len());
        for rx in self.pending {
            if let Ok(report) = rx.await {
                reports.push(report);
            }
        }
        reports
    }
}

/// Worker bookkeeping for one busy category
#[derive(Default)]
struct InFlight {
    rerun: Option<Scope>,
    waiters: Vec<oneshot::Sender<PassReport>>,
}

/// Shared state touched by workers
struct Shared {
    registry: Arc<CollectorRegistry>,
    store: Arc<ItemStore>,
    policy: AvailabilityPolicy,
    in_flight: Mutex<HashMap<Category, InFlight>>,
    active: AtomicUsize,
    status: watch::Sender<Status>,
}

/// Keeps the status at Loading for as long as any worker holds one
struct ActiveWorker {
    shared: Arc<Shared>,
}

impl ActiveWorker {
    fn start(shared: &Arc<Shared>) -> Self {
        if shared.active.fetch_add(1, Ordering::SeqCst) == 0 {
            shared.status.send_replace(Status::Loading);
        }
        Self {
            shared: Arc::clone(shared),
        }
    }
}

impl Drop for ActiveWorker {
    fn drop(&mut self) {
        if self.shared.active.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.shared.status.send_replace(Status::Succeeded);
        }
    }
}

pub struct Orchestrator {
    runtime: Handle,
    shared: Arc<Shared>,
}

impl Orchestrator {
    pub fn new(
        runtime: Handle,
        registry: Arc<CollectorRegistry>,
        store: Arc<ItemStore>,
        policy: AvailabilityPolicy,
    ) -> Self {
        let (status, _) = watch::channel(Status::Idle);
        Self {
            runtime,
            shared: Arc::new(Shared {
                registry,
                store,
                policy,
                in_flight: Mutex::new(HashMap::new()),
                active: AtomicUsize::new(0),
                status,
            }),
        }
    }

    pub fn status(&self) -> Status {
        *self.shared.status.borrow()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<Status> {
        self.shared.status.subscribe()
    }

    /// Run every registered collector
    pub fn full_pass(&self) -> PassHandle {
        let mut handle = PassHandle::default();
        for category in self.shared.registry.categories() {
            handle.push(self.request(category, Scope::All));
        }
        handle
    }

    /// Run one collector
    pub fn targeted_pass(&self, category: Category) -> PassHandle {
        let mut handle = PassHandle::default();
        if self.shared.registry.get(category).is_some() {
            handle.push(self.request(category, Scope::All));
        } else {
            debug!("No collector registered for {}", category);
        }
        handle
    }

    /// Re-run, per category, only the items still waiting for the granted
    /// permission. A denial changes nothing.
    ///
    /// Categories come from the registry, not the store: a worker may have
    /// checked the permission but not yet written its item.
    pub fn on_permission_result(&self, grant: PermissionGrant) -> PassHandle {
        let mut handle = PassHandle::default();
        if !grant.granted {
            debug!("{} denied, nothing to re-collect", grant.permission);
            return handle;
        }

        for category in self.shared.registry.gated_on(grant.permission) {
            handle.push(self.request(category, Scope::Pending(grant.permission)));
        }
        handle
    }

    fn request(&self, category: Category, scope: Scope) -> oneshot::Receiver<PassReport> {
        let (tx, rx) = oneshot::channel();

        {
            let mut in_flight = self.shared.in_flight.lock();
            if let Some(busy) = in_flight.get_mut(&category) {
                let merged = busy.rerun.map_or(scope, |queued| queued.merge(scope));
                debug!("{} collection already running, queued {:?}", category, merged);
                busy.rerun = Some(merged);
                busy.waiters.push(tx);
                return rx;
            }
            in_flight.insert(category, InFlight::default());
        }

        let worker = ActiveWorker::start(&self.shared);
        let shared = Arc::clone(&self.shared);
        let runtime = self.runtime.clone();
        self.runtime.spawn(async move {
            run_worker(runtime, shared, category, scope, tx).await;
            drop(worker);
        });

        rx
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

async fn run_worker(
    runtime: Handle,
    shared: Arc<Shared>,
    category: Category,
    mut scope: Scope,
    first: oneshot::Sender<PassReport>,
) {
    let mut waiters = vec![first];

    loop {
        info!("Collecting {} ({:?})", category, scope);

        let task_shared = Arc::clone(&shared);
        let written = runtime
            .spawn_blocking(move || {
                task_shared
                    .registry
                    .get(category)
                    .map(|collector| {
                        collector.collect_into(&task_shared.policy, &task_shared.store, scope)
                    })
                    .unwrap_or(0)
            })
            .await
            .unwrap_or_else(|e| {
                error!("{} collector aborted: {}", category, e);
                0
            });

        info!("Collected {}: {} item(s) written", category, written);

        let report = PassReport {
            category,
            scope,
            items_written: written,
        };
        for waiter in waiters.drain(..) {
            let _ = waiter.send(report.clone());
        }

        let next = {
            let mut in_flight = shared.in_flight.lock();
            let next = in_flight.get_mut(&category).and_then(|busy| {
                let rerun = busy.rerun.take()?;
                Some((rerun, std::mem::take(&mut busy.waiters)))
            });
            if next.is_none() {
                in_flight.remove(&category);
            }
            next
        };

        match next {
            Some((rerun, queued)) => {
                debug!("Re-running {} for coalesced request", category);
                scope = rerun;
                waiters = queued;
            }
            None => break,
        }
    }
}
