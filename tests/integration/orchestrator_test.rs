use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use devinfo::core::availability::{AvailabilityPolicy, Requirement};
use devinfo::core::collectors::{CategoryCollector, CollectorRegistry, ProbeSpec, Scope};
use devinfo::core::item::{Category, Reading};
use devinfo::core::orchestrator::{Orchestrator, Status};
use devinfo::core::permissions::{
    GrantedPermissions, Permission, PermissionChecker, PermissionGrant,
};
use devinfo::core::store::ItemStore;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::time::timeout;

/// Network collector whose second probe blocks until `release` is sent
fn gated_network(release: mpsc::Receiver<()>) -> CategoryCollector {
    let release = Mutex::new(release);
    CategoryCollector::new(
        Category::Network,
        vec![
            ProbeSpec::new(
                "Wi-Fi SSID",
                Requirement::permission(Permission::AccessFineLocation),
                || Ok("home".into()),
            ),
            ProbeSpec::new("Slow", Requirement::NONE, move || {
                let _ = release.lock().recv();
                Ok(Reading::text("done"))
            }),
        ],
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_grant_during_running_pass_is_not_lost() {
    let (release_tx, release_rx) = mpsc::channel();
    let permissions = Arc::new(GrantedPermissions::new());
    let store = Arc::new(ItemStore::new());
    let orchestrator = Orchestrator::new(
        Handle::current(),
        Arc::new(CollectorRegistry::new().with(gated_network(release_rx))),
        Arc::clone(&store),
        AvailabilityPolicy::new(34, permissions.clone()),
    );

    let first = orchestrator.full_pass();

    // The first probe has been written; the worker now sits in "Slow"
    let mut snapshots = store.subscribe();
    timeout(
        Duration::from_secs(5),
        snapshots.wait_for(|s| s.get("Wi-Fi SSID", Category::Network).is_some()),
    )
    .await
    .unwrap()
    .unwrap();
    assert!(store.get("Wi-Fi SSID", Category::Network).unwrap().is_unavailable());

    let grant = PermissionGrant::granted(Permission::AccessFineLocation);
    permissions.apply(grant);
    let coalesced = orchestrator.on_permission_result(grant);
    assert_eq!(coalesced.len(), 1);
    assert_eq!(orchestrator.status(), Status::Loading);

    release_tx.send(()).unwrap();

    let first_reports = timeout(Duration::from_secs(5), first.wait()).await.unwrap();
    assert_eq!(first_reports[0].scope, Scope::All);
    assert_eq!(first_reports[0].items_written, 2);

    let rerun_reports = timeout(Duration::from_secs(5), coalesced.wait()).await.unwrap();
    assert_eq!(
        rerun_reports[0].scope,
        Scope::Pending(Permission::AccessFineLocation)
    );
    assert_eq!(rerun_reports[0].items_written, 1);

    assert_eq!(
        store.get("Wi-Fi SSID", Category::Network).unwrap().subtitle(),
        Some("home")
    );

    let mut status = orchestrator.subscribe_status();
    timeout(Duration::from_secs(5), status.wait_for(|s| *s == Status::Succeeded))
        .await
        .unwrap()
        .unwrap();
}

/// Answers from `granted`, but stalls the first caller between reading the
/// flag and returning it
struct StallingChecker {
    granted: AtomicBool,
    stalled: AtomicBool,
    checked: Mutex<mpsc::Sender<()>>,
    resume: Mutex<mpsc::Receiver<()>>,
}

impl PermissionChecker for StallingChecker {
    fn has_permission(&self, _permission: Permission) -> bool {
        let granted = self.granted.load(Ordering::SeqCst);
        if !self.stalled.swap(true, Ordering::SeqCst) {
            let _ = self.checked.lock().send(());
            let _ = self.resume.lock().recv();
        }
        granted
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_grant_between_check_and_write_is_not_lost() {
    let (checked_tx, checked_rx) = mpsc::channel();
    let (resume_tx, resume_rx) = mpsc::channel();
    let checker = Arc::new(StallingChecker {
        granted: AtomicBool::new(false),
        stalled: AtomicBool::new(false),
        checked: Mutex::new(checked_tx),
        resume: Mutex::new(resume_rx),
    });

    let store = Arc::new(ItemStore::new());
    let registry = CollectorRegistry::new().with(CategoryCollector::new(
        Category::Network,
        vec![ProbeSpec::new(
            "Wi-Fi SSID",
            Requirement::permission(Permission::AccessFineLocation),
            || Ok("home".into()),
        )],
    ));
    let orchestrator = Orchestrator::new(
        Handle::current(),
        Arc::new(registry),
        Arc::clone(&store),
        AvailabilityPolicy::new(34, checker.clone()),
    );

    let first = orchestrator.full_pass();

    // The worker has read "not granted" but written nothing yet
    tokio::task::spawn_blocking(move || checked_rx.recv_timeout(Duration::from_secs(5)))
        .await
        .unwrap()
        .unwrap();
    assert!(store.get("Wi-Fi SSID", Category::Network).is_none());

    checker.granted.store(true, Ordering::SeqCst);
    let rerun =
        orchestrator.on_permission_result(PermissionGrant::granted(Permission::AccessFineLocation));
    assert_eq!(rerun.len(), 1);

    resume_tx.send(()).unwrap();

    timeout(Duration::from_secs(5), first.wait()).await.unwrap();
    let reports = timeout(Duration::from_secs(5), rerun.wait()).await.unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].items_written, 1);

    let item = store.get("Wi-Fi SSID", Category::Network).unwrap();
    assert!(!item.is_unavailable());
    assert_eq!(item.subtitle(), Some("home"));
}

#[tokio::test]
async fn test_targeted_pass_runs_one_collector() {
    let store = Arc::new(ItemStore::new());
    let registry = CollectorRegistry::new()
        .with(CategoryCollector::new(
            Category::Device,
            vec![ProbeSpec::new("Model", Requirement::NONE, || Ok("Pixel".into()))],
        ))
        .with(CategoryCollector::new(
            Category::Hardware,
            vec![ProbeSpec::new("CPU Cores", Requirement::NONE, || Ok("8".into()))],
        ));
    let orchestrator = Orchestrator::new(
        Handle::current(),
        Arc::new(registry),
        Arc::clone(&store),
        AvailabilityPolicy::new(34, Arc::new(GrantedPermissions::new())),
    );

    let reports = orchestrator.targeted_pass(Category::Hardware).wait().await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].category, Category::Hardware);

    assert!(store.get("CPU Cores", Category::Hardware).is_some());
    assert!(store.get("Model", Category::Device).is_none());
}
