//! Battery status events.
//!
//! A [`BatteryListener`] handles exactly one [`BatteryEvent`]: it probes the
//! battery, writes the "Battery" hardware item and acknowledges the event.
//! The acknowledgment is sent even when nothing could be read.

use std::sync::Arc;

use log::{debug, error, warn};
use tokio::runtime::Handle;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};

use super::item::{Category, Chart, ChartIcon, Item, Reading};
use super::store::ItemStore;
use crate::platform::{BatteryStatus, ChargeSource, Platform};

pub const BATTERY_TITLE: &str = "Battery";

/// How often the monitor looks at the battery
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// How handling an event ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Upserted,
    NoItem,
}

/// A battery-status-changed notification awaiting acknowledgment
#[derive(Debug)]
pub struct BatteryEvent {
    completion: Option<oneshot::Sender<EventOutcome>>,
}

impl BatteryEvent {
    /// New event and the receiver its acknowledgment arrives on
    pub fn new() -> (Self, oneshot::Receiver<EventOutcome>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                completion: Some(tx),
            },
            rx,
        )
    }

    fn complete(mut self, outcome: EventOutcome) {
        if let Some(tx) = self.completion.take() {
            let _ = tx.send(outcome);
        }
    }
}

impl Drop for BatteryEvent {
    fn drop(&mut self) {
        // Dropped unhandled: still release the event source
        if let Some(tx) = self.completion.take() {
            let _ = tx.send(EventOutcome::NoItem);
        }
    }
}

/// "85%, Charging (AC)"
pub fn battery_item(status: &BatteryStatus) -> Item {
    let percent = status.percent.clamp(0.0, 100.0).round() as u64;
    let subtitle = match status.source {
        ChargeSource::Unknown => format!("{}%, {}", percent, status.state),
        source => format!("{}%, {} ({})", percent, status.state, source),
    };
    Item::resolved(
        BATTERY_TITLE,
        Category::Hardware,
        Reading::with_chart(subtitle, Chart::new(percent, 100, ChartIcon::Battery)),
    )
}

/// One-shot handler for a single battery event
pub struct BatteryListener {
    store: Arc<ItemStore>,
    platform: Arc<dyn Platform>,
}

impl BatteryListener {
    pub fn new(store: Arc<ItemStore>, platform: Arc<dyn Platform>) -> Self {
        Self { store, platform }
    }

    /// Probe, upsert and acknowledge. Consumes the listener.
    pub async fn handle(self, event: BatteryEvent) -> EventOutcome {
        let platform = Arc::clone(&self.platform);
        let probed = tokio::task::spawn_blocking(move || platform.battery()).await;

        let outcome = match probed {
            Ok(Ok(status)) if status.percent.is_finite() => {
                self.store.upsert(battery_item(&status));
                EventOutcome::Upserted
            }
            Ok(Ok(status)) => {
                warn!("Battery reported an invalid charge level: {}", status.percent);
                EventOutcome::NoItem
            }
            Ok(Err(e)) => {
                warn!("Battery probe failed: {}", e);
                EventOutcome::NoItem
            }
            Err(e) => {
                error!("Battery probe aborted: {}", e);
                EventOutcome::NoItem
            }
        };

        event.complete(outcome);
        outcome
    }
}

impl std::fmt::Debug for BatteryListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatteryListener").finish_non_exhaustive()
    }
}

/// Observed state the monitor compares between polls
fn fingerprint(status: &BatteryStatus) -> (u64, String, String) {
    (
        status.percent.round() as u64,
        status.state.to_string(),
        status.source.to_string(),
    )
}

/// Poll the battery and feed every observed change to a fresh listener.
///
/// Each event is acknowledged before the next poll. Stops on `shutdown`.
pub fn spawn_battery_monitor(
    runtime: &Handle,
    store: Arc<ItemStore>,
    platform: Arc<dyn Platform>,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        let mut ticker = interval(POLL_INTERVAL);
        let mut last_seen = None;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let probe_platform = Arc::clone(&platform);
                    let observed = tokio::task::spawn_blocking(move || probe_platform.battery().ok())
                        .await
                        .ok()
                        .flatten();

                    let Some(status) = observed else {
                        continue;
                    };
                    let current = fingerprint(&status);
                    if last_seen.as_ref() == Some(&current) {
                        continue;
                    }
                    last_seen = Some(current);

                    debug!("Battery changed: {}% {}", status.percent.round(), status.state);
                    let (event, ack) = BatteryEvent::new();
                    let listener = BatteryListener::new(Arc::clone(&store), Arc::clone(&platform));
                    listener.handle(event).await;
                    let _ = ack.await;
                }
                _ = shutdown.recv() => {
                    debug!("Battery monitor shutting down");
                    break;
                }
            }
        }
    })
}
