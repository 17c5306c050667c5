//! Shared utilities for pool integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;

use hostwatch::adapters::StaticLoader;
use hostwatch::monitor::{Notifier, Receiver};
use hostwatch::{HostStatus, Pool, PoolSettings, Probe, ProbeError};

/// Handles to drive a running pool from a test.
pub struct TestPool {
    pub start_tx: mpsc::Sender<HostStatus>,
    pub stop_tx: mpsc::Sender<HostStatus>,
    pub events: mpsc::Receiver<HostStatus>,
}

/// Receiver forwarding whatever the test pushes into the pool's channels.
pub fn forwarding_receiver(
    mut start_fw: mpsc::Receiver<HostStatus>,
    mut stop_fw: mpsc::Receiver<HostStatus>,
) -> impl Receiver {
    move |start_tx: mpsc::Sender<HostStatus>, stop_tx: mpsc::Sender<HostStatus>| async move {
        loop {
            tokio::select! {
                Some(s) = start_fw.recv() => {
                    if start_tx.send(s).await.is_err() { break; }
                }
                Some(s) = stop_fw.recv() => {
                    if stop_tx.send(s).await.is_err() { break; }
                }
                else => break,
            }
        }
    }
}

/// Notifier forwarding every pool event to the test.
pub fn forwarding_notifier(notify_fw: mpsc::Sender<HostStatus>) -> impl Notifier {
    move |mut notify_rx: mpsc::Receiver<HostStatus>| async move {
        while let Some(event) = notify_rx.recv().await {
            if notify_fw.send(event).await.is_err() {
                break;
            }
        }
    }
}

/// Start a pool with a boot list, a forwarding receiver and notifier.
pub fn start_test_pool(
    probe: Arc<dyn Probe>,
    load: Vec<HostStatus>,
    tick: Duration,
    fail_limit: u32,
) -> TestPool {
    let (start_tx, start_fw) = mpsc::channel(16);
    let (stop_tx, stop_fw) = mpsc::channel(16);
    let (notify_fw, events) = mpsc::channel(16);

    let settings = PoolSettings {
        interval: tick,
        fail_limit,
        channel_capacity: 10,
    };

    Pool::new(settings, probe)
        .with_loader(StaticLoader::from_statuses(load))
        .with_receiver(forwarding_receiver(start_fw, stop_fw))
        .with_notifier(forwarding_notifier(notify_fw))
        .start();

    TestPool {
        start_tx,
        stop_tx,
        events,
    }
}

/// Wait for the next event, failing the test if none arrives in time.
pub async fn next_event(events: &mut mpsc::Receiver<HostStatus>) -> HostStatus {
    time::timeout(Duration::from_secs(3), events.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event stream closed")
}

/// Assert that no event arrives within `wait`.
pub async fn assert_no_event(events: &mut mpsc::Receiver<HostStatus>, wait: Duration) {
    if let Ok(Some(event)) = time::timeout(wait, events.recv()).await {
        panic!("unexpected event: {:?}", event);
    }
}

/// Probe that fails every call after holding it for `hold`, recording the
/// highest number of concurrent calls seen.
#[derive(Default)]
pub struct InFlightProbe {
    pub hold: Duration,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub calls: AtomicUsize,
}

impl InFlightProbe {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            ..Default::default()
        }
    }
}

impl Probe for InFlightProbe {
    fn probe<'a>(&'a self, _host: &'a str) -> futures_util::future::BoxFuture<'a, Result<(), ProbeError>> {
        Box::pin(async move {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            time::sleep(self.hold).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Err(ProbeError::Status(500))
        })
    }
}
