//! Monitoring pool: host registry and request dispatch.
//!
//! # Responsibilities
//! - Provision the start/stop/notify channels
//! - Spawn the loader, receiver and notifier collaborators
//! - Create, restart and stop host monitors from a single dispatch task
//!
//! # Design Decisions
//! - The registry is owned by the dispatch task alone, so it needs no lock
//! - Restarts run on their own task; dispatch never waits on a monitor
//! - Stopped monitors stay registered and are reused on the next start
//! - Start generations are claimed on the dispatch task, so a stop handled
//!   after a start request always applies to that start, even if the
//!   spawned start has not reached the monitor yet
//! - The dispatch loop never stops while any producer handle is alive. Once
//!   the loader, the receiver and every other sender have dropped their
//!   handles, no request can arrive and the loop returns; monitors already
//!   running keep probing on their own tasks

use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::PoolConfig;
use crate::monitor::hooks::{Loader, Notifier, Receiver};
use crate::monitor::host::HostMonitor;
use crate::monitor::status::HostStatus;
use crate::observability::metrics;
use crate::probe::Probe;

/// Monitoring parameters, read once per monitor start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    /// Time between two probes of the same host.
    pub interval: Duration,
    /// Consecutive confirmations needed to flip a host's state.
    pub fail_limit: u32,
    /// Capacity of each internal channel.
    pub channel_capacity: usize,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            fail_limit: 4,
            channel_capacity: 10,
        }
    }
}

impl From<&PoolConfig> for PoolSettings {
    fn from(config: &PoolConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.interval_ms),
            fail_limit: config.fail_limit,
            channel_capacity: config.channel_capacity,
        }
    }
}

/// The monitoring engine.
pub struct Pool {
    settings: Arc<ArcSwap<PoolSettings>>,
    probe: Arc<dyn Probe>,
    loader: Option<Box<dyn Loader>>,
    receiver: Option<Box<dyn Receiver>>,
    notifier: Option<Box<dyn Notifier>>,
}

impl Pool {
    pub fn new(settings: PoolSettings, probe: Arc<dyn Probe>) -> Self {
        Self {
            settings: Arc::new(ArcSwap::from_pointee(settings)),
            probe,
            loader: None,
            receiver: None,
            notifier: None,
        }
    }

    pub fn with_loader(mut self, loader: impl Loader) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    pub fn with_receiver(mut self, receiver: impl Receiver) -> Self {
        self.receiver = Some(Box::new(receiver));
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    /// Shared settings. Storing new settings affects monitors started or
    /// restarted afterwards; running loops keep their snapshot.
    pub fn settings_handle(&self) -> Arc<ArcSwap<PoolSettings>> {
        self.settings.clone()
    }

    /// Spawn the collaborators and the dispatch loop. Returns immediately
    /// with the dispatch task's handle. Must be called inside a tokio
    /// runtime.
    pub fn start(self) -> JoinHandle<()> {
        let capacity = self.settings.load().channel_capacity.max(1);
        let (start_tx, start_rx) = mpsc::channel(capacity);
        let (stop_tx, stop_rx) = mpsc::channel(capacity);
        let (notify_tx, notify_rx) = mpsc::channel(capacity);

        if let Some(loader) = self.loader {
            tokio::spawn(loader.load(start_tx.clone()));
        }

        match self.notifier {
            Some(notifier) => {
                tokio::spawn(notifier.notify(notify_rx));
            }
            None => drop(notify_rx),
        }

        if let Some(receiver) = self.receiver {
            tokio::spawn(receiver.receive(start_tx.clone(), stop_tx.clone()));
        }

        // Only collaborators hold producer handles from here on.
        drop(start_tx);
        drop(stop_tx);

        let dispatcher = Dispatcher::new(self.settings, self.probe, notify_tx);
        tokio::spawn(dispatcher.run(start_rx, stop_rx))
    }
}

/// Sole owner of the host registry.
pub(crate) struct Dispatcher {
    settings: Arc<ArcSwap<PoolSettings>>,
    probe: Arc<dyn Probe>,
    notify_tx: mpsc::Sender<HostStatus>,
    registry: HashMap<String, Arc<HostMonitor>>,
}

impl Dispatcher {
    pub(crate) fn new(
        settings: Arc<ArcSwap<PoolSettings>>,
        probe: Arc<dyn Probe>,
        notify_tx: mpsc::Sender<HostStatus>,
    ) -> Self {
        Self {
            settings,
            probe,
            notify_tx,
            registry: HashMap::new(),
        }
    }

    pub(crate) async fn run(
        mut self,
        mut start_rx: mpsc::Receiver<HostStatus>,
        mut stop_rx: mpsc::Receiver<HostStatus>,
    ) {
        tracing::info!("Dispatch loop starting");

        loop {
            tokio::select! {
                Some(status) = start_rx.recv() => self.handle_start(status),
                Some(status) = stop_rx.recv() => self.handle_stop(&status),
                else => break,
            }
        }

        // Every producer is gone; no request can arrive any more.
        tracing::info!(hosts = self.registry.len(), "All request producers closed, dispatch loop exiting");
    }

    pub(crate) fn handle_start(&mut self, status: HostStatus) {
        let settings = **self.settings.load();

        if let Some(monitor) = self.registry.get(&status.host) {
            tracing::info!(host = %status.host, "RESTART monitoring");
            let generation = monitor.stop_for_restart();
            let monitor = monitor.clone();
            tokio::spawn(async move {
                monitor
                    .start_as(generation, settings.interval, settings.fail_limit)
                    .await;
            });
            return;
        }

        tracing::info!(host = %status.host, down = status.down, "NEW host");
        let monitor = Arc::new(HostMonitor::new(
            status,
            self.probe.clone(),
            self.notify_tx.clone(),
        ));
        self.registry.insert(monitor.host().to_string(), monitor.clone());
        metrics::set_monitored_hosts(self.registry.len());

        let generation = monitor.generation();
        tokio::spawn(async move {
            monitor
                .start_as(generation, settings.interval, settings.fail_limit)
                .await;
        });
    }

    pub(crate) fn handle_stop(&mut self, status: &HostStatus) {
        match self.registry.get(&status.host) {
            Some(monitor) => {
                tracing::info!(host = %status.host, "STOP monitoring");
                monitor.stop();
            }
            None => {
                tracing::warn!(host = %status.host, "Stop requested for unknown host");
            }
        }
    }

    #[cfg(test)]
    fn monitor(&self, host: &str) -> Option<&Arc<HostMonitor>> {
        self.registry.get(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ScriptedProbe;
    use tokio::time;

    const TICK: Duration = Duration::from_millis(10);

    fn dispatcher(probe: Arc<ScriptedProbe>) -> (Dispatcher, mpsc::Receiver<HostStatus>) {
        let settings = PoolSettings {
            interval: TICK,
            fail_limit: 2,
            channel_capacity: 10,
        };
        let (notify_tx, notify_rx) = mpsc::channel(10);
        let dispatcher = Dispatcher::new(Arc::new(ArcSwap::from_pointee(settings)), probe, notify_tx);
        (dispatcher, notify_rx)
    }

    #[test]
    fn test_settings_from_config() {
        let config = PoolConfig {
            interval_ms: 250,
            fail_limit: 3,
            channel_capacity: 20,
        };
        let settings = PoolSettings::from(&config);
        assert_eq!(settings.interval, Duration::from_millis(250));
        assert_eq!(settings.fail_limit, 3);
        assert_eq!(settings.channel_capacity, 20);
    }

    #[tokio::test]
    async fn test_repeated_start_reuses_monitor() {
        let (mut d, _rx) = dispatcher(Arc::new(ScriptedProbe::new()));

        d.handle_start(HostStatus::up("h1"));
        let first = d.monitor("h1").unwrap().clone();

        d.handle_start(HostStatus::down("h1"));
        assert_eq!(d.registry.len(), 1);
        assert!(Arc::ptr_eq(&first, d.monitor("h1").unwrap()));
        // A restart keeps the believed state of the existing monitor.
        assert!(!first.is_down());

        first.stop();
    }

    #[tokio::test]
    async fn test_stopped_host_stays_registered() {
        let probe = Arc::new(ScriptedProbe::new());
        let (mut d, _rx) = dispatcher(probe.clone());

        d.handle_start(HostStatus::up("h1"));
        d.handle_stop(&HostStatus::up("h1"));
        time::sleep(TICK * 3).await;

        // The stop lands before the spawned start and still wins.
        assert_eq!(probe.calls("h1"), 0);

        // Never evicted; the idle monitor is kept for a cheap restart.
        assert_eq!(d.registry.len(), 1);

        let calls = probe.calls("h1");
        time::sleep(TICK * 3).await;
        assert_eq!(probe.calls("h1"), calls);

        d.handle_start(HostStatus::up("h1"));
        time::sleep(TICK * 4).await;
        assert!(probe.calls("h1") > calls);
        assert_eq!(d.registry.len(), 1);

        d.handle_stop(&HostStatus::up("h1"));
    }

    #[tokio::test]
    async fn test_single_stop_after_restart_burst() {
        let probe = Arc::new(ScriptedProbe::new());
        probe.script("h1", &[true; 200]);
        let (mut d, _rx) = dispatcher(probe.clone());

        d.handle_start(HostStatus::up("h1"));
        d.handle_start(HostStatus::up("h1"));
        d.handle_start(HostStatus::up("h1"));
        time::sleep(TICK * 4).await;
        assert!(probe.calls("h1") > 0);

        d.handle_stop(&HostStatus::up("h1"));
        time::sleep(TICK * 3).await;
        let calls = probe.calls("h1");
        time::sleep(TICK * 5).await;
        assert_eq!(probe.calls("h1"), calls);
    }

    #[tokio::test]
    async fn test_unknown_stop_is_ignored() {
        let (mut d, _rx) = dispatcher(Arc::new(ScriptedProbe::new()));
        d.handle_stop(&HostStatus::up("ghost"));
        assert!(d.registry.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_exits_when_producers_close() {
        let (d, _rx) = dispatcher(Arc::new(ScriptedProbe::new()));
        let (start_tx, start_rx) = mpsc::channel(1);
        let (stop_tx, stop_rx) = mpsc::channel(1);

        let handle = tokio::spawn(d.run(start_rx, stop_rx));
        start_tx.send(HostStatus::up("h1")).await.unwrap();
        drop(start_tx);
        drop(stop_tx);

        time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("dispatch loop returns")
            .unwrap();
    }

    #[tokio::test]
    async fn test_settings_change_applies_on_restart() {
        let probe = Arc::new(ScriptedProbe::new());
        let (mut d, _rx) = dispatcher(probe.clone());
        let handle = d.settings.clone();

        d.handle_start(HostStatus::up("h1"));
        handle.store(Arc::new(PoolSettings {
            interval: Duration::from_secs(60),
            fail_limit: 2,
            channel_capacity: 10,
        }));
        d.handle_start(HostStatus::up("h1"));

        // Let the old loop observe stop and the new one take over.
        time::sleep(TICK * 3).await;
        let calls = probe.calls("h1");
        time::sleep(TICK * 5).await;
        assert_eq!(probe.calls("h1"), calls, "restarted loop ticks every 60s");

        d.handle_stop(&HostStatus::up("h1"));
    }
}
