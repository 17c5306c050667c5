//! Per-host monitor: probing loop and UP/DOWN state machine.
//!
//! # State Transitions
//! ```text
//! UP   → DOWN: fail_limit consecutive failed probes (failures 0 → fail_limit)
//! DOWN → UP:   fail_limit consecutive successes     (failures fail_limit → 0)
//! ```
//!
//! A success while UP resets the counter to 0; a failure while DOWN clamps
//! it back to `fail_limit`. Only an actual flip emits an event.
//!
//! # Locking
//! - `running` is held for the whole of a probing loop, so at most one
//!   loop exists per monitor. A second `start` waits for the first to
//!   observe `stop` and return.
//! - Every `stop` bumps a generation counter. A loop runs only while the
//!   generation it was started under is current, and a start claimed under
//!   an older generation is skipped once it gets the `running` lock. After
//!   any burst of restarts, a single later `stop` therefore ends probing.
//! - `state` guards the mutable fields and is only held for short
//!   synchronous sections, never across a probe or a channel send, so
//!   [`HostMonitor::stop`] never blocks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::monitor::status::HostStatus;
use crate::observability::metrics;
use crate::probe::{Probe, ProbeError};

/// Floor for the tick period; tokio rejects a zero interval.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug)]
struct MonitorState {
    down: bool,
    failures: u32,
    fail_limit: u32,
    interval: Duration,
    generation: u64,
}

/// Monitors exactly one host.
pub struct HostMonitor {
    host: String,
    probe: Arc<dyn Probe>,
    notify_tx: mpsc::Sender<HostStatus>,
    running: AsyncMutex<()>,
    state: Mutex<MonitorState>,
}

impl HostMonitor {
    /// Bind a monitor to a host and its initial believed state.
    /// Probing does not begin until [`HostMonitor::start`].
    pub fn new(status: HostStatus, probe: Arc<dyn Probe>, notify_tx: mpsc::Sender<HostStatus>) -> Self {
        Self {
            host: status.host,
            probe,
            notify_tx,
            running: AsyncMutex::new(()),
            state: Mutex::new(MonitorState {
                down: status.down,
                failures: 0,
                fail_limit: 0,
                interval: Duration::ZERO,
                generation: 0,
            }),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Current believed state.
    pub fn is_down(&self) -> bool {
        self.lock_state().down
    }

    /// Tick period of the most recent `start`.
    #[cfg(test)]
    fn interval(&self) -> Duration {
        self.lock_state().interval
    }

    /// Current stop generation. Pass it to [`HostMonitor::start_as`] to
    /// have any `stop` issued from now on cancel that start.
    pub(crate) fn generation(&self) -> u64 {
        self.lock_state().generation
    }

    /// Stop the active loop and return the generation its replacement
    /// must run under.
    pub(crate) fn stop_for_restart(&self) -> u64 {
        let mut state = self.lock_state();
        state.generation += 1;
        state.generation
    }

    /// Run the probing loop until [`HostMonitor::stop`] is observed.
    ///
    /// Concurrent calls on the same monitor are serialized: a caller waits
    /// until the active loop has returned, then takes over with its own
    /// `interval` and `fail_limit`.
    pub async fn start(&self, interval: Duration, fail_limit: u32) {
        let _running = self.running.lock().await;
        let generation = self.generation();
        self.run(generation, interval, fail_limit).await;
    }

    /// Like [`HostMonitor::start`], but returns at once if the monitor was
    /// stopped or restarted again since `generation` was taken.
    pub(crate) async fn start_as(&self, generation: u64, interval: Duration, fail_limit: u32) {
        let _running = self.running.lock().await;
        if self.generation() != generation {
            tracing::debug!(host = %self.host, "Superseded start skipped");
            return;
        }
        self.run(generation, interval, fail_limit).await;
    }

    /// Probing loop proper. The caller holds `running`.
    async fn run(&self, generation: u64, interval: Duration, fail_limit: u32) {
        let period = interval.max(MIN_INTERVAL);
        let fail_limit = fail_limit.max(1);
        {
            let mut state = self.lock_state();
            state.interval = period;
            state.fail_limit = fail_limit;
            // A host registered DOWN needs a full recovery streak; a
            // restarted monitor keeps its streak, clamped to the new limit.
            state.failures = if state.down && state.failures == 0 {
                fail_limit
            } else {
                state.failures.min(fail_limit)
            };
        }

        tracing::debug!(host = %self.host, interval = ?period, fail_limit, "Monitor loop starting");

        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if self.generation() != generation {
                break;
            }

            let event = match self.probe.probe(&self.host).await {
                Ok(()) => {
                    metrics::record_probe(true);
                    self.mark_up()
                }
                Err(e) => {
                    metrics::record_probe(false);
                    tracing::debug!(host = %self.host, error = %e, "Probe failed");
                    self.mark_down(&e)
                }
            };

            if let Some(event) = event {
                self.emit(event).await;
            }
        }

        tracing::debug!(host = %self.host, "Monitor loop stopped");
    }

    /// Ask the running loop to exit at its next tick. Idempotent; an
    /// in-flight probe is allowed to finish. Also cancels any start still
    /// waiting on a claimed generation.
    pub fn stop(&self) {
        self.lock_state().generation += 1;
    }

    /// Record a successful probe. Returns the UP event on a DOWN → UP flip.
    fn mark_up(&self) -> Option<HostStatus> {
        let mut state = self.lock_state();
        if !state.down {
            state.failures = 0;
            return None;
        }

        state.failures = state.failures.saturating_sub(1);
        if state.failures > 0 {
            return None;
        }

        state.down = false;
        tracing::info!(host = %self.host, "Host is UP");
        Some(HostStatus::up(self.host.clone()))
    }

    /// Record a failed probe. Returns the DOWN event on an UP → DOWN flip.
    fn mark_down(&self, error: &ProbeError) -> Option<HostStatus> {
        let mut state = self.lock_state();
        if state.down {
            state.failures = state.fail_limit;
            return None;
        }

        state.failures += 1;
        if state.failures < state.fail_limit {
            return None;
        }

        state.down = true;
        tracing::warn!(host = %self.host, error = %error, "Host is DOWN");
        Some(HostStatus::down(self.host.clone()).with_reason(error.reason()))
    }

    /// Push a transition downstream. Suspends while the notify channel is full.
    async fn emit(&self, event: HostStatus) {
        metrics::record_transition(&event.host, event.down);
        if self.notify_tx.send(event).await.is_err() {
            tracing::debug!(host = %self.host, "No notifier attached, transition dropped");
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, MonitorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
