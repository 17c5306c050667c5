//! Host monitoring core.
//!
//! # Data Flow
//! ```text
//! Loader (boot) ──┐
//!                 ├─ start_tx ─┐
//! Receiver ───────┤            ├─▶ pool.rs dispatch loop (owns registry)
//!                 └─ stop_tx ──┘        │
//!                                       ├─ new host  → spawn HostMonitor::start
//!                                       ├─ known host → spawn stop + start (restart)
//!                                       └─ stop       → HostMonitor::stop
//!
//! host.rs (one loop per host):
//!     tick → Probe → mark_up / mark_down
//!     → on state flip: notify_tx ──▶ Notifier
//! ```
//!
//! # Design Decisions
//! - Channels are bounded; a slow notifier back-pressures monitors only
//! - The registry has a single owner, so it is never locked
//! - Hysteresis needs `fail_limit` consecutive confirmations either way
//! - Contention is per host; there is no global lock

pub mod hooks;
pub mod host;
pub mod pool;
pub mod status;

pub use hooks::{Loader, Notifier, Receiver};
pub use host::HostMonitor;
pub use pool::{Pool, PoolSettings};
pub use status::HostStatus;
