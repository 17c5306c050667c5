//! Host liveness monitoring engine.
//!
//! Probes a dynamic set of hosts on independent schedules, debounces the
//! results with a fail-limit hysteresis and emits UP/DOWN transitions to
//! a pluggable notifier.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌────────────┐  start   ┌──────────────────────┐
//!   │  Loader    │─────────▶│                      │   one task per host
//!   └────────────┘          │   Pool dispatch      │──────────────────────┐
//!   ┌────────────┐  start/  │   (owns registry)    │                      ▼
//!   │  Receiver  │─────────▶│                      │   ┌──────────────────────────┐
//!   └────────────┘  stop    └──────────────────────┘   │ HostMonitor              │
//!                                                      │  tick → Probe → hysteresis│
//!   ┌────────────┐         notify (bounded)            └────────────┬─────────────┘
//!   │  Notifier  │◀─────────────────────────────────────────────────┘
//!   └────────────┘
//! ```
//!
//! The core lives in [`monitor`]; [`probe`] and [`adapters`] hold the
//! pluggable collaborators shipped with the daemon.

// Core
pub mod monitor;
pub mod probe;

// Collaborators
pub mod adapters;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::MonitorConfig;
pub use monitor::{HostMonitor, HostStatus, Pool, PoolSettings};
pub use probe::{Probe, ProbeError};
