//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Monitors and dispatch loop produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout log lines
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
