//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Init logging/metrics → Start pool
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → return from main
//! ```

pub mod signals;
