//! Boundary adapters plugged into the pool.
//!
//! # Data Flow
//! ```text
//! static_list.rs  → start_tx            (Loader, boot only)
//! http.rs         → start_tx / stop_tx  (Receiver, long-running)
//! notify_rx       → log.rs              (Notifier, long-running)
//! ```
//!
//! # Design Decisions
//! - Adapters own their faults; a failed bind ends that adapter only
//! - The pool never looks inside an adapter

pub mod http;
pub mod log;
pub mod static_list;

pub use http::HttpReceiver;
pub use log::LogNotifier;
pub use static_list::StaticLoader;
