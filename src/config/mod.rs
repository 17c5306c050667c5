//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → MonitorConfig (validated, immutable)
//!     → PoolSettings stored in the pool's shared handle
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config, command-line overrides re-applied
//!     → validation.rs validates
//!     → atomic swap of the pool settings, skipped when unchanged
//!     → monitors started or restarted afterwards use the new values
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Only pool settings are reloadable; probe, receiver and observability
//!   need a restart
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_config_with, ConfigError};
pub use schema::{
    LoaderConfig, MonitorConfig, ObservabilityConfig, PoolConfig, ProbeConfig, ProbeKind,
    ReceiverConfig,
};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
