//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::MonitorConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<MonitorConfig, ConfigError> {
    load_config_with(path, |_| {})
}

/// Load a TOML file, let `adjust` patch it (command-line overrides), then
/// validate the patched result.
pub fn load_config_with<F>(path: &Path, adjust: F) -> Result<MonitorConfig, ConfigError>
where
    F: FnOnce(&mut MonitorConfig),
{
    let content = fs::read_to_string(path)?;
    let mut config: MonitorConfig = toml::from_str(&content)?;
    adjust(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
