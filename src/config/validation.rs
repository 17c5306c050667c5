//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, fail_limit >= 1)
//! - Check that addresses parse before anything binds them
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::MonitorConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} '{value}' is not a valid socket address")]
    BadAddress { field: &'static str, value: String },

    #[error("loader.hosts[{index}] is empty")]
    EmptyHost { index: usize },
}

pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.pool.interval_ms == 0 {
        errors.push(ValidationError::Zero { field: "pool.interval_ms" });
    }
    if config.pool.fail_limit == 0 {
        errors.push(ValidationError::Zero { field: "pool.fail_limit" });
    }
    if config.pool.channel_capacity == 0 {
        errors.push(ValidationError::Zero { field: "pool.channel_capacity" });
    }
    if config.probe.timeout_ms == 0 {
        errors.push(ValidationError::Zero { field: "probe.timeout_ms" });
    }
    if config.probe.default_port == 0 {
        errors.push(ValidationError::Zero { field: "probe.default_port" });
    }

    if config.receiver.enabled && config.receiver.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadAddress {
            field: "receiver.bind_address",
            value: config.receiver.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::BadAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    for (index, host) in config.loader.hosts.iter().enumerate() {
        if host.trim().is_empty() {
            errors.push(ValidationError::EmptyHost { index });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&MonitorConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = MonitorConfig::default();
        config.pool.interval_ms = 0;
        config.pool.fail_limit = 0;
        config.receiver.bind_address = ":7700".into();
        config.loader.hosts = vec!["ok.example".into(), " ".into()];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Zero { field: "pool.interval_ms" }));
        assert!(errors.contains(&ValidationError::Zero { field: "pool.fail_limit" }));
        assert!(errors.contains(&ValidationError::EmptyHost { index: 1 }));
    }

    #[test]
    fn test_disabled_sections_skip_address_checks() {
        let mut config = MonitorConfig::default();
        config.receiver.enabled = false;
        config.receiver.bind_address = "nonsense".into();
        config.observability.metrics_address = "nonsense".into();

        assert!(validate_config(&config).is_ok());
    }
}
