//! Host status value shared by requests and events.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A host identifier together with its (requested or confirmed) state.
///
/// On the start/stop channels `down` is the state a newly registered host
/// is assumed to be in. On the notify channel it reports a confirmed
/// transition, and `reason` carries the probe failure that caused a DOWN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostStatus {
    /// Hostname, IP or URL, depending on the probe backend.
    pub host: String,
    /// Believed (or requested) state.
    pub down: bool,
    /// Failure detail, only present on DOWN events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl HostStatus {
    /// A host believed reachable.
    pub fn up(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            down: false,
            reason: None,
        }
    }

    /// A host believed unreachable, with no failure detail.
    pub fn down(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            down: true,
            reason: None,
        }
    }

    /// Attach a failure detail.
    pub fn with_reason(mut self, reason: Option<String>) -> Self {
        self.reason = reason;
        self
    }

    pub fn state_label(&self) -> &'static str {
        if self.down {
            "DOWN"
        } else {
            "UP"
        }
    }
}

impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host {} is {}", self.host, self.state_label())?;
        if let Some(reason) = &self.reason {
            write!(f, " ({})", reason)?;
        }
        Ok(())
    }
}
