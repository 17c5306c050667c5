//! Reachability probes.
//!
//! # Data Flow
//! ```text
//! HostMonitor tick
//!     → Probe::probe(host)   (bounded by the probe's own timeout)
//!     → Ok(())               host answered
//!     → Err(ProbeError)      host unreachable, error carries the reason
//! ```
//!
//! # Design Decisions
//! - Probes are injected into the pool as `Arc<dyn Probe>`, never global
//! - A probe never retries; the monitor's failure counter smooths results
//! - Each implementation enforces its own timeout
//! - Plain async closures are probes too

pub mod http;
pub mod scripted;
pub mod tcp;

use futures_util::future::BoxFuture;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

pub use http::HttpProbe;
pub use scripted::ScriptedProbe;
pub use tcp::TcpProbe;

/// Why a probe considered a host unreachable.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The probe did not complete in time.
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),

    /// Connection could not be established.
    #[error("connection failed: {0}")]
    Connect(#[from] std::io::Error),

    /// The host answered with an unexpected status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// The host identifier cannot be probed by this backend.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// Transport-level request failure.
    #[error("request failed: {0}")]
    Request(String),

    /// Unreachable, with no further detail.
    #[error("unreachable")]
    Unreachable,
}

impl ProbeError {
    /// Failure detail to forward on a DOWN event, if the probe supplied one.
    pub fn reason(&self) -> Option<String> {
        match self {
            ProbeError::Unreachable => None,
            other => Some(other.to_string()),
        }
    }
}

/// Result of a single probe: `Ok(())` means reachable.
pub type ProbeResult = Result<(), ProbeError>;

/// A single reachability check against a host.
pub trait Probe: Send + Sync + 'static {
    fn probe<'a>(&'a self, host: &'a str) -> BoxFuture<'a, ProbeResult>;
}

impl<F, Fut> Probe for F
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ProbeResult> + Send + 'static,
{
    fn probe<'a>(&'a self, host: &'a str) -> BoxFuture<'a, ProbeResult> {
        Box::pin(self(host.to_string()))
    }
}
