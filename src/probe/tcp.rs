//! TCP connect probe.
//!
//! A host is reachable when a TCP handshake to `host:port` completes
//! within the timeout. Used in place of ICMP echo, which needs raw
//! socket privileges.

use futures_util::future::BoxFuture;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time;

use crate::probe::{Probe, ProbeError, ProbeResult};

#[derive(Debug, Clone)]
pub struct TcpProbe {
    timeout: Duration,
    default_port: u16,
}

impl TcpProbe {
    pub fn new(timeout: Duration, default_port: u16) -> Self {
        Self {
            timeout,
            default_port,
        }
    }

    /// Resolve the connect target, appending the default port when the
    /// host carries none.
    fn target(&self, host: &str) -> Result<String, ProbeError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(ProbeError::InvalidTarget("empty host".into()));
        }

        // Bracketed IPv6 with port, or name/IPv4 with a single ':'.
        if host.starts_with('[') {
            if host.contains("]:") {
                return Ok(host.to_string());
            }
            return Ok(format!("{}:{}", host, self.default_port));
        }

        match host.rsplit_once(':') {
            Some((name, port)) if !name.contains(':') => {
                port.parse::<u16>()
                    .map_err(|_| ProbeError::InvalidTarget(format!("bad port in {}", host)))?;
                Ok(host.to_string())
            }
            // Bare IPv6 literal
            Some(_) => Ok(format!("[{}]:{}", host, self.default_port)),
            None => Ok(format!("{}:{}", host, self.default_port)),
        }
    }
}

impl Probe for TcpProbe {
    fn probe<'a>(&'a self, host: &'a str) -> BoxFuture<'a, ProbeResult> {
        Box::pin(async move {
            let target = self.target(host)?;
            match time::timeout(self.timeout, TcpStream::connect(target.as_str())).await {
                Ok(Ok(_stream)) => Ok(()),
                Ok(Err(e)) => Err(ProbeError::Connect(e)),
                Err(_) => Err(ProbeError::Timeout(self.timeout)),
            }
        })
    }
}
