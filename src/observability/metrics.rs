//! Metrics collection and exposition.
//!
//! # Metrics
//! - `hostwatch_probes_total` (counter): probes by result (ok, fail)
//! - `hostwatch_transitions_total` (counter): state flips by new state
//! - `hostwatch_monitored_hosts` (gauge): registry size, stopped hosts included
//! - `hostwatch_host_down` (gauge): 1=down, 0=up, per host, set on transitions
//!
//! Without an installed recorder every call is a no-op.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_probe(ok: bool) {
    let result = if ok { "ok" } else { "fail" };
    metrics::counter!("hostwatch_probes_total", "result" => result).increment(1);
}

pub fn record_transition(host: &str, down: bool) {
    let state = if down { "down" } else { "up" };
    metrics::counter!("hostwatch_transitions_total", "state" => state).increment(1);
    metrics::gauge!("hostwatch_host_down", "host" => host.to_string()).set(if down { 1.0 } else { 0.0 });
}

pub fn set_monitored_hosts(count: usize) {
    metrics::gauge!("hostwatch_monitored_hosts").set(count as f64);
}
