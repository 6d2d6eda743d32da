//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): relayed requests by outcome
//! - `relay_request_duration_seconds` (histogram): end-to-end latency by outcome
//! - `relay_upstream_responses_total` (counter): aggregator answers by status
//! - `relay_inbound_timeouts_total` (counter): requests cut off by the inbound deadline
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   exporter every call is a no-op
//! - Prometheus exporter only runs when enabled in configuration

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one finished inbound request.
pub fn record_request(outcome: &'static str, start_time: Instant) {
    counter!("relay_requests_total", "outcome" => outcome).increment(1);
    histogram!("relay_request_duration_seconds", "outcome" => outcome)
        .record(start_time.elapsed().as_secs_f64());
}

/// Record the status code the aggregator answered with.
pub fn record_upstream_status(status: u16) {
    counter!("relay_upstream_responses_total", "status" => status.to_string()).increment(1);
}

/// Record a request cut off by the inbound deadline.
pub fn record_request_timeout() {
    counter!("relay_inbound_timeouts_total").increment(1);
}
