//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_requests_total` (counter): requests by routing context and final status
//! - `edge_request_duration_seconds` (histogram): latency by routing context
//! - `edge_fallback_total` (counter): index documents served for missing objects

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed edge request.
pub fn record_request(context: &str, status: u16, start: Instant) {
    metrics::counter!(
        "edge_requests_total",
        "context" => context.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("edge_request_duration_seconds", "context" => context.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_fallback(context: &str) {
    metrics::counter!("edge_fallback_total", "context" => context.to_string()).increment(1);
}
