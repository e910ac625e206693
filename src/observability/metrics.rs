//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, status
//! - `http_request_duration_seconds` (histogram): latency distribution
//! - `http_slow_requests_total` (counter): requests over the slow threshold
//! - `http_unmatched_routes_total` (counter): requests no route handled
//!
//! Recording is a no-op until a recorder is installed, so the pipeline calls
//! these unconditionally.

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, elapsed: Duration) {
    let method = method.to_string();
    let status = status.to_string();
    counter!("http_requests_total", "method" => method.clone(), "status" => status.clone())
        .increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "status" => status)
        .record(elapsed.as_secs_f64());
}

pub fn record_slow_request(method: &str) {
    counter!("http_slow_requests_total", "method" => method.to_string()).increment(1);
}

pub fn record_unmatched_route() {
    counter!("http_unmatched_routes_total").increment(1);
}
