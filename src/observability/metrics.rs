//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, service
//!   (`unresolved` for requests that never reached a registered service)
//! - `gateway_request_duration_seconds` (histogram): end-to-end latency by service
//! - `gateway_quota_rejections_total` (counter)
//! - `gateway_registry_failures_total` (counter)
//! - `gateway_upstream_failures_total` (counter): transport failures by service

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, service: &str, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "service" => service.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_quota_rejection() {
    counter!("gateway_quota_rejections_total").increment(1);
}

pub fn record_registry_failure() {
    counter!("gateway_registry_failures_total").increment(1);
}

pub fn record_upstream_failure(service: &str) {
    counter!("gateway_upstream_failures_total", "service" => service.to_string()).increment(1);
}
