//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rest_router_requests_total` (counter): requests by method, status, operation
//! - `rest_router_request_duration_seconds` (histogram): dispatch latency
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - The `operation` label is the dotted operation key (`none` when unmatched)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter, serving scrapes on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one dispatched request.
pub fn record_request(method: &str, status: u16, operation: &str, start_time: Instant) {
    metrics::counter!(
        "rest_router_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "operation" => operation.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "rest_router_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "operation" => operation.to_string()
    )
    .record(start_time.elapsed().as_secs_f64());
}
