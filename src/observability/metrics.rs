//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by operation, status
//! - `gateway_request_duration_seconds` (histogram): latency by operation
//! - `gateway_backend_calls_total` (counter): procedure calls by result
//! - `gateway_fallbacks_total` (counter): fallbacks by operation, cause
//! - `gateway_circuit_state` (gauge): 0=closed, 1=half-open, 2=open
//!
//! Without an installed recorder every call here is a no-op, which is what
//! unit tests rely on.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resilience::CircuitState;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(operation: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "operation" => operation.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_backend_call(procedure: &str, result: &'static str, start: Instant) {
    counter!(
        "gateway_backend_calls_total",
        "procedure" => procedure.to_string(),
        "result" => result
    )
    .increment(1);
    histogram!("gateway_backend_call_duration_seconds", "procedure" => procedure.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_fallback(operation: &str, cause: &'static str) {
    counter!(
        "gateway_fallbacks_total",
        "operation" => operation.to_string(),
        "cause" => cause
    )
    .increment(1);
}

pub fn record_circuit_state(operation: &str, state: CircuitState) {
    let value = match state {
        CircuitState::Closed => 0.0,
        CircuitState::HalfOpen => 1.0,
        CircuitState::Open => 2.0,
    };
    gauge!("gateway_circuit_state", "operation" => operation.to_string()).set(value);
}
