//! Fixed service-unavailable fallback.

use crate::backend::{BackendError, BackendResult};
use crate::observability::metrics;
use crate::resilience::circuit_breaker::Rejection;

/// Status code the fallback reports.
pub const FALLBACK_STATUS: i64 = 503;

/// Payload the fallback reports.
pub const FALLBACK_PAYLOAD: &str =
    r#"{"error":"Service temporarily unavailable. Please retry later."}"#;

/// Produce the fallback result for `operation`. Never fails.
pub fn service_unavailable(operation: &str, rejection: Rejection<BackendError>) -> BackendResult {
    match &rejection {
        Rejection::NotPermitted(state) => {
            tracing::info!(operation = %operation, state = %state, "Serving fallback, circuit not accepting calls");
        }
        Rejection::Failed(e) => {
            tracing::warn!(operation = %operation, error = %e, "Serving fallback after backend failure");
        }
        Rejection::Panicked(message) => {
            tracing::error!(operation = %operation, panic = %message, "Serving fallback after backend panic");
        }
    }
    metrics::record_fallback(operation, rejection.kind());

    BackendResult::new(FALLBACK_STATUS, Some(FALLBACK_PAYLOAD.to_string()))
}
