//! Backend call adapter.
//!
//! # Responsibilities
//! - Acquire a connection, run exactly one procedure round trip, release
//! - Bound the round trip with a deadline
//! - Normalize the raw result map into a `BackendResult`
//!
//! # Design Decisions
//! - No retries here; the circuit breaker decides whether a call happens at all
//! - The connection guard is dropped on every exit path

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time;

use crate::backend::error::BackendError;
use crate::backend::source::ConnectionSource;
use crate::backend::types::{BackendResult, ProcedureCall};
use crate::observability::metrics;

/// Runs procedure calls against a connection source.
#[derive(Clone)]
pub struct BackendAdapter {
    source: Arc<dyn ConnectionSource>,
    call_timeout: Duration,
}

impl BackendAdapter {
    pub fn new(source: Arc<dyn ConnectionSource>, call_timeout: Duration) -> Self {
        Self {
            source,
            call_timeout,
        }
    }

    /// Perform one round trip for `call`.
    pub async fn call(&self, call: &ProcedureCall) -> Result<BackendResult, BackendError> {
        let start = Instant::now();
        let result = self.round_trip(call).await;

        match &result {
            Ok(res) => {
                tracing::debug!(
                    correlation_id = %call.correlation_id,
                    procedure = %call.procedure,
                    return_code = res.status_code,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Procedure call completed"
                );
                metrics::record_backend_call(&call.procedure, "ok", start);
            }
            Err(e) => {
                tracing::warn!(
                    correlation_id = %call.correlation_id,
                    procedure = %call.procedure,
                    error = %e,
                    "Procedure call failed"
                );
                metrics::record_backend_call(&call.procedure, e.kind(), start);
            }
        }

        result
    }

    async fn round_trip(&self, call: &ProcedureCall) -> Result<BackendResult, BackendError> {
        let mut connection = self.source.acquire().await?;

        let raw = match time::timeout(self.call_timeout, connection.call(call)).await {
            Ok(raw) => raw?,
            Err(_) => {
                return Err(BackendError::Unavailable(format!(
                    "{} timed out after {}ms",
                    call.procedure,
                    self.call_timeout.as_millis()
                )));
            }
        };

        BackendResult::from_result_map(&raw)
    }
}
