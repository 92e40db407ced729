//! Request handling pipeline.
//!
//! # Responsibilities
//! - Generate the correlation ID
//! - Validate correlation headers before any backend interaction
//! - Run the backend call through the operation's circuit breaker
//! - Translate the result and record request metrics
//!
//! # Design Decisions
//! - The guarded call runs on its own task so a disconnecting caller does not
//!   cancel the backend round trip
//! - A backend panic is a breaker failure (fallback 503); a panic anywhere
//!   else in the task surfaces as a JoinError and becomes a 500
//! - Every path ends in a `Translation`; nothing raw reaches the caller

use std::sync::Arc;
use std::time::Instant;

use axum::http::HeaderMap;

use crate::backend::{BackendAdapter, ProcedureCall};
use crate::config::ServiceConfig;
use crate::observability::metrics;
use crate::resilience::{fallback, CircuitBreakerRegistry};
use crate::service::context::{CorrelationIdGenerator, RequestContext, RequestError};
use crate::service::operations::{Operation, OperationRequest};
use crate::translation::{translate, OutcomeKind, ReturnCode, Translation};

/// Final outcome of one handled request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandledRequest {
    pub correlation_id: String,
    pub translation: Translation,
}

/// Orchestrates validation, the guarded backend call and translation.
pub struct RequestHandler {
    adapter: BackendAdapter,
    breakers: Arc<CircuitBreakerRegistry>,
    ids: CorrelationIdGenerator,
    environment: String,
    output_table: String,
}

impl RequestHandler {
    pub fn new(
        adapter: BackendAdapter,
        breakers: Arc<CircuitBreakerRegistry>,
        service: &ServiceConfig,
    ) -> Self {
        Self {
            adapter,
            breakers,
            ids: CorrelationIdGenerator::new(service),
            environment: service.environment.clone(),
            output_table: service.query_output_table.clone(),
        }
    }

    /// Handle one request end to end.
    pub async fn handle(self: &Arc<Self>, request: OperationRequest, headers: &HeaderMap) -> HandledRequest {
        let operation = request.operation();
        let correlation_id = self.ids.generate(operation.name());

        let context = match RequestContext::from_headers(headers, correlation_id.clone()) {
            Ok(context) => context,
            Err(e) => return self.reject(operation, correlation_id, e),
        };

        let start = Instant::now();
        tracing::debug!(
            correlation_id = %correlation_id,
            operation = operation.name(),
            session_id = %context.session_id,
            transaction_id = %context.transaction_id,
            client_id = %context.client_id,
            "Handling request"
        );

        let this = Arc::clone(self);
        let task = tokio::spawn(async move { this.run(operation, request, context).await });

        let translation = match task.await {
            Ok(translation) => translation,
            Err(e) => {
                tracing::error!(
                    correlation_id = %correlation_id,
                    operation = operation.name(),
                    error = %e,
                    "Request pipeline aborted"
                );
                Translation::internal_error()
            }
        };

        metrics::record_request(operation.name(), translation.kind.status_code().as_u16(), start);
        HandledRequest {
            correlation_id,
            translation,
        }
    }

    /// Reject a request that never reached the pipeline.
    pub fn reject(&self, operation: Operation, correlation_id: String, error: RequestError) -> HandledRequest {
        tracing::warn!(
            correlation_id = %correlation_id,
            operation = operation.name(),
            error = %error,
            "Rejecting request"
        );
        metrics::record_request(operation.name(), OutcomeKind::BadRequest.status_code().as_u16(), Instant::now());

        let body = serde_json::json!({ "error": error.to_string() }).to_string();
        HandledRequest {
            correlation_id,
            translation: Translation {
                kind: OutcomeKind::BadRequest,
                body: Some(body),
                code: ReturnCode::BadRequest,
            },
        }
    }

    /// Correlation ID for a request rejected before `handle`.
    pub fn correlation_id(&self, operation: Operation) -> String {
        self.ids.generate(operation.name())
    }

    async fn run(&self, operation: Operation, request: OperationRequest, context: RequestContext) -> Translation {
        let call = ProcedureCall {
            procedure: operation.procedure().to_string(),
            environment: self.environment.clone(),
            correlation_id: context.correlation_id.clone(),
            requested_at: context.received_at,
            session_id: context.session_id,
            transaction_id: context.transaction_id,
            client_id: context.client_id,
            args: request.args(),
            output_table: self.output_table.clone(),
        };

        let breaker = self.breakers.get(operation.name());
        let result = breaker
            .execute(
                || self.adapter.call(&call),
                |rejection| fallback::service_unavailable(operation.name(), rejection),
            )
            .await;

        let translation = translate(&result);
        match translation.code {
            ReturnCode::Unrecognized(code) => {
                tracing::error!(
                    correlation_id = %call.correlation_id,
                    operation = operation.name(),
                    return_code = code,
                    "Unrecognized return code from backend"
                );
            }
            code if code.is_legacy() => {
                tracing::debug!(
                    correlation_id = %call.correlation_id,
                    return_code = result.status_code,
                    "Legacy return code"
                );
            }
            _ => {}
        }
        translation
    }
}
