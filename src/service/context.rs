//! Per-request correlation metadata.

use std::time::SystemTime;

use axum::http::HeaderMap;
use thiserror::Error;
use uuid::Uuid;

use crate::config::ServiceConfig;

pub const SESSION_ID_HEADER: &str = "x-session-id";
pub const TRANSACTION_ID_HEADER: &str = "x-transaction-id";
pub const CLIENT_ID_HEADER: &str = "x-client-id";
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Request rejected before any backend interaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Missing required header: {0}")]
    MissingHeader(&'static str),

    #[error("Invalid path parameter: {0}")]
    InvalidPath(String),

    #[error("Invalid query parameters: {0}")]
    InvalidQuery(String),
}

/// Correlation metadata owned by one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub correlation_id: String,
    pub session_id: String,
    pub transaction_id: String,
    pub client_id: String,
    pub received_at: SystemTime,
}

impl RequestContext {
    /// Build the context, requiring non-blank session, transaction and client headers.
    pub fn from_headers(headers: &HeaderMap, correlation_id: String) -> Result<Self, RequestError> {
        Ok(Self {
            session_id: required(headers, SESSION_ID_HEADER)?,
            transaction_id: required(headers, TRANSACTION_ID_HEADER)?,
            client_id: required(headers, CLIENT_ID_HEADER)?,
            correlation_id,
            received_at: SystemTime::now(),
        })
    }
}

fn required(headers: &HeaderMap, name: &'static str) -> Result<String, RequestError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(RequestError::MissingHeader(name))
}

/// Builds correlation IDs of the form
/// `{environment}.{cluster}:{host}:{operation}-{version}:{uuid}`.
#[derive(Debug, Clone)]
pub struct CorrelationIdGenerator {
    prefix: String,
    version: String,
}

impl CorrelationIdGenerator {
    pub fn new(service: &ServiceConfig) -> Self {
        Self {
            prefix: format!("{}.{}:{}", service.environment, service.cluster, service.host_tag()),
            version: service.api_version.clone(),
        }
    }

    pub fn generate(&self, operation: &str) -> String {
        format!(
            "{}:{}-{}:{}",
            self.prefix,
            operation,
            self.version,
            Uuid::new_v4().simple()
        )
    }
}
