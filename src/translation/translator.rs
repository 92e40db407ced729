//! Return-code translation.

use axum::http::StatusCode;
use serde::Serialize;

use crate::backend::BackendResult;
use crate::translation::codes::ReturnCode;

pub const NO_RECORD_FOUND: &str = r#"{"error":"No record found"}"#;
pub const BAD_REQUEST: &str = r#"{"error":"Bad request"}"#;
pub const NOT_FOUND: &str = r#"{"error":"Not found"}"#;
pub const INTERNAL_ERROR: &str = r#"{"error":"An unexpected error occurred"}"#;

/// Caller-visible classification of a translated result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutcomeKind {
    Success,
    NoContent,
    NotFound,
    BadRequest,
    ServiceUnavailable,
    InternalError,
}

impl OutcomeKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            OutcomeKind::Success => StatusCode::OK,
            OutcomeKind::NoContent => StatusCode::NO_CONTENT,
            OutcomeKind::NotFound => StatusCode::NOT_FOUND,
            OutcomeKind::BadRequest => StatusCode::BAD_REQUEST,
            OutcomeKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            OutcomeKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Result of translating one `BackendResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub kind: OutcomeKind,
    pub body: Option<String>,
    /// The classified backend code, for operator logs only.
    pub code: ReturnCode,
}

impl Translation {
    fn new(kind: OutcomeKind, body: Option<String>, code: ReturnCode) -> Self {
        Self { kind, body, code }
    }

    /// Fixed internal error, used when the pipeline itself fails.
    pub fn internal_error() -> Self {
        Self::new(
            OutcomeKind::InternalError,
            Some(INTERNAL_ERROR.to_string()),
            ReturnCode::Unrecognized(500),
        )
    }
}

/// Map a backend result to its outcome. Total and side-effect free.
pub fn translate(result: &BackendResult) -> Translation {
    let code = ReturnCode::from(result.status_code);
    let payload = result.payload.clone();

    let (kind, body) = match code {
        ReturnCode::NoRecord => {
            let body = payload
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| NO_RECORD_FOUND.to_string());
            (OutcomeKind::NotFound, Some(body))
        }
        ReturnCode::Found | ReturnCode::Ok | ReturnCode::Accepted => (OutcomeKind::Success, payload),
        ReturnCode::NoContent => (OutcomeKind::NoContent, None),
        ReturnCode::BadRequest => (
            OutcomeKind::BadRequest,
            Some(payload.unwrap_or_else(|| BAD_REQUEST.to_string())),
        ),
        ReturnCode::NotFound => (
            OutcomeKind::NotFound,
            Some(payload.unwrap_or_else(|| NOT_FOUND.to_string())),
        ),
        ReturnCode::ServiceUnavailable => (OutcomeKind::ServiceUnavailable, payload),
        ReturnCode::Unrecognized(_) => (OutcomeKind::InternalError, Some(INTERNAL_ERROR.to_string())),
    };

    Translation::new(kind, body, code)
}
