//! Response construction.
//!
//! # Responsibilities
//! - Turn a handled request into an HTTP response
//! - Attach the correlation ID header to every API response
//! - Send bodies as JSON; 204 carries no body

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::service::{HandledRequest, CORRELATION_ID_HEADER};
use crate::translation::OutcomeKind;

impl IntoResponse for HandledRequest {
    fn into_response(self) -> Response {
        let status = self.translation.kind.status_code();
        let body = match (self.translation.kind, self.translation.body) {
            (OutcomeKind::NoContent, _) | (_, None) => None,
            (_, Some(body)) => Some(body),
        };

        let mut response = match body {
            Some(body) => {
                let mut response = Response::new(Body::from(body));
                response.headers_mut().insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
                response
            }
            None => Response::new(Body::empty()),
        };
        *response.status_mut() = status;

        if let Ok(value) = HeaderValue::from_str(&self.correlation_id) {
            response.headers_mut().insert(CORRELATION_ID_HEADER, value);
        }
        response
    }
}

/// JSON error response outside the request pipeline (admin, health).
pub fn json_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
