//! API and health endpoint handlers.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::http::server::AppState;
use crate::service::{DivisionQuery, HistoryQuery, Operation, OperationRequest, RequestError};

/// `GET /api/v1/events/{event_id}`
pub async fn event_detail(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
) -> Response {
    let Path(event_id) = match path {
        Ok(path) => path,
        Err(e) => return reject(&state, Operation::EventDetail, RequestError::InvalidPath(e.body_text())),
    };
    state
        .handler
        .handle(OperationRequest::EventDetail { event_id }, &headers)
        .await
        .into_response()
}

/// `GET /api/v1/accounts/{account}/outages`
pub async fn outage_detail(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<DivisionQuery>, QueryRejection>,
    headers: HeaderMap,
) -> Response {
    let operation = Operation::OutageDetail;
    let (Path(account), Query(query)) = match (path, query) {
        (Ok(path), Ok(query)) => (path, query),
        (Err(e), _) => return reject(&state, operation, RequestError::InvalidPath(e.body_text())),
        (_, Err(e)) => return reject(&state, operation, RequestError::InvalidQuery(e.body_text())),
    };
    state
        .handler
        .handle(
            OperationRequest::OutageDetail {
                account,
                division: query.division,
            },
            &headers,
        )
        .await
        .into_response()
}

/// `GET /api/v1/accounts/{account}/outage-history`
pub async fn outage_history(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
    headers: HeaderMap,
) -> Response {
    let operation = Operation::OutageHistory;
    let (Path(account), Query(query)) = match (path, query) {
        (Ok(path), Ok(query)) => (path, query),
        (Err(e), _) => return reject(&state, operation, RequestError::InvalidPath(e.body_text())),
        (_, Err(e)) => return reject(&state, operation, RequestError::InvalidQuery(e.body_text())),
    };
    state
        .handler
        .handle(OperationRequest::OutageHistory { account, query }, &headers)
        .await
        .into_response()
}

/// Extraction failures still get a correlation ID and a JSON body.
fn reject(state: &AppState, operation: Operation, error: RequestError) -> Response {
    let correlation_id = state.handler.correlation_id(operation);
    state
        .handler
        .reject(operation, correlation_id, error)
        .into_response()
}

/// `GET /health/live`
pub async fn liveness(State(state): State<AppState>) -> Response {
    if state.health.is_app_alive() {
        Json(json!({ "status": "UP" })).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "DOWN" }))).into_response()
    }
}

/// `GET /health/ready`
pub async fn readiness(State(state): State<AppState>) -> Response {
    if state.health.is_database_connected().await {
        Json(json!({ "status": "UP", "database": "UP" })).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "DOWN", "database": "DOWN" })),
        )
            .into_response()
    }
}
