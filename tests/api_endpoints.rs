//! End-to-end tests for the outage endpoints and health probes.

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{bare_get, get, router, send, Reply, ScriptedSource};

mod common;

#[tokio::test]
async fn test_event_detail_echoes_payload() {
    let source = ScriptedSource::fixed(Reply::Result(1, Some(r#"{"eventId":"E1"}"#)));
    let app = router(source.clone());

    let res = send(&app, get("/api/v1/events/E1")).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, r#"{"eventId":"E1"}"#);
    assert_eq!(res.headers.get("content-type").unwrap(), "application/json");
    assert_eq!(source.calls(), 1);

    let call = source.last_call().unwrap();
    assert_eq!(call.procedure, "GET_EVENT_DETAIL");
    assert_eq!(call.environment, "test");
    assert_eq!(call.session_id, "session-1");
    assert_eq!(call.transaction_id, "txn-1");
    assert_eq!(call.client_id, "client-1");
    assert_eq!(call.args.get("eventId"), Some(&json!("E1")));
}

#[tokio::test]
async fn test_no_record_returns_fixed_message() {
    let source = ScriptedSource::fixed(Reply::Result(0, None));
    let app = router(source);

    let res = send(&app, get("/api/v1/accounts/1234567890123456/outages?division=DIV.%201234")).await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json(), json!({ "error": "No record found" }));
}

#[tokio::test]
async fn test_no_content_discards_payload() {
    let source = ScriptedSource::fixed(Reply::Result(204, Some(r#"{"ignored":true}"#)));
    let app = router(source);

    let res = send(&app, get("/api/v1/events/E1")).await;

    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert!(res.body.is_empty());
    assert!(res.headers.get("content-type").is_none());
}

#[tokio::test]
async fn test_missing_header_never_reaches_backend() {
    let source = ScriptedSource::fixed(Reply::Result(1, Some("{}")));
    let app = router(source.clone());

    let request = axum::http::Request::builder()
        .uri("/api/v1/events/E1")
        .header("x-transaction-id", "txn-1")
        .header("x-client-id", "client-1")
        .body(axum::body::Body::empty())
        .unwrap();
    let res = send(&app, request).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.json()["error"].as_str().unwrap().contains("x-session-id"));
    assert_eq!(source.calls(), 0);
    assert_eq!(source.acquired(), 0);
}

#[tokio::test]
async fn test_blank_header_is_rejected() {
    let source = ScriptedSource::fixed(Reply::Result(1, Some("{}")));
    let app = router(source.clone());

    let request = axum::http::Request::builder()
        .uri("/api/v1/events/E1")
        .header("x-session-id", "   ")
        .header("x-transaction-id", "txn-1")
        .header("x-client-id", "client-1")
        .body(axum::body::Body::empty())
        .unwrap();
    let res = send(&app, request).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_backend_bad_request_payload_is_forwarded() {
    let source = ScriptedSource::fixed(Reply::Result(400, Some(r#"{"error":"division is required"}"#)));
    let app = router(source);

    let res = send(&app, get("/api/v1/accounts/1234567890123456/outages")).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json(), json!({ "error": "division is required" }));
}

#[tokio::test]
async fn test_unrecognized_code_is_generic_internal_error() {
    let source = ScriptedSource::fixed(Reply::Result(999, Some(r#"{"detail":"secret"}"#)));
    let app = router(source);

    let res = send(&app, get("/api/v1/events/E1")).await;

    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.json(), json!({ "error": "An unexpected error occurred" }));
    assert!(!res.body.contains("secret"));
}

#[tokio::test]
async fn test_backend_failure_falls_back_to_503() {
    let source = ScriptedSource::fixed(Reply::Fail("connection refused"));
    let app = router(source.clone());

    let res = send(&app, get("/api/v1/events/E1")).await;

    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        res.json(),
        json!({ "error": "Service temporarily unavailable. Please retry later." })
    );
    assert!(!res.body.contains("connection refused"));
    assert_eq!(source.released(), source.acquired());
}

#[tokio::test]
async fn test_malformed_result_map_falls_back() {
    let source = ScriptedSource::fixed(Reply::Raw(json!({ "RETURN_CODE": "one" })));
    let app = router(source);

    let res = send(&app, get("/api/v1/events/E1")).await;

    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_backend_panic_falls_back_to_503() {
    let source = ScriptedSource::fixed(Reply::Panic);
    let app = router(source.clone());

    let res = send(&app, get("/api/v1/events/E1")).await;

    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        res.json(),
        json!({ "error": "Service temporarily unavailable. Please retry later." })
    );
    assert!(!res.body.contains("scripted backend panic"));
    assert_eq!(source.released(), 1);
}

#[tokio::test]
async fn test_correlation_id_shape() {
    let source = ScriptedSource::fixed(Reply::Result(1, Some("{}")));
    let app = router(source.clone());

    let first = send(&app, get("/api/v1/events/E1")).await;
    let second = send(&app, get("/api/v1/events/E1")).await;

    let id = first.correlation_id();
    assert!(id.starts_with("test.east:host1:event-detail-v1:"), "{}", id);
    let suffix = id.rsplit(':').next().unwrap();
    assert_eq!(suffix.len(), 32);
    assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(first.correlation_id(), second.correlation_id());

    assert_eq!(source.last_call().unwrap().correlation_id, second.correlation_id());
}

#[tokio::test]
async fn test_rejected_request_still_has_correlation_id() {
    let source = ScriptedSource::fixed(Reply::Result(1, Some("{}")));
    let app = router(source);

    let res = send(&app, bare_get("/api/v1/accounts/1/outage-history")).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.correlation_id().contains(":outage-history-v1:"));
}

#[tokio::test]
async fn test_history_filters_pass_through() {
    let source = ScriptedSource::fixed(Reply::Result(200, Some(r#"{"history":[]}"#)));
    let app = router(source.clone());

    let uri = "/api/v1/accounts/1234567890123456/outage-history\
               ?division=DIV.%201234&startTime=2024-01-01T00:00:00Z&endTime=2024-01-31T00:00:00Z\
               &etdBlocking=N&limit=25&offset=50&processId=P1&qualification=Q";
    let res = send(&app, get(uri)).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({ "history": [] }));

    let call = source.last_call().unwrap();
    assert_eq!(call.procedure, "GET_OUTAGE_HISTORY");
    let args = call.args.to_json();
    assert_eq!(args["accountNumber"], json!("1234567890123456"));
    assert_eq!(args["division"], json!("DIV. 1234"));
    assert_eq!(args["startTime"], json!("2024-01-01T00:00:00Z"));
    assert_eq!(args["endTime"], json!("2024-01-31T00:00:00Z"));
    assert_eq!(args["etdBlocking"], json!("N"));
    assert_eq!(args["limit"], json!(25));
    assert_eq!(args["offset"], json!(50));
    assert_eq!(args["processId"], json!("P1"));
    assert_eq!(args["qualification"], json!("Q"));
}

#[tokio::test]
async fn test_history_without_filters_binds_nulls() {
    let source = ScriptedSource::fixed(Reply::Result(1, Some(r#"{"history":[]}"#)));
    let app = router(source.clone());

    let res = send(&app, get("/api/v1/accounts/1234567890123456/outage-history")).await;

    assert_eq!(res.status, StatusCode::OK);
    let args = source.last_call().unwrap().args.to_json();
    assert_eq!(args["startTime"], Value::Null);
    assert_eq!(args["limit"], Value::Null);
}

#[tokio::test]
async fn test_invalid_query_is_rejected_before_backend() {
    let source = ScriptedSource::fixed(Reply::Result(1, Some("{}")));
    let app = router(source.clone());

    let res = send(&app, get("/api/v1/accounts/1/outage-history?limit=many")).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.json()["error"].is_string());
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_undecodable_path_is_rejected_with_correlation_id() {
    let source = ScriptedSource::fixed(Reply::Result(1, Some("{}")));
    let app = router(source.clone());

    let res = send(&app, get("/api/v1/events/%FF")).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.headers.get("content-type").unwrap(), "application/json");
    assert!(res.json()["error"].as_str().unwrap().starts_with("Invalid path parameter"));
    assert!(res.correlation_id().contains(":event-detail-v1:"));

    let res = send(&app, get("/api/v1/accounts/%FF/outage-history")).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.correlation_id().contains(":outage-history-v1:"));

    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_liveness() {
    let source = ScriptedSource::fixed(Reply::Result(1, None));
    source.set_valid(false);
    let app = router(source.clone());

    let res = send(&app, bare_get("/health/live")).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({ "status": "UP" }));
    assert_eq!(source.acquired(), 0);
}

#[tokio::test]
async fn test_readiness_reflects_database_and_releases_connection() {
    let source = ScriptedSource::fixed(Reply::Result(1, None));
    let app = router(source.clone());

    let up = send(&app, bare_get("/health/ready")).await;
    assert_eq!(up.status, StatusCode::OK);
    assert_eq!(up.json(), json!({ "status": "UP", "database": "UP" }));

    source.set_valid(false);
    let down = send(&app, bare_get("/health/ready")).await;
    assert_eq!(down.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(down.json(), json!({ "status": "DOWN", "database": "DOWN" }));

    assert_eq!(source.acquired(), 2);
    assert_eq!(source.released(), 2);
    assert_eq!(source.calls(), 0);
}
