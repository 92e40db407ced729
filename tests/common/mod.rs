//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use futures_util::future::BoxFuture;
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use outage_gateway::backend::{BackendError, ConnectionSource, ProcedureCall, ProcedureConnection};
use outage_gateway::config::GatewayConfig;
use outage_gateway::HttpServer;

/// What the scripted backend does for one call.
#[derive(Debug, Clone)]
pub enum Reply {
    Result(i64, Option<&'static str>),
    Raw(Value),
    Fail(&'static str),
    Panic,
    Hang,
}

type Script = Arc<dyn Fn(usize, &ProcedureCall) -> Reply + Send + Sync>;

#[derive(Default)]
pub struct Probe {
    pub calls: AtomicUsize,
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
    pub received: Mutex<Vec<ProcedureCall>>,
}

/// In-memory procedure backend driven by a script.
pub struct ScriptedSource {
    script: Script,
    valid: Arc<Mutex<bool>>,
    pub probe: Arc<Probe>,
}

impl ScriptedSource {
    /// The script receives the zero-based call index and the call itself.
    pub fn new<F>(script: F) -> Arc<Self>
    where
        F: Fn(usize, &ProcedureCall) -> Reply + Send + Sync + 'static,
    {
        Arc::new(Self {
            script: Arc::new(script),
            valid: Arc::new(Mutex::new(true)),
            probe: Arc::new(Probe::default()),
        })
    }

    /// Always answer with the same reply.
    pub fn fixed(reply: Reply) -> Arc<Self> {
        Self::new(move |_, _| reply.clone())
    }

    pub fn set_valid(&self, valid: bool) {
        *self.valid.lock().unwrap() = valid;
    }

    pub fn calls(&self) -> usize {
        self.probe.calls.load(Ordering::SeqCst)
    }

    pub fn acquired(&self) -> usize {
        self.probe.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.probe.released.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<ProcedureCall> {
        self.probe.received.lock().unwrap().last().cloned()
    }
}

impl ConnectionSource for ScriptedSource {
    fn acquire(&self) -> BoxFuture<'_, Result<Box<dyn ProcedureConnection>, BackendError>> {
        Box::pin(async move {
            self.probe.acquired.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(ScriptedConnection {
                script: self.script.clone(),
                valid: self.valid.clone(),
                probe: self.probe.clone(),
            }) as Box<dyn ProcedureConnection>)
        })
    }
}

struct ScriptedConnection {
    script: Script,
    valid: Arc<Mutex<bool>>,
    probe: Arc<Probe>,
}

impl ProcedureConnection for ScriptedConnection {
    fn call<'a>(
        &'a mut self,
        call: &'a ProcedureCall,
    ) -> BoxFuture<'a, Result<Map<String, Value>, BackendError>> {
        Box::pin(async move {
            let index = self.probe.calls.fetch_add(1, Ordering::SeqCst);
            self.probe.received.lock().unwrap().push(call.clone());

            match (self.script)(index, call) {
                Reply::Result(code, payload) => Ok(result_map(code, payload)),
                Reply::Raw(Value::Object(map)) => Ok(map),
                Reply::Raw(other) => Err(BackendError::Protocol(format!("not a map: {}", other))),
                Reply::Fail(message) => Err(BackendError::Unavailable(message.to_string())),
                Reply::Panic => panic!("scripted backend panic"),
                Reply::Hang => std::future::pending().await,
            }
        })
    }

    fn is_valid(&mut self, _timeout: Duration) -> BoxFuture<'_, Result<bool, BackendError>> {
        Box::pin(async move { Ok(*self.valid.lock().unwrap()) })
    }
}

impl Drop for ScriptedConnection {
    fn drop(&mut self) {
        self.probe.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// A `RETURN_CODE` / `RESULTS_STRING` result map.
pub fn result_map(code: i64, payload: Option<&str>) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("RETURN_CODE".into(), json!(code));
    if let Some(payload) = payload {
        map.insert("RESULTS_STRING".into(), json!(payload));
    }
    map
}

/// Config with deterministic identity and the admin surface enabled.
pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.service.environment = "test".into();
    config.service.cluster = "east".into();
    config.service.host = "host1".into();
    config.service.api_version = "v1".into();
    config.admin.enabled = true;
    config.admin.api_key = "test-admin-key".into();
    config
}

pub fn router(source: Arc<ScriptedSource>) -> Router {
    router_with(test_config(), source)
}

pub fn router_with(config: GatewayConfig, source: Arc<ScriptedSource>) -> Router {
    HttpServer::new(config, source).router()
}

/// GET request carrying the three correlation headers.
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-session-id", "session-1")
        .header("x-transaction-id", "txn-1")
        .header("x-client-id", "client-1")
        .body(Body::empty())
        .unwrap()
}

/// GET request with no headers.
pub fn bare_get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }

    pub fn correlation_id(&self) -> &str {
        self.headers.get("x-correlation-id").unwrap().to_str().unwrap()
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

/// Start a procedure gateway stub on an ephemeral port.
///
/// `handler` maps the procedure name and request envelope to an HTTP status
/// and JSON body.
pub async fn start_procedure_gateway<F>(handler: F) -> SocketAddr
where
    F: Fn(String, Value) -> (StatusCode, Value) + Send + Sync + 'static,
{
    start_procedure_gateway_at("", handler).await
}

/// Same as `start_procedure_gateway`, with every route mounted under `prefix`.
pub async fn start_procedure_gateway_at<F>(prefix: &str, handler: F) -> SocketAddr
where
    F: Fn(String, Value) -> (StatusCode, Value) + Send + Sync + 'static,
{
    use axum::extract::Path;
    use axum::routing::{get as get_route, post};
    use axum::Json;

    let handler = Arc::new(handler);
    let app = Router::new()
        .route(
            "/procedures/{name}",
            post(move |Path(name): Path<String>, Json(body): Json<Value>| {
                let handler = handler.clone();
                async move {
                    let (status, body) = handler(name, body);
                    (status, Json(body))
                }
            }),
        )
        .route("/health", get_route(|| async { "ok" }));
    let app = if prefix.is_empty() {
        app
    } else {
        Router::new().nest(prefix, app)
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}
