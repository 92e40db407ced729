//! HTTP procedure gateway client.
//!
//! The stored procedures are reached through a gateway that accepts
//! `POST {base_url}/procedures/{PROCEDURE}` with the call envelope as JSON and
//! answers with the `RETURN_CODE` / `RESULTS_STRING` map.
//!
//! Pool size is bounded with a semaphore; each connection holds one permit
//! until it is dropped.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use serde_json::{Map, Value};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

use crate::backend::error::BackendError;
use crate::backend::source::{ConnectionSource, ProcedureConnection};
use crate::backend::types::ProcedureCall;
use crate::config::BackendConfig;

/// Connection source backed by the HTTP procedure gateway.
pub struct HttpProcedureSource {
    client: reqwest::Client,
    base_url: Url,
    permits: Arc<Semaphore>,
    acquire_timeout: Duration,
}

impl HttpProcedureSource {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(config.max_connections)
            .build()
            .map_err(|e| BackendError::Unavailable(format!("failed to build client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            permits: Arc::new(Semaphore::new(config.max_connections)),
            acquire_timeout: config.acquire_timeout(),
        })
    }
}

impl ConnectionSource for HttpProcedureSource {
    fn acquire(&self) -> BoxFuture<'_, Result<Box<dyn ProcedureConnection>, BackendError>> {
        Box::pin(async move {
            let permit = tokio::time::timeout(self.acquire_timeout, self.permits.clone().acquire_owned())
                .await
                .map_err(|_| BackendError::Unavailable("connection pool exhausted".into()))?
                .map_err(|_| BackendError::Unavailable("connection pool closed".into()))?;

            Ok(Box::new(HttpConnection {
                client: self.client.clone(),
                base_url: self.base_url.clone(),
                _permit: permit,
            }) as Box<dyn ProcedureConnection>)
        })
    }
}

struct HttpConnection {
    client: reqwest::Client,
    base_url: Url,
    _permit: OwnedSemaphorePermit,
}

/// Parse the gateway base URL so that relative endpoints resolve under its path.
fn parse_base_url(raw: &str) -> Result<Url, BackendError> {
    let mut url =
        Url::parse(raw).map_err(|e| BackendError::Unavailable(format!("invalid base url: {}", e)))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn endpoint(base_url: &Url, path: &str) -> Result<Url, BackendError> {
    base_url
        .join(path)
        .map_err(|e| BackendError::Unavailable(format!("invalid endpoint '{}': {}", path, e)))
}

impl ProcedureConnection for HttpConnection {
    fn call<'a>(
        &'a mut self,
        call: &'a ProcedureCall,
    ) -> BoxFuture<'a, Result<Map<String, Value>, BackendError>> {
        Box::pin(async move {
            let url = endpoint(&self.base_url, &format!("procedures/{}", call.procedure))?;
            let response = self
                .client
                .post(url)
                .json(&call.to_json())
                .send()
                .await
                .map_err(|e| BackendError::Unavailable(e.to_string()))?;

            let status = response.status();
            if status.is_server_error() {
                return Err(BackendError::Unavailable(format!("procedure gateway returned {}", status)));
            }

            let body: Value = response
                .json()
                .await
                .map_err(|e| BackendError::Protocol(format!("undecodable result: {}", e)))?;

            match body {
                Value::Object(map) => Ok(map),
                other => Err(BackendError::Protocol(format!("result is not a map: {}", other))),
            }
        })
    }

    fn is_valid(&mut self, timeout: Duration) -> BoxFuture<'_, Result<bool, BackendError>> {
        Box::pin(async move {
            let url = endpoint(&self.base_url, "health")?;
            match tokio::time::timeout(timeout, self.client.get(url).send()).await {
                Ok(Ok(response)) => Ok(response.status().is_success()),
                Ok(Err(e)) => Err(BackendError::Unavailable(e.to_string())),
                Err(_) => Err(BackendError::Unavailable("validation timed out".into())),
            }
        })
    }
}
