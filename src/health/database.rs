//! Application and database health checks.
//!
//! # Responsibilities
//! - Report application liveness
//! - Validate that a backend connection can be acquired and is usable
//!
//! # Design Decisions
//! - Validation has its own deadline (default 2 seconds)
//! - The probe connection is released on every path
//! - Any error is reported as "not connected", never propagated

use std::sync::Arc;
use std::time::Duration;

use tokio::time;

use crate::backend::ConnectionSource;

pub struct HealthService {
    source: Arc<dyn ConnectionSource>,
    validation_timeout: Duration,
}

impl HealthService {
    pub fn new(source: Arc<dyn ConnectionSource>, validation_timeout: Duration) -> Self {
        Self {
            source,
            validation_timeout,
        }
    }

    /// The process is up and serving.
    pub fn is_app_alive(&self) -> bool {
        true
    }

    /// Acquire a connection and validate it within the deadline.
    pub async fn is_database_connected(&self) -> bool {
        let mut connection = match self.source.acquire().await {
            Ok(connection) => connection,
            Err(e) => {
                tracing::warn!(error = %e, "Health check failed: connection unavailable");
                return false;
            }
        };

        let timeout = self.validation_timeout;
        match time::timeout(timeout, connection.is_valid(timeout)).await {
            Ok(Ok(true)) => true,
            Ok(Ok(false)) => {
                tracing::warn!("Health check failed: connection invalid");
                false
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Health check failed: validation error");
                false
            }
            Err(_) => {
                tracing::warn!(timeout_secs = timeout.as_secs(), "Health check failed: timeout");
                false
            }
        }
    }
}
