//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the outage gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Service identity used for correlation IDs and procedure calls.
    pub service: ServiceConfig,

    /// Stored-procedure gateway settings.
    pub backend: BackendConfig,

    /// Circuit breaker defaults and per-operation overrides.
    pub circuit_breaker: CircuitBreakerSettings,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin surface settings.
    pub admin: AdminConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Service identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Deployment environment passed to every procedure (e.g., "prod").
    pub environment: String,

    /// Cluster tag used as the leading segment of correlation IDs.
    pub cluster: String,

    /// Host tag. Falls back to `$HOSTNAME` when empty.
    pub host: String,

    /// API version tag appended to the operation name in correlation IDs.
    pub api_version: String,

    /// Table the procedures write their query output to.
    pub query_output_table: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            environment: "dev".to_string(),
            cluster: "local".to_string(),
            host: String::new(),
            api_version: "v1".to_string(),
            query_output_table: "QUERY_OUTPUT".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Resolve the host tag, consulting the environment when unset.
    pub fn host_tag(&self) -> String {
        if !self.host.trim().is_empty() {
            return self.host.clone();
        }
        std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string())
    }
}

/// Stored-procedure gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the procedure gateway (e.g., "http://127.0.0.1:9000").
    pub base_url: String,

    /// Maximum concurrent connections to the procedure gateway.
    pub max_connections: usize,

    /// How long to wait for a free connection, in milliseconds.
    pub acquire_timeout_ms: u64,

    /// Deadline for a single procedure round trip, in milliseconds.
    pub call_timeout_ms: u64,

    /// Deadline for readiness validation, in seconds.
    pub validation_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9000".to_string(),
            max_connections: 20,
            acquire_timeout_ms: 1_000,
            call_timeout_ms: 5_000,
            validation_timeout_secs: 2,
        }
    }
}

impl BackendConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    pub fn validation_timeout(&self) -> Duration {
        Duration::from_secs(self.validation_timeout_secs)
    }
}

/// Circuit breaker tuning for one operation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Number of most recent outcomes retained for the failure rate.
    pub sliding_window_size: usize,

    /// Outcomes required before the failure rate is evaluated.
    pub minimum_calls: usize,

    /// Failure percentage at or above which the circuit opens.
    pub failure_rate_threshold: f64,

    /// Time spent open before trial calls are allowed, in milliseconds.
    pub open_wait_ms: u64,

    /// Consecutive trial successes needed to close again.
    pub half_open_trial_calls: usize,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            sliding_window_size: 10,
            minimum_calls: 5,
            failure_rate_threshold: 50.0,
            open_wait_ms: 10_000,
            half_open_trial_calls: 3,
        }
    }
}

impl CircuitBreakerConfig {
    pub fn open_wait(&self) -> Duration {
        Duration::from_millis(self.open_wait_ms)
    }
}

/// Per-operation breaker override. Unset fields inherit `defaults`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CircuitBreakerOverride {
    pub sliding_window_size: Option<usize>,
    pub minimum_calls: Option<usize>,
    pub failure_rate_threshold: Option<f64>,
    pub open_wait_ms: Option<u64>,
    pub half_open_trial_calls: Option<usize>,
}

impl CircuitBreakerOverride {
    /// Apply this override on top of `base`.
    pub fn apply(&self, base: &CircuitBreakerConfig) -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            sliding_window_size: self.sliding_window_size.unwrap_or(base.sliding_window_size),
            minimum_calls: self.minimum_calls.unwrap_or(base.minimum_calls),
            failure_rate_threshold: self
                .failure_rate_threshold
                .unwrap_or(base.failure_rate_threshold),
            open_wait_ms: self.open_wait_ms.unwrap_or(base.open_wait_ms),
            half_open_trial_calls: self.half_open_trial_calls.unwrap_or(base.half_open_trial_calls),
        }
    }
}

/// Breaker defaults plus overrides keyed by operation name.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CircuitBreakerSettings {
    pub defaults: CircuitBreakerConfig,

    /// e.g. `[circuit_breaker.operations.outage-history]`
    pub operations: HashMap<String, CircuitBreakerOverride>,
}

impl CircuitBreakerSettings {
    /// Effective configuration for an operation.
    pub fn for_operation(&self, name: &str) -> CircuitBreakerConfig {
        match self.operations.get(name) {
            Some(overrides) => overrides.apply(&self.defaults),
            None => self.defaults.clone(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin surface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Mount the admin routes.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.circuit_breaker.defaults.sliding_window_size, 10);
        assert_eq!(config.circuit_breaker.defaults.minimum_calls, 5);
        assert_eq!(config.circuit_breaker.defaults.half_open_trial_calls, 3);
        assert_eq!(config.backend.validation_timeout(), Duration::from_secs(2));
        assert!(!config.admin.enabled);
        assert_eq!(config.admin.api_key, "CHANGE_ME_IN_PRODUCTION");
    }

    #[test]
    fn test_operation_override() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [circuit_breaker.defaults]
            minimum_calls = 4

            [circuit_breaker.operations.outage-history]
            sliding_window_size = 20
            "#,
        )
        .unwrap();

        let history = config.circuit_breaker.for_operation("outage-history");
        assert_eq!(history.sliding_window_size, 20);
        assert_eq!(history.minimum_calls, 4);
        assert_eq!(history.half_open_trial_calls, 3);

        let detail = config.circuit_breaker.for_operation("event-detail");
        assert_eq!(detail.minimum_calls, 4);
    }

    #[test]
    fn test_explicit_host_tag_wins() {
        let service = ServiceConfig {
            host: "node-7".into(),
            ..ServiceConfig::default()
        };
        assert_eq!(service.host_tag(), "node-7");
    }
}
