//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, thresholds within bounds)
//! - Check addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{CircuitBreakerConfig, GatewayConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if Url::parse(&config.backend.base_url).is_err() {
        errors.push(ValidationError::new(
            "backend.base_url",
            format!("'{}' is not a valid URL", config.backend.base_url),
        ));
    }
    if config.backend.max_connections == 0 {
        errors.push(ValidationError::new("backend.max_connections", "must be greater than 0"));
    }
    if config.backend.call_timeout_ms == 0 {
        errors.push(ValidationError::new("backend.call_timeout_ms", "must be greater than 0"));
    }
    if config.backend.acquire_timeout_ms == 0 {
        errors.push(ValidationError::new("backend.acquire_timeout_ms", "must be greater than 0"));
    }
    if config.backend.validation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "backend.validation_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    validate_breaker("circuit_breaker.defaults", &config.circuit_breaker.defaults, &mut errors);
    for name in config.circuit_breaker.operations.keys() {
        let effective = config.circuit_breaker.for_operation(name);
        validate_breaker(&format!("circuit_breaker.operations.{}", name), &effective, &mut errors);
    }

    if config.admin.enabled && config.admin.api_key.trim().is_empty() {
        errors.push(ValidationError::new("admin.api_key", "must not be empty when admin is enabled"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_breaker(prefix: &str, breaker: &CircuitBreakerConfig, errors: &mut Vec<ValidationError>) {
    if breaker.sliding_window_size == 0 {
        errors.push(ValidationError::new(
            format!("{}.sliding_window_size", prefix),
            "must be greater than 0",
        ));
    }
    if breaker.minimum_calls == 0 || breaker.minimum_calls > breaker.sliding_window_size {
        errors.push(ValidationError::new(
            format!("{}.minimum_calls", prefix),
            "must be between 1 and sliding_window_size",
        ));
    }
    if !(breaker.failure_rate_threshold > 0.0 && breaker.failure_rate_threshold <= 100.0) {
        errors.push(ValidationError::new(
            format!("{}.failure_rate_threshold", prefix),
            "must be in (0, 100]",
        ));
    }
    if breaker.half_open_trial_calls == 0 {
        errors.push(ValidationError::new(
            format!("{}.half_open_trial_calls", prefix),
            "must be greater than 0",
        ));
    }
}
