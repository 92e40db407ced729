//! Per-operation circuit breaker registry.

use std::sync::Arc;

use dashmap::DashMap;

use crate::config::CircuitBreakerSettings;
use crate::resilience::circuit_breaker::{CircuitBreaker, CircuitSnapshot};

/// Owns one breaker per downstream operation name.
///
/// Breakers are created on first use and live as long as the registry.
#[derive(Debug)]
pub struct CircuitBreakerRegistry {
    settings: CircuitBreakerSettings,
    breakers: DashMap<String, Arc<CircuitBreaker>>,
}

impl CircuitBreakerRegistry {
    pub fn new(settings: CircuitBreakerSettings) -> Self {
        Self {
            settings,
            breakers: DashMap::new(),
        }
    }

    /// Get or create the breaker for `operation`.
    pub fn get(&self, operation: &str) -> Arc<CircuitBreaker> {
        if let Some(existing) = self.breakers.get(operation) {
            return existing.clone();
        }
        self.breakers
            .entry(operation.to_string())
            .or_insert_with(|| {
                tracing::debug!(operation = %operation, "Creating circuit breaker");
                Arc::new(CircuitBreaker::new(operation, self.settings.for_operation(operation)))
            })
            .clone()
    }

    /// Snapshots of every breaker, sorted by operation name.
    pub fn snapshots(&self) -> Vec<CircuitSnapshot> {
        let mut all: Vec<_> = self.breakers.iter().map(|b| b.value().snapshot()).collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}
