//! Circuit breaker for backend protection.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: backend assumed down, calls go straight to the fallback
//! - Half-Open: a bounded number of trial calls test if the backend recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: calls >= minimum_calls and failure rate >= threshold within window
//! Open → Half-Open: after open_wait elapses (checked on the next call)
//! Half-Open → Closed: half_open_trial_calls consecutive trial successes
//! Half-Open → Open: any trial failure, wait timer restarts
//! ```
//!
//! # Design Decisions
//! - Per-operation circuit breaker (not global)
//! - State and window live behind one mutex; the operation runs outside it
//! - Every transition bumps an epoch; outcomes from an older epoch are dropped
//! - A panicking operation counts as a failure and is served by the fallback

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Mutex, MutexGuard};

use futures_util::FutureExt;
use serde::Serialize;
use tokio::time::Instant;

use crate::config::CircuitBreakerConfig;
use crate::observability::metrics;
use crate::resilience::window::SlidingWindow;

/// Circuit state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "CLOSED",
            CircuitState::Open => "OPEN",
            CircuitState::HalfOpen => "HALF_OPEN",
        }
    }
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the fallback was invoked instead of returning the operation's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection<E> {
    /// The call was never attempted (open, or half-open trials in flight).
    NotPermitted(CircuitState),
    /// The call was attempted and failed.
    Failed(E),
    /// The call was attempted and panicked; carries the panic message.
    Panicked(String),
}

impl<E> Rejection<E> {
    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::NotPermitted(_) => "short_circuited",
            Rejection::Failed(_) => "failed",
            Rejection::Panicked(_) => "panicked",
        }
    }
}

/// Point-in-time view of a breaker, for admin and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitSnapshot {
    pub name: String,
    pub state: CircuitState,
    pub buffered_calls: usize,
    pub failed_calls: usize,
    pub failure_rate: f64,
    pub half_open_successes: usize,
}

#[derive(Debug)]
struct Inner {
    state: CircuitState,
    window: SlidingWindow,
    opened_at: Option<Instant>,
    half_open_successes: usize,
    half_open_in_flight: usize,
    epoch: u64,
}

/// A three-state circuit breaker guarding one downstream operation.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        let window = SlidingWindow::new(config.sliding_window_size);
        let breaker = Self {
            name: name.into(),
            config,
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                window,
                opened_at: None,
                half_open_successes: 0,
                half_open_in_flight: 0,
                epoch: 0,
            }),
        };
        metrics::record_circuit_state(&breaker.name, CircuitState::Closed);
        breaker
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Current state, applying any due Open → Half-Open transition.
    pub fn state(&self) -> CircuitState {
        let mut inner = self.lock();
        self.refresh(&mut inner);
        inner.state
    }

    pub fn snapshot(&self) -> CircuitSnapshot {
        let mut inner = self.lock();
        self.refresh(&mut inner);
        CircuitSnapshot {
            name: self.name.clone(),
            state: inner.state,
            buffered_calls: inner.window.len(),
            failed_calls: inner.window.failures(),
            failure_rate: inner.window.failure_rate(),
            half_open_successes: inner.half_open_successes,
        }
    }

    /// Run `operation` through the breaker.
    ///
    /// When the call is not permitted, fails or panics, `fallback` produces the
    /// value instead; errors never propagate out of this method.
    pub async fn execute<T, E, F, Fut, FB>(&self, operation: F, fallback: FB) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
        FB: FnOnce(Rejection<E>) -> T,
    {
        let permit = match self.try_acquire() {
            Ok(permit) => permit,
            Err(state) => {
                tracing::debug!(operation = %self.name, state = %state, "Call short-circuited");
                return fallback(Rejection::NotPermitted(state));
            }
        };

        let outcome = AssertUnwindSafe(async move { operation().await })
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(value)) => {
                permit.complete(true);
                value
            }
            Ok(Err(e)) => {
                tracing::debug!(operation = %self.name, error = %e, "Guarded call failed");
                permit.complete(false);
                fallback(Rejection::Failed(e))
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!(operation = %self.name, panic = %message, "Guarded call panicked");
                permit.complete(false);
                fallback(Rejection::Panicked(message))
            }
        }
    }

    fn try_acquire(&self) -> Result<Permit<'_>, CircuitState> {
        let mut inner = self.lock();
        self.refresh(&mut inner);

        match inner.state {
            CircuitState::Closed => Ok(Permit::new(self, inner.epoch, false)),
            CircuitState::HalfOpen => {
                let remaining = self
                    .config
                    .half_open_trial_calls
                    .saturating_sub(inner.half_open_successes);
                if inner.half_open_in_flight < remaining {
                    inner.half_open_in_flight += 1;
                    Ok(Permit::new(self, inner.epoch, true))
                } else {
                    Err(CircuitState::HalfOpen)
                }
            }
            CircuitState::Open => Err(CircuitState::Open),
        }
    }

    fn on_outcome(&self, epoch: u64, trial: bool, success: bool) {
        let mut inner = self.lock();
        if inner.epoch != epoch {
            // The breaker moved on while this call was in flight.
            return;
        }

        match inner.state {
            CircuitState::Closed => {
                inner.window.record(!success);
                let calls = inner.window.len();
                let rate = inner.window.failure_rate();
                if calls >= self.config.minimum_calls && rate >= self.config.failure_rate_threshold {
                    tracing::warn!(
                        operation = %self.name,
                        failure_rate = rate,
                        calls,
                        "Failure rate threshold reached"
                    );
                    self.transition(&mut inner, CircuitState::Open);
                }
            }
            CircuitState::HalfOpen => {
                if trial {
                    inner.half_open_in_flight = inner.half_open_in_flight.saturating_sub(1);
                }
                if success {
                    inner.half_open_successes += 1;
                    if inner.half_open_successes >= self.config.half_open_trial_calls {
                        self.transition(&mut inner, CircuitState::Closed);
                    }
                } else {
                    self.transition(&mut inner, CircuitState::Open);
                }
            }
            CircuitState::Open => {}
        }
    }

    fn release_trial(&self, epoch: u64) {
        let mut inner = self.lock();
        if inner.epoch == epoch && inner.state == CircuitState::HalfOpen {
            inner.half_open_in_flight = inner.half_open_in_flight.saturating_sub(1);
        }
    }

    fn refresh(&self, inner: &mut Inner) {
        if inner.state != CircuitState::Open {
            return;
        }
        let due = inner
            .opened_at
            .map(|at| at.elapsed() >= self.config.open_wait())
            .unwrap_or(true);
        if due {
            self.transition(inner, CircuitState::HalfOpen);
        }
    }

    fn transition(&self, inner: &mut Inner, to: CircuitState) {
        let from = inner.state;
        inner.state = to;
        inner.epoch += 1;
        inner.half_open_successes = 0;
        inner.half_open_in_flight = 0;

        match to {
            CircuitState::Open => {
                inner.opened_at = Some(Instant::now());
                inner.window.clear();
                tracing::warn!(operation = %self.name, from = %from, to = %to, "Circuit opened");
            }
            CircuitState::HalfOpen => {
                tracing::info!(operation = %self.name, from = %from, to = %to, "Circuit half-open, allowing trial calls");
            }
            CircuitState::Closed => {
                inner.opened_at = None;
                inner.window.clear();
                tracing::info!(operation = %self.name, from = %from, to = %to, "Circuit closed");
            }
        }

        metrics::record_circuit_state(&self.name, to);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Admission ticket for one guarded call.
///
/// A trial permit dropped without an outcome (e.g. the caller's future was
/// cancelled) frees its half-open slot without recording anything.
struct Permit<'a> {
    breaker: &'a CircuitBreaker,
    epoch: u64,
    trial: bool,
    completed: bool,
}

impl<'a> Permit<'a> {
    fn new(breaker: &'a CircuitBreaker, epoch: u64, trial: bool) -> Self {
        Self {
            breaker,
            epoch,
            trial,
            completed: false,
        }
    }

    fn complete(mut self, success: bool) {
        self.completed = true;
        self.breaker.on_outcome(self.epoch, self.trial, success);
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if !self.completed && self.trial {
            self.breaker.release_trial(self.epoch);
        }
    }
}
