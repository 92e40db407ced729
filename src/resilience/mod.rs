//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Guarded backend call:
//!     → registry.rs (breaker for this operation name)
//!     → circuit_breaker.rs (admit, run, record outcome in window.rs)
//!     → On rejection or failure: fallback.rs (fixed 503 result)
//! ```
//!
//! # Design Decisions
//! - No automatic retries; one logical call is at most one backend attempt
//! - Timeouts belong to the backend adapter so failures are counted promptly
//! - Circuit state is owned by an injectable registry, not a global

pub mod circuit_breaker;
pub mod fallback;
pub mod registry;
pub mod window;

pub use circuit_breaker::{CircuitBreaker, CircuitSnapshot, CircuitState, Rejection};
pub use registry::CircuitBreakerRegistry;
