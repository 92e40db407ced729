//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request pipeline, adapter, breakers
//!     → logging.rs (tracing events keyed by correlation_id / operation)
//!     → metrics.rs (request, backend call, fallback and circuit state series)
//!
//! Output:
//!     → stdout, pretty or JSON lines
//!     → Prometheus scrape endpoint (observability.metrics_address)
//! ```
//!
//! # Design Decisions
//! - Raw return codes and backend errors appear in logs only, never in responses
//! - Metric calls are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
