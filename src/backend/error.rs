//! Backend failure taxonomy.

use thiserror::Error;

/// Why a backend call did not produce a usable result.
///
/// Both variants count as failures for circuit breaker accounting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Connection refused, pool exhausted, or deadline exceeded.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with a result of the wrong shape.
    #[error("backend protocol error: {0}")]
    Protocol(String),
}

impl BackendError {
    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BackendError::Unavailable(_) => "unavailable",
            BackendError::Protocol(_) => "protocol",
        }
    }
}
