//! Connection acquisition seam for the stored-procedure backend.
//!
//! # Design Decisions
//! - A connection is a scoped resource: dropping it releases it
//! - Trait methods return boxed futures so sources can live behind `Arc<dyn _>`

use std::time::Duration;

use futures_util::future::BoxFuture;
use serde_json::{Map, Value};

use crate::backend::error::BackendError;
use crate::backend::types::ProcedureCall;

/// A live connection to the procedure backend.
pub trait ProcedureConnection: Send {
    /// Execute one procedure and return its raw result map.
    fn call<'a>(
        &'a mut self,
        call: &'a ProcedureCall,
    ) -> BoxFuture<'a, Result<Map<String, Value>, BackendError>>;

    /// Check the connection is usable within `timeout`.
    fn is_valid(&mut self, timeout: Duration) -> BoxFuture<'_, Result<bool, BackendError>>;
}

/// Hands out connections, typically from a bounded pool.
pub trait ConnectionSource: Send + Sync {
    fn acquire(&self) -> BoxFuture<'_, Result<Box<dyn ProcedureConnection>, BackendError>>;
}
