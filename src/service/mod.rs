//! Request handling subsystem.
//!
//! # Data Flow
//! ```text
//! handler (http)
//!     → context.rs (correlation ID, required headers)
//!     → pipeline.rs (breaker-guarded backend call, translation)
//!     → operations.rs (procedure name + argument binding per operation)
//! ```

pub mod context;
pub mod operations;
pub mod pipeline;

pub use context::{
    CorrelationIdGenerator, RequestContext, RequestError, CLIENT_ID_HEADER, CORRELATION_ID_HEADER,
    SESSION_ID_HEADER, TRANSACTION_ID_HEADER,
};
pub use operations::{DivisionQuery, HistoryQuery, Operation, OperationRequest};
pub use pipeline::{HandledRequest, RequestHandler};
