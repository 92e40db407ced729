//! Stored-procedure backend subsystem.
//!
//! # Data Flow
//! ```text
//! ProcedureCall
//!     → adapter.rs (acquire connection, one round trip, deadline)
//!     → source.rs (ConnectionSource / ProcedureConnection seam)
//!     → http.rs (procedure gateway client, bounded pool)
//!     → types.rs (RETURN_CODE / RESULTS_STRING map → BackendResult)
//! ```
//!
//! # Design Decisions
//! - Failures are values (`BackendError`), never panics
//! - Parameters are opaque; business validation happens inside the procedures

pub mod adapter;
pub mod error;
pub mod http;
pub mod source;
pub mod types;

pub use adapter::BackendAdapter;
pub use error::BackendError;
pub use http::HttpProcedureSource;
pub use source::{ConnectionSource, ProcedureConnection};
pub use types::{BackendResult, ProcedureArgs, ProcedureCall, RESULTS_STRING, RETURN_CODE};
