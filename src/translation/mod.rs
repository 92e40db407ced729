//! Return-code translation subsystem.
//!
//! # Data Flow
//! ```text
//! BackendResult
//!     → codes.rs (classify numeric code, legacy or HTTP-style)
//!     → translator.rs (outcome kind + body rule)
//!     → Translation → HTTP response
//! ```
//!
//! # Design Decisions
//! - Translation is a pure, total function
//! - Unrecognized codes become a generic 500; the code itself is never shown to callers

pub mod codes;
pub mod translator;

pub use codes::ReturnCode;
pub use translator::{translate, OutcomeKind, Translation};
