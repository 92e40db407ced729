//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Logging/metrics → Build server → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received (signals.rs) → Stop accepting → Drain in-flight → Exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
