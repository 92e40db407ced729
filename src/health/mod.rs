//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! GET /health/live  → database.rs is_app_alive
//! GET /health/ready → database.rs is_database_connected
//!     → acquire connection → validate (deadline) → release
//! ```

pub mod database;

pub use database::HealthService;
