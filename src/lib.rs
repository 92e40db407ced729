//! Outage gateway library.
//!
//! REST front end over the outage stored procedures, with per-operation
//! circuit breaking and return-code translation.

pub mod admin;
pub mod backend;
pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod service;
pub mod translation;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
