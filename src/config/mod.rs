//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! --config <path> (TOML), or built-in defaults
//!     → loader.rs (read & deserialize)
//!     → validation.rs (ranges, addresses, breaker bounds)
//!     → GatewayConfig
//!     → sections handed to server, adapter, breakers, health
//! ```
//!
//! # Design Decisions
//! - Loaded once at startup; changes require a restart
//! - Every field has a default so a partial file is enough
//! - Breaker settings resolve per operation: override, else defaults

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::GatewayConfig;
pub use schema::{
    AdminConfig, BackendConfig, CircuitBreakerConfig, CircuitBreakerOverride, CircuitBreakerSettings,
    ListenerConfig,
    ObservabilityConfig, ServiceConfig, TimeoutConfig,
};
