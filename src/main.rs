//! Outage gateway (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────▶ http (axum router) ──▶ service::RequestHandler
//!                                        │ headers → RequestContext
//!                                        │ correlation id
//!                                        ▼
//!                               resilience::CircuitBreaker ──(rejected)──▶ fallback 503
//!                                        │
//!                                        ▼
//!                               backend::BackendAdapter ──▶ procedure gateway
//!                                        │
//!                                        ▼
//!                               translation::translate
//!     Client Response                    │
//!     ◀────── http::response ◀───────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use outage_gateway::backend::HttpProcedureSource;
use outage_gateway::config::{load_config, validation::validate_config, GatewayConfig};
use outage_gateway::lifecycle::{signals, Shutdown};
use outage_gateway::observability::{logging, metrics};
use outage_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "outage-gateway")]
#[command(about = "REST gateway for outage stored procedures", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            let config = GatewayConfig::default();
            if let Err(errors) = validate_config(&config) {
                for e in &errors {
                    eprintln!("invalid default config: {}", e);
                }
                return Err("default configuration is invalid".into());
            }
            config
        }
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "outage-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.base_url,
        environment = %config.service.environment,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let source = HttpProcedureSource::new(&config.backend)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    let server = HttpServer::new(config, Arc::new(source));
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
