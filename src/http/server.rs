//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request timeout)
//! - Build the backend adapter, breaker registry and health service
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin;
use crate::backend::{BackendAdapter, ConnectionSource};
use crate::config::{AdminConfig, GatewayConfig};
use crate::health::HealthService;
use crate::http::handlers;
use crate::resilience::CircuitBreakerRegistry;
use crate::service::{Operation, RequestHandler};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<RequestHandler>,
    pub health: Arc<HealthService>,
    pub breakers: Arc<CircuitBreakerRegistry>,
    pub admin: AdminConfig,
}

/// HTTP server for the outage gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server over the given connection source.
    pub fn new(config: GatewayConfig, source: Arc<dyn ConnectionSource>) -> Self {
        let breakers = Arc::new(CircuitBreakerRegistry::new(config.circuit_breaker.clone()));
        // Breakers exist from startup so admin and metrics see every operation.
        for operation in Operation::ALL {
            breakers.get(operation.name());
        }

        let adapter = BackendAdapter::new(source.clone(), config.backend.call_timeout());
        let handler = Arc::new(RequestHandler::new(adapter, breakers.clone(), &config.service));
        let health = Arc::new(HealthService::new(source, config.backend.validation_timeout()));

        let state = AppState {
            handler,
            health,
            breakers,
            admin: config.admin.clone(),
        };

        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            config,
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/api/v1/events/{event_id}", get(handlers::event_detail))
            .route("/api/v1/accounts/{account}/outages", get(handlers::outage_detail))
            .route("/api/v1/accounts/{account}/outage-history", get(handlers::outage_history))
            .route("/health/live", get(handlers::liveness))
            .route("/health/ready", get(handlers::readiness))
            .with_state(state.clone());

        if config.admin.enabled {
            router = router.merge(admin::setup_admin_router(state));
        }

        router
            .layer(TimeoutLayer::with_status_code(
                StatusCode::SERVICE_UNAVAILABLE,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(TraceLayer::new_for_http())
    }

    /// The configured router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            environment = %self.config.service.environment,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
