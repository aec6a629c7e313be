// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, patch},
};
use mockable::Clock;
use thoughtchain_core::{StorageAdapter, SubmissionGuard, ThoughtError};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::{handlers, openapi};

/// Health state for unauthenticated health/metrics endpoints.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// Optional Prometheus metrics render function.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Admission control for thought creation.
    pub guard: SubmissionGuard,
    /// Store used for reads, edits and health checks.
    pub store: Arc<dyn StorageAdapter>,
    /// Source of "now" for day derivation and edit timestamps.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// Whether `DELETE /admin/dev/clear-thoughts` is allowed.
    pub maintenance_enabled: bool,
    pub health: HealthState,
}

impl GatewayState {
    /// Build state around `store`, with the guard sharing the same store.
    pub fn new(
        store: Arc<dyn StorageAdapter>,
        clock: Arc<dyn Clock + Send + Sync>,
        maintenance_enabled: bool,
        prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
    ) -> Self {
        Self {
            guard: SubmissionGuard::new(Arc::clone(&store)),
            store,
            clock,
            maintenance_enabled,
            health: HealthState {
                start_time: std::time::Instant::now(),
                prometheus_render,
            },
        }
    }
}

/// Bind address for the gateway.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the application router.
///
/// Routes:
/// - GET / and GET /health, GET /metrics, GET /openapi.json
/// - GET, POST /thoughts
/// - PATCH, DELETE /thoughts/{id}
/// - DELETE /admin/dev/clear-thoughts
pub fn build_router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::get_root))
        .route("/health", get(handlers::get_public_health))
        .route("/metrics", get(handlers::get_public_metrics))
        .route("/openapi.json", get(openapi::get_openapi));

    let thought_routes = Router::new()
        .route(
            "/thoughts",
            get(handlers::list_thoughts).post(handlers::create_thought),
        )
        .route(
            "/thoughts/{id}",
            patch(handlers::update_thought).delete(handlers::delete_thought),
        );

    let maintenance_routes =
        Router::new().route("/admin/dev/clear-thoughts", delete(handlers::clear_thoughts));

    Router::new()
        .merge(public_routes)
        .merge(thought_routes)
        .merge(maintenance_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server and serve until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), ThoughtError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ThoughtError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    serve_router(listener, build_router(state), shutdown).await
}

/// Serve `app` on an already-bound listener until `shutdown` is cancelled.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    app: Router,
    shutdown: CancellationToken,
) -> Result<(), ThoughtError> {
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| ThoughtError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
