// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, patch, post},
};
use supportdesk_config::model::ServerConfig;
use supportdesk_core::{ModelProvider, SupportError, TicketStore};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared state for axum request handlers.
///
/// Built once at startup; handlers only ever see these trait objects.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ModelProvider>,
    pub store: Arc<dyn TicketStore>,
    /// Process start time for uptime calculation.
    pub started: Instant,
}

impl AppState {
    pub fn new(provider: Arc<dyn ModelProvider>, store: Arc<dyn TicketStore>) -> Self {
        Self {
            provider,
            store,
            started: Instant::now(),
        }
    }
}

/// Builds the router with every route and the CORS and tracing layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/api/ai/support-chat", post(handlers::post_support_chat))
        .route(
            "/api/support/tickets",
            get(handlers::list_tickets).post(handlers::create_ticket),
        )
        .route(
            "/api/support/tickets/{id}",
            patch(handlers::update_ticket_status),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds the listener for `config.host:config.port`.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, SupportError> {
    let addr = format!("{}:{}", config.host, config.port);
    TcpListener::bind(&addr)
        .await
        .map_err(|e| SupportError::Internal(format!("failed to bind {addr}: {e}")))
}

/// Serves the router on `listener` until `shutdown` is cancelled.
///
/// In-flight requests are allowed to finish after cancellation.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), SupportError> {
    let addr = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string());
    tracing::info!("supportdesk listening on {addr}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| SupportError::Internal(format!("server error: {e}")))?;

    tracing::info!("supportdesk server stopped");
    Ok(())
}

/// Binds and serves in one step.
pub async fn start_server(
    config: &ServerConfig,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), SupportError> {
    let listener = bind(config).await?;
    serve(listener, state, shutdown).await
}
