// ABOUTME: HTTP server assembly and run loop for the insights API
// ABOUTME: Merges route groups, applies tracing/request-id/CORS/body-limit layers, and serves with graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware, Router};
use tokio::net::TcpListener;
use tower_http::{
    trace::{DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::{info, warn, Level};

use crate::config::HttpConfig;
use crate::errors::{AppError, AppResult};
use crate::lifecycle::ShutdownSignal;
use crate::middleware::{make_request_span, request_id_middleware, setup_cors};
use crate::resources::ServerResources;
use crate::routes::{HealthRoutes, InsightRoutes, JournalRoutes};

/// Build the complete application router with all middleware applied
pub fn build_app(resources: &Arc<ServerResources>, http: &HttpConfig) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(resources)))
        .merge(InsightRoutes::routes(Arc::clone(resources)))
        .merge(JournalRoutes::routes(Arc::clone(resources)))
        // Applied bottom-up: the trace span exists before the request id is recorded on it
        .layer(middleware::from_fn(request_id_middleware))
        .layer(DefaultBodyLimit::max(http.max_request_body_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_request_span)
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .layer(setup_cors(http))
}

fn bind_address(http: &HttpConfig) -> SocketAddr {
    format!("{}:{}", http.host, http.port)
        .parse()
        .unwrap_or_else(|_| {
            warn!(host = %http.host, "Invalid HTTP_HOST, binding to 127.0.0.1");
            SocketAddr::from(([127, 0, 0, 1], http.port))
        })
}

/// Serve the API until the shutdown signal fires
///
/// In-flight requests are allowed to finish after the signal; provider calls
/// still waiting on an upstream are cancelled by the router.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn run(
    resources: Arc<ServerResources>,
    http: &HttpConfig,
    shutdown: ShutdownSignal,
) -> AppResult<()> {
    let app = build_app(&resources, http);
    let addr = bind_address(http);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!("HTTP server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.triggered())
        .await
        .map_err(|e| AppError::internal(format!("Transport error: {e}")))?;

    info!("HTTP server stopped");
    Ok(())
}
