// ABOUTME: Health check route handlers for service monitoring
// ABOUTME: Liveness and readiness endpoints reporting the configured provider route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

//! Health check routes for load balancers and uptime probes

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use wellness_core::constants::service_names;

use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .route("/ready", get(Self::handle_ready))
            .with_state(resources)
    }

    async fn handle_health() -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "service": service_names::WELLNESS_INSIGHTS,
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    async fn handle_ready(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
        let (primary, secondary) = resources.router.provider_names();
        Json(json!({
            "status": "ready",
            "routeMode": resources.router.mode().as_str(),
            "providers": {
                "primary": primary,
                "secondary": secondary
            },
            "journalEntries": resources.journal.len().await,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }
}
