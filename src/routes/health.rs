// ABOUTME: Health check route handlers for liveness and readiness probes
// ABOUTME: Readiness round-trips the database and reports live permission error listeners
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the unauthenticated health routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::health))
            .route("/ready", get(Self::ready))
            .with_state(resources)
    }

    async fn health() -> Json<serde_json::Value> {
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    async fn ready(State(resources): State<Arc<ServerResources>>) -> impl IntoResponse {
        let database = resources.database.ping().await;
        let status = if database.is_ok() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        (
            status,
            Json(json!({
                "status": if database.is_ok() { "ready" } else { "unavailable" },
                "database": database.as_ref().map_or_else(|e| e.message.clone(), |()| "ok".to_owned()),
                "permissionErrorListeners": resources.permission_errors.subscriber_count(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
        )
    }
}
