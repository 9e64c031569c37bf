// ABOUTME: HTTP server assembly: merges domain routers and applies the tower-http stack
// ABOUTME: Request ids, tracing spans, CORS and body limits wrap every route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::body::Body;
use axum::http::HeaderName;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::{make_request_span, setup_cors, REQUEST_ID_HEADER};
use crate::resources::ServerResources;
use crate::routes::{EventRoutes, HealthRoutes, SuggestionRoutes, WorkoutRoutes};

/// Largest accepted request body
const MAX_BODY_BYTES: usize = 256 * 1024;

/// Build the complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let cors = setup_cors(&resources.config);

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(WorkoutRoutes::routes(Arc::clone(&resources)))
        .merge(SuggestionRoutes::routes(Arc::clone(&resources)))
        .merge(EventRoutes::routes(resources))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

/// Serve the API until `shutdown` resolves
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails
pub async fn serve(
    resources: Arc<ServerResources>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], resources.config.http_port));
    let app = build_router(resources);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {addr}"))?;
    info!("HTTP server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    info!("HTTP server stopped");
    Ok(())
}
