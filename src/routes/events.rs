// ABOUTME: Server-Sent Events route for asynchronous permission errors
// ABOUTME: Each connection subscribes to the channel for the authenticated user only
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    response::{
        sse::{KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::get,
    Router,
};
use flowstate_core::errors::AppError;

use super::authenticate;
use crate::notifications::sse::permission_error_stream;
use crate::resources::ServerResources;

/// Event stream routes implementation
pub struct EventRoutes;

impl EventRoutes {
    /// Create the event stream routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/events/permission-errors", get(Self::permission_errors))
            .with_state(resources)
    }

    async fn permission_errors(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let stream = permission_error_stream(&resources.permission_errors, auth.user_id);

        Ok(Sse::new(stream)
            .keep_alive(KeepAlive::default())
            .into_response())
    }
}
