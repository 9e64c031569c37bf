// ABOUTME: AI route handlers for exercise suggestions and workout plan generation
// ABOUTME: Failures answer with generic messages; service details only reach the logs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use flowstate_core::errors::AppError;
use serde_json::{json, Value};

use super::{authenticate, JsonBody};
use crate::resources::ServerResources;

/// Suggestion routes implementation
pub struct SuggestionRoutes;

impl SuggestionRoutes {
    /// Create the AI routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/ai/suggestions", post(Self::suggestions))
            .route("/api/ai/workout-plan", post(Self::workout_plan))
            .with_state(resources)
    }

    /// Submit the suggestion form; the body is always a `SuggestionsState`
    async fn suggestions(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        JsonBody(form): JsonBody<Value>,
    ) -> Result<Response, AppError> {
        authenticate(&headers, &resources)?;
        let state = resources.suggestion_service().submit_form(&form).await;

        let status = if state.success {
            StatusCode::OK
        } else if state.violations.is_empty() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::BAD_REQUEST
        };
        Ok((status, Json(state)).into_response())
    }

    async fn workout_plan(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        JsonBody(input): JsonBody<Value>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        match resources
            .workout_plan_service()
            .generate_plan(&auth.user_id, &input)
            .await
        {
            Ok(plan) => Ok((StatusCode::OK, Json(plan)).into_response()),
            Err(failure) => {
                let status = if failure.is_invalid_input() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::BAD_GATEWAY
                };
                let body = json!({
                    "error": failure.message,
                    "violations": failure.violations,
                });
                Ok((status, Json(body)).into_response())
            }
        }
    }
}
