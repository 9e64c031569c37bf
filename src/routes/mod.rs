// ABOUTME: Route module organization for the FlowState HTTP API
// ABOUTME: Each domain module holds route definitions and thin handlers delegating to services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

//! HTTP routes organized by domain

/// Permission error event stream
pub mod events;
/// Health check and readiness routes
pub mod health;
/// Exercise suggestion and workout plan routes
pub mod suggestions;
/// Workout logging, listing, live queries and progress routes
pub mod workouts;

pub use events::EventRoutes;
pub use health::HealthRoutes;
pub use suggestions::SuggestionRoutes;
pub use workouts::WorkoutRoutes;

use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderMap};
use axum::Json;
use flowstate_core::errors::AppError;
use serde::de::DeserializeOwned;

use crate::auth::AuthResult;
use crate::logging::AppLogger;
use crate::resources::ServerResources;

/// Authenticate the bearer token of a request
pub(crate) fn authenticate(
    headers: &HeaderMap,
    resources: &Arc<ServerResources>,
) -> Result<AuthResult, AppError> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let result = resources.auth.authenticate(authorization);
    match &result {
        Ok(auth) => AppLogger::log_auth_event(Some(&auth.user_id), "bearer_token", true),
        Err(e) => AppLogger::log_auth_event(None, e.code.description(), false),
    }
    result
}

/// JSON request body whose rejections use the standard error envelope
pub(crate) struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(request, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(|rejection| AppError::invalid_input(rejection.body_text()))
    }
}
