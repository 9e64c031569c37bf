// ABOUTME: Workout route handlers for logging, listing, live queries and progress views
// ABOUTME: All routes are scoped to users/{userId} and require a bearer token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

//! Workout routes
//!
//! Logging answers `202 Accepted` as soon as the submission validates. Whether the
//! write was committed is reported through the live query and, on rejection, the
//! permission error stream.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::get,
    Json, Router,
};
use chrono::Utc;
use flowstate_core::constants::progress_defaults;
use flowstate_core::errors::AppError;
use futures_util::stream::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{authenticate, JsonBody};
use crate::database::{SortOrder, WorkoutQuery};
use crate::resources::ServerResources;

/// SSE event name carrying a live query snapshot
pub const SNAPSHOT_EVENT: &str = "snapshot";

/// Response to an accepted workout submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutAccepted {
    /// Id assigned to the workout
    pub id: String,
    /// Document path being written
    pub path: String,
    /// Always `pending`: the write is acknowledged asynchronously
    pub status: String,
}

/// Query parameters for listing workouts
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Maximum number of workouts
    pub limit: Option<usize>,
    /// `asc` for oldest first, newest first otherwise
    pub order: Option<String>,
}

impl ListParams {
    fn into_query(self) -> WorkoutQuery {
        let order = match self.order.as_deref() {
            Some("asc" | "ascending") => SortOrder::Ascending,
            _ => SortOrder::Descending,
        };
        WorkoutQuery {
            order,
            limit: self.limit,
        }
    }
}

/// Query parameters for the weekly volume series
#[derive(Debug, Default, Deserialize)]
pub struct VolumeParams {
    /// Number of weeks, current week included
    pub weeks: Option<usize>,
}

/// Workout routes implementation
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create all workout and progress routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/users/:user_id/workouts",
                get(Self::list_workouts).post(Self::log_workout),
            )
            .route("/api/users/:user_id/workouts/recent", get(Self::recent_workouts))
            .route("/api/users/:user_id/workouts/live", get(Self::live_workouts))
            .route("/api/users/:user_id/dashboard", get(Self::dashboard))
            .route("/api/users/:user_id/progress/volume", get(Self::weekly_volume))
            .route(
                "/api/users/:user_id/progress/exercises/:exercise",
                get(Self::exercise_progress),
            )
            .with_state(resources)
    }

    async fn log_workout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user_id): Path<String>,
        JsonBody(candidate): JsonBody<Value>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let pending = resources
            .workout_service()
            .log_workout(&auth.user_id, &user_id, &candidate)?;

        let accepted = WorkoutAccepted {
            id: pending.workout_id.clone(),
            path: pending.path.clone(),
            status: "pending".to_owned(),
        };
        // The outcome is reported through the channel and the live query
        drop(pending);

        Ok((StatusCode::ACCEPTED, Json(accepted)).into_response())
    }

    async fn list_workouts(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user_id): Path<String>,
        Query(params): Query<ListParams>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let workouts = resources
            .workout_service()
            .list(&auth.user_id, &user_id, params.into_query())
            .await?;

        Ok((StatusCode::OK, Json(workouts)).into_response())
    }

    async fn recent_workouts(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user_id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let workouts = resources
            .workout_service()
            .recent(&auth.user_id, &user_id)
            .await?;

        Ok((StatusCode::OK, Json(workouts)).into_response())
    }

    async fn live_workouts(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user_id): Path<String>,
        Query(params): Query<ListParams>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let snapshots = resources
            .workout_service()
            .watch(&auth.user_id, &user_id, params.into_query())?;

        let events = snapshots.map(|snapshot| {
            let event = match snapshot {
                Ok(workouts) => Event::default().event(SNAPSHOT_EVENT).json_data(&workouts),
                Err(e) => Event::default().event("error").json_data(&e.message),
            };
            Ok::<_, Infallible>(event.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to encode live query event");
                Event::default().event("error").data("encoding failed")
            }))
        });

        Ok(Sse::new(events)
            .keep_alive(KeepAlive::default())
            .into_response())
    }

    async fn dashboard(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user_id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let summary = resources
            .progress_service()
            .dashboard(&auth.user_id, &user_id, Utc::now())
            .await?;

        Ok((StatusCode::OK, Json(summary)).into_response())
    }

    async fn weekly_volume(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user_id): Path<String>,
        Query(params): Query<VolumeParams>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let weeks = params.weeks.unwrap_or(progress_defaults::VOLUME_WEEKS);
        let series = resources
            .progress_service()
            .weekly_volume(&auth.user_id, &user_id, weeks, Utc::now())
            .await?;

        Ok((StatusCode::OK, Json(series)).into_response())
    }

    async fn exercise_progress(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path((user_id, exercise)): Path<(String, String)>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let progress = resources
            .progress_service()
            .exercise_progress(&auth.user_id, &user_id, &exercise)
            .await?;

        Ok((StatusCode::OK, Json(progress)).into_response())
    }
}
