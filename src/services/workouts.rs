// ABOUTME: Workout logging service: validate, assign ids, write in the background
// ABOUTME: Store rejections are routed to the permission error channel, never returned inline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

//! # Workout Service
//!
//! Logging a workout returns as soon as the candidate validates. The write itself runs
//! on a background task; its outcome is available through [`PendingWrite`] and, when
//! the store refuses it, as a `create` [`PermissionError`] on the channel.

use std::sync::Arc;

use flowstate_core::errors::{AppResult, ErrorCode};
use flowstate_core::models::{NewWorkout, PermissionError, Workout, WriteOperation};
use flowstate_core::schemas;
use serde_json::Value;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::database::{
    CollectionPath, WorkoutQuery, WorkoutSnapshotStream, WorkoutStore, WriteRejection,
};
use crate::logging::AppLogger;
use crate::notifications::PermissionErrorChannel;

/// Final result of a background write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Stored under the given document id
    Committed(String),
    /// Store refused or failed the write
    Rejected(WriteRejection),
}

/// Handle to a workout write that has been dispatched but not yet acknowledged
#[derive(Debug)]
pub struct PendingWrite {
    /// Id assigned to the new workout
    pub workout_id: String,
    /// Document path the workout is written to
    pub path: String,
    ack: oneshot::Receiver<WriteOutcome>,
}

impl PendingWrite {
    /// Wait for the store to acknowledge or reject the write
    pub async fn acknowledged(self) -> WriteOutcome {
        self.ack.await.unwrap_or_else(|_| {
            WriteOutcome::Rejected(WriteRejection::Unavailable(
                "write task ended without acknowledgement".into(),
            ))
        })
    }
}

/// Workout logging and reads on behalf of an authenticated actor
#[derive(Clone)]
pub struct WorkoutService {
    store: Arc<dyn WorkoutStore>,
    permission_errors: Arc<PermissionErrorChannel>,
    recent_limit: usize,
}

impl WorkoutService {
    /// Create a service over a store and the process permission error channel
    #[must_use]
    pub fn new(
        store: Arc<dyn WorkoutStore>,
        permission_errors: Arc<PermissionErrorChannel>,
        recent_limit: usize,
    ) -> Self {
        Self {
            store,
            permission_errors,
            recent_limit,
        }
    }

    /// Validate a new-workout submission and dispatch the write
    ///
    /// Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` with field violations when the candidate does not
    /// validate. Store rejections are never returned here.
    pub fn log_workout(&self, actor: &str, owner: &str, candidate: &Value) -> AppResult<PendingWrite> {
        let path = CollectionPath::workouts(owner)?;
        let new_workout: NewWorkout = schemas::workout_form().validate_into(candidate)?;
        let workout = Self::assign_ids(new_workout);

        let workout_id = workout.id.clone();
        let document = path.document(&workout_id);
        let (ack_tx, ack_rx) = oneshot::channel();

        let store = Arc::clone(&self.store);
        let channel = Arc::clone(&self.permission_errors);
        let actor = actor.to_owned();

        tokio::spawn(async move {
            let outcome = match store.write(&actor, &path, &workout).await {
                Ok(id) => {
                    AppLogger::log_workout_write(&actor, &path.to_string(), &id, true);
                    WriteOutcome::Committed(id)
                }
                Err(rejection) => {
                    AppLogger::log_workout_write(&actor, &path.to_string(), &workout.id, false);
                    let event = PermissionError::new(path.to_string(), WriteOperation::Create)
                        .with_resource_data(serde_json::to_value(&workout).unwrap_or(Value::Null))
                        .with_auth_user(actor.as_str())
                        .with_message(rejection.to_string());
                    channel.publish(&event);
                    WriteOutcome::Rejected(rejection)
                }
            };
            // The caller may have stopped waiting
            let _ = ack_tx.send(outcome);
        });

        Ok(PendingWrite {
            workout_id,
            path: document,
            ack: ack_rx,
        })
    }

    fn assign_ids(new_workout: NewWorkout) -> Workout {
        let mut workout = new_workout.into_workout(Uuid::new_v4().to_string());
        for exercise in &mut workout.exercises {
            if exercise.id.is_none() {
                exercise.id = Some(Uuid::new_v4().to_string());
            }
        }
        workout
    }

    /// Read a user's workouts
    ///
    /// # Errors
    ///
    /// Returns `PERMISSION_DENIED` (after publishing a `list` permission error) when
    /// the actor does not own the collection, or a database error
    pub async fn list(&self, actor: &str, owner: &str, query: WorkoutQuery) -> AppResult<Vec<Workout>> {
        let path = CollectionPath::workouts(owner)?;
        let result = self.store.query(actor, &path, query).await;
        if let Err(error) = &result {
            self.report_denied_read(actor, &path, error.code);
        }
        result
    }

    /// The configured number of most recent workouts
    ///
    /// # Errors
    ///
    /// Same as [`WorkoutService::list`]
    pub async fn recent(&self, actor: &str, owner: &str) -> AppResult<Vec<Workout>> {
        self.list(actor, owner, WorkoutQuery::recent(self.recent_limit))
            .await
    }

    /// Live query over a user's workouts
    ///
    /// # Errors
    ///
    /// Returns `PERMISSION_DENIED` (after publishing a `list` permission error) when
    /// the actor does not own the collection
    pub fn watch(&self, actor: &str, owner: &str, query: WorkoutQuery) -> AppResult<WorkoutSnapshotStream> {
        let path = CollectionPath::workouts(owner)?;
        let result = self.store.watch(actor, &path, query);
        if let Err(error) = &result {
            self.report_denied_read(actor, &path, error.code);
        }
        result
    }

    /// Number of workouts shown in recent views
    #[must_use]
    pub const fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    fn report_denied_read(&self, actor: &str, path: &CollectionPath, code: ErrorCode) {
        if code == ErrorCode::PermissionDenied {
            let event =
                PermissionError::new(path.to_string(), WriteOperation::List).with_auth_user(actor);
            self.permission_errors.publish(&event);
        }
    }
}
