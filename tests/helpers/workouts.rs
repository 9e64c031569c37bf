// ABOUTME: Workout fixtures and a configurable in-memory workout store
// ABOUTME: The store can be told to reject writes to exercise the permission error path

use std::sync::Mutex;

use async_trait::async_trait;
use flowstate::database::{
    CollectionPath, WorkoutQuery, WorkoutSnapshotStream, WorkoutStore, WriteRejection,
};
use flowstate::errors::{AppError, AppResult};
use flowstate::models::Workout;
use serde_json::{json, Value};

/// A valid "new workout" submission
pub fn leg_day() -> Value {
    json!({
        "name": "Leg Day",
        "date": "2025-03-01",
        "duration": 60,
        "exercises": [
            { "name": "Squat", "sets": 5, "reps": 5, "weight": 100 },
            { "name": "Lunge", "sets": 3, "reps": 12, "weight": 20 }
        ]
    })
}

/// A submission on `date` with one exercise
pub fn single_exercise(name: &str, date: &str, exercise: &str, weight: f64) -> Value {
    json!({
        "name": name,
        "date": date,
        "exercises": [{ "name": exercise, "sets": 3, "reps": 5, "weight": weight }]
    })
}

/// Store that never persists and answers every write with a fixed rejection
pub struct RejectingStore {
    rejection: WriteRejection,
    attempts: Mutex<Vec<Workout>>,
}

impl RejectingStore {
    pub fn new(rejection: WriteRejection) -> Self {
        Self {
            rejection,
            attempts: Mutex::new(Vec::new()),
        }
    }

    pub fn attempts(&self) -> Vec<Workout> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkoutStore for RejectingStore {
    async fn write(
        &self,
        _actor: &str,
        _path: &CollectionPath,
        workout: &Workout,
    ) -> Result<String, WriteRejection> {
        self.attempts.lock().unwrap().push(workout.clone());
        Err(self.rejection.clone())
    }

    async fn query(
        &self,
        _actor: &str,
        _path: &CollectionPath,
        _query: WorkoutQuery,
    ) -> AppResult<Vec<Workout>> {
        Err(AppError::permission_denied("reads are not allowed"))
    }

    fn watch(
        &self,
        _actor: &str,
        _path: &CollectionPath,
        _query: WorkoutQuery,
    ) -> AppResult<WorkoutSnapshotStream> {
        Err(AppError::permission_denied("reads are not allowed"))
    }
}
