// ABOUTME: SQLite implementation of the per-user workout collection store
// ABOUTME: Owner-only access, date-ordered queries and live queries driven by change broadcasts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use flowstate_core::errors::{AppError, AppResult};
use flowstate_core::models::Workout;
use sqlx::{Row, SqlitePool};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use super::{
    CollectionPath, SortOrder, WorkoutQuery, WorkoutSnapshotStream, WorkoutStore, WriteRejection,
};
use crate::logging::AppLogger;

/// Buffered change notifications per watcher before it is considered lagging
const CHANGE_BUFFER: usize = 64;

/// Workout store over the `workouts` table
#[derive(Clone, Debug)]
pub struct SqliteWorkoutStore {
    pool: SqlitePool,
    changes: broadcast::Sender<String>,
}

impl SqliteWorkoutStore {
    /// Create a store on a migrated pool
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Self { pool, changes }
    }

    fn authorized(actor: &str, path: &CollectionPath) -> bool {
        actor == path.owner()
    }

    async fn fetch(&self, owner: &str, query: WorkoutQuery) -> AppResult<Vec<Workout>> {
        let sql = match query.order {
            SortOrder::Descending => {
                "SELECT body FROM workouts WHERE user_id = ? ORDER BY date_ms DESC, rowid DESC LIMIT ?"
            }
            SortOrder::Ascending => {
                "SELECT body FROM workouts WHERE user_id = ? ORDER BY date_ms ASC, rowid ASC LIMIT ?"
            }
        };
        // SQLite treats a negative limit as unbounded
        let limit = query
            .limit
            .map_or(-1, |limit| i64::try_from(limit).unwrap_or(i64::MAX));

        let started = Instant::now();
        let rows = sqlx::query(sql)
            .bind(owner)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        AppLogger::log_database_operation("select", "workouts", true, elapsed_ms);

        rows.iter()
            .map(|row| {
                let body: String = row.try_get("body")?;
                serde_json::from_str::<Workout>(&body).map_err(AppError::from)
            })
            .collect()
    }
}

#[async_trait]
impl WorkoutStore for SqliteWorkoutStore {
    async fn write(
        &self,
        actor: &str,
        path: &CollectionPath,
        workout: &Workout,
    ) -> Result<String, WriteRejection> {
        if !Self::authorized(actor, path) {
            return Err(WriteRejection::PermissionDenied {
                path: path.to_string(),
            });
        }

        let body = serde_json::to_string(workout)
            .map_err(|e| WriteRejection::Unavailable(format!("Cannot encode workout: {e}")))?;

        let started = Instant::now();
        let result = sqlx::query(
            r"
            INSERT INTO workouts (id, user_id, name, date_ms, duration, body, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&workout.id)
        .bind(path.owner())
        .bind(&workout.name)
        .bind(workout.date)
        .bind(i64::from(workout.duration))
        .bind(&body)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        AppLogger::log_database_operation("insert", "workouts", result.is_ok(), elapsed_ms);

        result.map_err(|e| WriteRejection::Unavailable(e.to_string()))?;

        // No receivers simply means nobody is watching
        let _ = self.changes.send(path.to_string());
        Ok(workout.id.clone())
    }

    async fn query(
        &self,
        actor: &str,
        path: &CollectionPath,
        query: WorkoutQuery,
    ) -> AppResult<Vec<Workout>> {
        if !Self::authorized(actor, path) {
            return Err(AppError::permission_denied(format!(
                "Missing or insufficient permissions to read {path}"
            ))
            .with_resource_id(path.to_string()));
        }
        self.fetch(path.owner(), query).await
    }

    fn watch(
        &self,
        actor: &str,
        path: &CollectionPath,
        query: WorkoutQuery,
    ) -> AppResult<WorkoutSnapshotStream> {
        if !Self::authorized(actor, path) {
            return Err(AppError::permission_denied(format!(
                "Missing or insufficient permissions to watch {path}"
            ))
            .with_resource_id(path.to_string()));
        }

        // Subscribe before the first read so no change slips between the two
        let mut changes = self.changes.subscribe();
        let store = self.clone();
        let watched = path.to_string();
        let owner = path.owner().to_owned();

        let stream = async_stream::stream! {
            yield store.fetch(&owner, query).await;

            loop {
                match changes.recv().await {
                    Ok(changed) if changed == watched => {
                        debug!(store.path = %watched, "Collection changed, re-running live query");
                        yield store.fetch(&owner, query).await;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(store.path = %watched, skipped, "Live query lagged, re-querying");
                        yield store.fetch(&owner, query).await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
