// ABOUTME: Document store for per-user workout collections backed by SQLite
// ABOUTME: Connection management, schema migration and the WorkoutStore contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

//! # Database Management
//!
//! Workouts live in document-shaped collections addressed as
//! `users/{userId}/workouts`. Each document is stored as a JSON body next to the
//! columns used for ownership checks and ordering.
//!
//! Access rule: only the owner named in a collection path may read or write it.

mod workouts;

pub use workouts::SqliteWorkoutStore;

use std::fmt;
use std::path::Path;
use std::pin::Pin;
use std::str::FromStr;

use async_trait::async_trait;
use flowstate_core::constants::collections;
use flowstate_core::errors::{AppError, AppResult};
use flowstate_core::models::Workout;
use futures_util::stream::Stream;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Database connection pool and schema management
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and run migrations
    ///
    /// `sqlite::memory:` URLs get a single long-lived connection so every query sees
    /// the same in-memory database.
    ///
    /// # Errors
    ///
    /// Returns a database error if the connection or migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(database_url)
                .await?
        } else {
            ensure_parent_dir(database_url)?;
            let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the connection pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables and indexes
    ///
    /// # Errors
    ///
    /// Returns a database error if a statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workouts (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                date_ms INTEGER NOT NULL,
                duration INTEGER NOT NULL DEFAULT 0,
                body TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_workouts_user_date ON workouts(user_id, date_ms)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Round-trip a trivial query
    ///
    /// # Errors
    ///
    /// Returns a database error if the pool cannot serve a query
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn ensure_parent_dir(database_url: &str) -> AppResult<()> {
    let path = database_url
        .trim_start_matches("sqlite:")
        .trim_start_matches("//")
        .split('?')
        .next()
        .unwrap_or_default();

    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| AppError::database(format!("Cannot create {}: {e}", parent.display()))),
        _ => Ok(()),
    }
}

// ============================================================================
// Collection addressing
// ============================================================================

/// Address of a user's workout collection (`users/{userId}/workouts`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath {
    owner: String,
}

impl CollectionPath {
    /// Workout collection of the given user
    ///
    /// # Errors
    ///
    /// Returns an invalid input error when the user id is empty or contains `/`
    pub fn workouts(owner: impl Into<String>) -> AppResult<Self> {
        let owner = owner.into();
        if owner.is_empty() || owner.contains('/') {
            return Err(AppError::invalid_input(format!("Invalid user id: {owner:?}")));
        }
        Ok(Self { owner })
    }

    /// User who owns the collection
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Path of a document inside the collection
    #[must_use]
    pub fn document(&self, id: &str) -> String {
        format!("{self}/{id}")
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            collections::USERS,
            self.owner,
            collections::WORKOUTS
        )
    }
}

impl FromStr for CollectionPath {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split('/').collect::<Vec<_>>().as_slice() {
            [users, owner, workouts]
                if *users == collections::USERS && *workouts == collections::WORKOUTS =>
            {
                Self::workouts(*owner)
            }
            _ => Err(AppError::invalid_input(format!("Unknown collection path: {s}"))),
        }
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Ordering by workout date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first
    #[default]
    Descending,
    /// Oldest first
    Ascending,
}

/// Collection query: ordered by date with an optional limit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkoutQuery {
    /// Date ordering
    pub order: SortOrder,
    /// Maximum number of documents
    pub limit: Option<usize>,
}

impl WorkoutQuery {
    /// The `limit` most recent workouts
    #[must_use]
    pub const fn recent(limit: usize) -> Self {
        Self {
            order: SortOrder::Descending,
            limit: Some(limit),
        }
    }

    /// Every workout, oldest first
    #[must_use]
    pub const fn chronological() -> Self {
        Self {
            order: SortOrder::Ascending,
            limit: None,
        }
    }
}

/// Why the store refused or failed a write
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteRejection {
    /// Actor may not write to the collection
    #[error("Missing or insufficient permissions to write {path}")]
    PermissionDenied {
        /// Target collection
        path: String,
    },
    /// The store could not complete the write
    #[error("Workout store unavailable: {0}")]
    Unavailable(String),
}

/// Live query results: a fresh snapshot every time the collection changes
pub type WorkoutSnapshotStream = Pin<Box<dyn Stream<Item = AppResult<Vec<Workout>>> + Send>>;

/// Per-user workout collections
#[async_trait]
pub trait WorkoutStore: Send + Sync {
    /// Persist a workout, acknowledging with its document id
    async fn write(
        &self,
        actor: &str,
        path: &CollectionPath,
        workout: &Workout,
    ) -> Result<String, WriteRejection>;

    /// Read workouts ordered by date
    async fn query(
        &self,
        actor: &str,
        path: &CollectionPath,
        query: WorkoutQuery,
    ) -> AppResult<Vec<Workout>>;

    /// Subscribe to a query; the stream yields the current result immediately and
    /// again after every change to the collection
    ///
    /// # Errors
    ///
    /// Returns `PERMISSION_DENIED` when the actor does not own the collection
    fn watch(
        &self,
        actor: &str,
        path: &CollectionPath,
        query: WorkoutQuery,
    ) -> AppResult<WorkoutSnapshotStream>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_path_round_trip() {
        let path = CollectionPath::workouts("abc123").ok();
        assert_eq!(
            path.as_ref().map(ToString::to_string).as_deref(),
            Some("users/abc123/workouts")
        );
        assert_eq!("users/abc123/workouts".parse::<CollectionPath>().ok(), path);
    }

    #[test]
    fn test_collection_path_rejects_nested_owner() {
        assert!(CollectionPath::workouts("a/b").is_err());
        assert!(CollectionPath::workouts("").is_err());
        assert!("users/abc/meals".parse::<CollectionPath>().is_err());
    }

    #[test]
    fn test_parent_dir_is_created_for_file_urls() {
        let dir = tempfile::tempdir().ok();
        let Some(dir) = dir else { return };
        let url = format!("sqlite:{}/nested/flowstate.db", dir.path().display());
        assert!(ensure_parent_dir(&url).is_ok());
        assert!(dir.path().join("nested").is_dir());
    }
}
