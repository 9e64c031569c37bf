// ABOUTME: Shared server resources created once at startup and handed to every route
// ABOUTME: Owns the database, workout store, token manager, text generation provider and error channel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

//! # Server Resources
//!
//! Everything expensive or process-scoped is built here once and shared behind
//! `Arc`s. Services are cheap views over these resources and are created per call.

use std::sync::Arc;

use flowstate_core::errors::AppResult;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::{Database, SqliteWorkoutStore, WorkoutStore};
use crate::flows::FlowRunner;
use crate::llm::{GeminiProvider, LlmProvider};
use crate::notifications::PermissionErrorChannel;
use crate::services::{ProgressService, SuggestionService, WorkoutPlanService, WorkoutService};

/// Process-wide resources shared by all handlers
pub struct ServerResources {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Database pool
    pub database: Database,
    /// Workout collections
    pub workouts: Arc<dyn WorkoutStore>,
    /// Bearer token validation
    pub auth: AuthManager,
    /// Hosted text generation
    pub llm: Arc<dyn LlmProvider>,
    /// Asynchronous write rejection notifications
    pub permission_errors: Arc<PermissionErrorChannel>,
}

impl ServerResources {
    /// Assemble resources from already constructed parts
    #[must_use]
    pub fn new(config: Arc<ServerConfig>, database: Database, llm: Arc<dyn LlmProvider>) -> Self {
        let workouts: Arc<dyn WorkoutStore> =
            Arc::new(SqliteWorkoutStore::new(database.pool().clone()));
        let auth = AuthManager::new(&config.auth);

        Self {
            config,
            database,
            workouts,
            auth,
            llm,
            permission_errors: Arc::new(PermissionErrorChannel::new()),
        }
    }

    /// Connect to the configured database and Gemini
    ///
    /// # Errors
    ///
    /// Returns a database error when the connection or migration fails
    pub async fn from_config(config: ServerConfig) -> AppResult<Self> {
        let database = Database::new(&config.database_url).await?;
        let llm: Arc<dyn LlmProvider> = Arc::new(GeminiProvider::from_config(&config.llm));
        Ok(Self::new(Arc::new(config), database, llm))
    }

    /// Workout logging and reads
    #[must_use]
    pub fn workout_service(&self) -> WorkoutService {
        WorkoutService::new(
            Arc::clone(&self.workouts),
            Arc::clone(&self.permission_errors),
            self.config.recent_workouts_limit,
        )
    }

    /// Progress aggregation
    #[must_use]
    pub fn progress_service(&self) -> ProgressService {
        ProgressService::new(self.workout_service())
    }

    /// Exercise suggestions
    #[must_use]
    pub fn suggestion_service(&self) -> SuggestionService {
        SuggestionService::new(self.flow_runner())
    }

    /// Workout plan generation
    #[must_use]
    pub fn workout_plan_service(&self) -> WorkoutPlanService {
        WorkoutPlanService::new(self.flow_runner(), self.progress_service())
    }

    fn flow_runner(&self) -> FlowRunner {
        FlowRunner::new(Arc::clone(&self.llm))
    }
}
