// ABOUTME: Domain service layer for workout logging, progress and AI suggestions
// ABOUTME: Protocol-agnostic business logic used by the HTTP route handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

//! Domain service layer
//!
//! Route handlers stay thin: they authenticate, extract parameters and delegate here.

/// Workout logging with background writes and permission error routing
pub mod workouts;

/// Dashboard, weekly volume and per-exercise progress aggregation
pub mod progress;

/// Exercise suggestion and workout plan requests
pub mod suggestions;

pub use progress::ProgressService;
pub use suggestions::{SuggestionFailure, SuggestionService, SuggestionsState, WorkoutPlanService};
pub use workouts::{PendingWrite, WorkoutService, WriteOutcome};
