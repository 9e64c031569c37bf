// ABOUTME: Application constants for validation limits, form options and service identity
// ABOUTME: Single source of truth for values shared by the core crate and the server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

//! Application-wide constants organized by domain

/// Service identity used in logs and token audiences
pub mod service_names {
    /// Name of the HTTP server binary and logging service
    pub const FLOWSTATE_SERVER: &str = "flowstate-server";
}

/// Limits enforced by the workout form schema
pub mod workout_limits {
    /// Minimum characters in a workout name
    pub const NAME_MIN_LEN: usize = 2;
    /// Minimum characters in an exercise name
    pub const EXERCISE_NAME_MIN_LEN: usize = 1;
    /// Minimum exercises per workout
    pub const MIN_EXERCISES: usize = 1;
    /// Minimum sets per exercise
    pub const MIN_SETS: i64 = 1;
    /// Minimum reps per set
    pub const MIN_REPS: i64 = 1;
    /// Minimum weight (bodyweight exercises log zero)
    pub const MIN_WEIGHT: f64 = 0.0;
    /// Minimum duration in minutes
    pub const MIN_DURATION: i64 = 0;
}

/// Options offered by the suggestion form
pub mod suggestion_form {
    /// Experience levels accepted by the form
    pub const EXPERIENCE_LEVELS: &[&str] = &["beginner", "intermediate", "advanced"];

    /// Separator used when the equipment list is flattened for the prompt
    pub const EQUIPMENT_SEPARATOR: &str = ", ";

    /// Minimum characters in the time-per-workout answer
    pub const TIME_PER_WORKOUT_MIN_LEN: usize = 2;

    /// Sent in place of an omitted current workout plan
    pub const UNSPECIFIED_PLAN: &str = "Not specified";
}

/// User-facing messages of the suggestion handler
pub mod suggestion_messages {
    /// Returned when the request fails validation
    pub const INVALID_INPUT: &str = "Invalid input.";
    /// Returned when the text-generation call fails for any reason
    pub const SERVICE_FAILURE: &str = "Failed to get suggestions from AI. Please try again later.";
    /// Returned when workout plan generation fails for any reason
    pub const PLAN_FAILURE: &str = "Failed to generate a workout plan. Please try again later.";
}

/// Document store layout
pub mod collections {
    /// Root collection of per-user documents
    pub const USERS: &str = "users";
    /// Workout sub-collection name
    pub const WORKOUTS: &str = "workouts";
}

/// Defaults for progress views
pub mod progress_defaults {
    /// Workouts shown on the dashboard
    pub const RECENT_WORKOUTS: usize = 3;
    /// Weeks shown in the weekly volume series
    pub const VOLUME_WEEKS: usize = 5;
    /// Upper bound for the weekly volume series
    pub const MAX_VOLUME_WEEKS: usize = 52;
    /// Workouts included in the history digest sent to the plan flow
    pub const DIGEST_WORKOUTS: usize = 10;
}
