// ABOUTME: Core data models for the FlowState workout tracking platform
// ABOUTME: Re-exports workout, suggestion and permission error records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

//! # Data Models
//!
//! Records exchanged between the HTTP surface, the document store and the
//! prompt flows. Field names serialize in `camelCase` to match the JSON the
//! web client sends and receives.
//!
//! ## Core Models
//!
//! - `Workout` / `Exercise`: a logged training session and its lifts
//! - `SuggestionRequest` / `SuggestionResult`: exercise suggestion flow records
//! - `WorkoutPlanRequest` / `WorkoutPlan`: workout plan flow records
//! - `PermissionError`: a store access rejection published to listeners

mod permission;
mod suggestion;
mod workout;

// Workout domain
pub use workout::{Exercise, NewWorkout, Workout};

// Suggestion domain
pub use suggestion::{
    ExperienceLevel, SuggestionForm, SuggestionRequest, SuggestionResult, WorkoutPlan,
    WorkoutPlanRequest,
};

// Store access rejections
pub use permission::{PermissionError, WriteOperation};
