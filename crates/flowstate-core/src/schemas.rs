// ABOUTME: Declared record shapes for the workout form, suggestion form and prompt flows
// ABOUTME: Each function builds a Schema the validator checks candidate records against
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

//! Record shapes
//!
//! Messages attached here are shown to users verbatim, so they read as sentences.

use serde_json::json;

use crate::constants::suggestion_form::{EXPERIENCE_LEVELS, TIME_PER_WORKOUT_MIN_LEN};
use crate::constants::workout_limits::{
    EXERCISE_NAME_MIN_LEN, MIN_DURATION, MIN_EXERCISES, MIN_REPS, MIN_SETS, MIN_WEIGHT,
    NAME_MIN_LEN,
};
use crate::validation::{FieldSpec, Schema};

/// One exercise row of the workout form
#[must_use]
pub fn exercise() -> Schema {
    Schema::new("Exercise")
        .field(
            FieldSpec::text("name")
                .min_len(EXERCISE_NAME_MIN_LEN)
                .message("Exercise name is required."),
        )
        .field(
            FieldSpec::integer("sets")
                .min(MIN_SETS)
                .message("At least 1 set is required."),
        )
        .field(
            FieldSpec::integer("reps")
                .min(MIN_REPS)
                .message("At least 1 rep is required."),
        )
        .field(
            FieldSpec::number("weight")
                .min_value(MIN_WEIGHT)
                .message("Weight cannot be negative."),
        )
}

/// The "new workout" form
#[must_use]
pub fn workout_form() -> Schema {
    Schema::new("Workout")
        .field(
            FieldSpec::text("name")
                .min_len(NAME_MIN_LEN)
                .message("Workout name must be at least 2 characters."),
        )
        .field(FieldSpec::timestamp("date").message("A date for the workout is required."))
        .field(
            FieldSpec::integer("duration")
                .min(MIN_DURATION)
                .default_value(json!(0))
                .message("Duration cannot be negative."),
        )
        .field(
            FieldSpec::records("exercises", exercise())
                .min_items(MIN_EXERCISES)
                .message("Add at least one exercise."),
        )
}

/// Input of the exercise suggestion flow; every field is a non-empty string
#[must_use]
pub fn suggestion_request() -> Schema {
    Schema::new("SuggestionRequest")
        .field(
            FieldSpec::text("fitnessGoal")
                .min_len(1)
                .describe("The user's fitness goal, e.g. muscle-gain"),
        )
        .field(
            FieldSpec::text("currentWorkoutPlan")
                .min_len(1)
                .describe("The user's current workout plan"),
        )
        .field(
            FieldSpec::text("experienceLevel")
                .min_len(1)
                .describe("The user's experience level, e.g. beginner"),
        )
        .field(
            FieldSpec::text("availableEquipment")
                .min_len(1)
                .describe("Comma-separated list of available equipment"),
        )
        .field(
            FieldSpec::text("timePerWorkout")
                .min_len(1)
                .describe("Time available per workout, e.g. 45 minutes"),
        )
}

/// Output of the exercise suggestion flow
#[must_use]
pub fn suggestion_result() -> Schema {
    Schema::new("SuggestionResult")
        .field(
            FieldSpec::text_list("suggestedExercises")
                .describe("A list of suggested exercises"),
        )
        .field(
            FieldSpec::text("explanation")
                .describe("Explanation of why these exercises are suitable for the user"),
        )
}

/// Input of the workout plan flow
#[must_use]
pub fn workout_plan_request() -> Schema {
    Schema::new("WorkoutPlanRequest")
        .field(
            FieldSpec::text("fitnessGoals")
                .min_len(1)
                .describe("The user's fitness goals, e.g. lose weight, gain muscle"),
        )
        .field(
            FieldSpec::text("currentProgress")
                .min_len(1)
                .describe("The user's current fitness progress"),
        )
        .field(
            FieldSpec::text("pastWorkoutData")
                .min_len(1)
                .describe("Summary of the user's past workouts"),
        )
}

/// Output of the workout plan flow
#[must_use]
pub fn workout_plan() -> Schema {
    Schema::new("WorkoutPlan").field(
        FieldSpec::text("workoutPlan")
            .min_len(1)
            .describe("A personalized workout plan for the user"),
    )
}

/// The "get suggestions" form
#[must_use]
pub fn suggestion_form() -> Schema {
    Schema::new("SuggestionForm")
        .field(
            FieldSpec::text("fitnessGoal")
                .min_len(1)
                .message("Please select a fitness goal."),
        )
        .field(
            FieldSpec::choice("experienceLevel", EXPERIENCE_LEVELS)
                .message("Please select your experience level."),
        )
        .field(
            FieldSpec::text("timePerWorkout")
                .min_len(TIME_PER_WORKOUT_MIN_LEN)
                .message("Please enter your available time."),
        )
        .field(
            FieldSpec::text_list("availableEquipment")
                .min_items(1)
                .skip_blank_items()
                .message("You have to select at least one item."),
        )
        .field(FieldSpec::text("currentWorkoutPlan").optional())
}
