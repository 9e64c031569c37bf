// ABOUTME: Workout plan flow definition
// ABOUTME: Maps goals, progress and past workout data to a personalized plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

use flowstate_core::models::{WorkoutPlan, WorkoutPlanRequest};
use flowstate_core::schemas;
use flowstate_core::validation::Schema;

use super::PromptFlow;
use crate::llm::prompts::WORKOUT_PLAN_TEMPLATE;

/// Generates a personalized workout plan
pub struct WorkoutPlanFlow;

impl PromptFlow for WorkoutPlanFlow {
    const NAME: &'static str = "generateWorkoutPlan";
    const TEMPLATE: &'static str = WORKOUT_PLAN_TEMPLATE;
    type Input = WorkoutPlanRequest;
    type Output = WorkoutPlan;

    fn input_schema() -> Schema {
        schemas::workout_plan_request()
    }

    fn output_schema() -> Schema {
        schemas::workout_plan()
    }
}
