// ABOUTME: Prompt templates for the suggestion and workout plan flows, loaded at compile time
// ABOUTME: Renders templates with strict undefined handling and no escaping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

//! # Prompt Templates
//!
//! Templates live in markdown files next to this module. Slots use `{{ name }}` and
//! are substituted verbatim from the flow's input record; a slot with no value is an
//! error rather than an empty string.

use std::sync::OnceLock;

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

/// Exercise suggestion prompt
pub const EXERCISE_SUGGESTIONS_TEMPLATE: &str = include_str!("exercise_suggestions.md");

/// Workout plan prompt
pub const WORKOUT_PLAN_TEMPLATE: &str = include_str!("workout_plan.md");

/// System instruction asking for JSON that matches a described shape
pub const STRUCTURED_OUTPUT_TEMPLATE: &str = include_str!("structured_output.md");

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

fn environment() -> &'static Environment<'static> {
    ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env
    })
}

/// Render a template against a serializable context
///
/// # Errors
///
/// Returns the template error when the syntax is invalid or a slot is undefined
pub fn render<S: Serialize>(template: &str, context: &S) -> Result<String, minijinja::Error> {
    environment().render_str(template, context)
}

/// Build the system instruction for a JSON shape description
///
/// # Errors
///
/// Returns the template error if rendering fails
pub fn structured_output_instruction(shape: &serde_json::Value) -> Result<String, minijinja::Error> {
    let shape = serde_json::to_string_pretty(shape).unwrap_or_else(|_| shape.to_string());
    render(STRUCTURED_OUTPUT_TEMPLATE, &minijinja::context! { shape => shape })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slots_are_substituted_verbatim() {
        let prompt = render(
            EXERCISE_SUGGESTIONS_TEMPLATE,
            &json!({
                "fitnessGoal": "muscle-gain",
                "currentWorkoutPlan": "Push <heavy> & pull",
                "experienceLevel": "beginner",
                "availableEquipment": "dumbbells, barbell",
                "timePerWorkout": "45 minutes"
            }),
        )
        .unwrap_or_default();

        assert!(prompt.starts_with("You are a personal fitness trainer."));
        assert!(prompt.contains("Current Workout Plan: Push <heavy> & pull\n"));
        assert!(prompt.contains("Available Equipment: dumbbells, barbell\n"));
    }

    #[test]
    fn test_missing_slot_is_an_error() {
        let result = render(WORKOUT_PLAN_TEMPLATE, &json!({ "fitnessGoals": "endurance" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_structured_output_instruction_embeds_shape() {
        let instruction = structured_output_instruction(&json!({ "type": "object" }))
            .unwrap_or_default();
        assert!(instruction.contains("\"type\": \"object\""));
    }
}
