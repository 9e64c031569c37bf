// ABOUTME: Exercise suggestion flow definition
// ABOUTME: Maps a SuggestionRequest to suggested exercises with an explanation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

use flowstate_core::models::{SuggestionRequest, SuggestionResult};
use flowstate_core::schemas;
use flowstate_core::validation::Schema;

use super::PromptFlow;
use crate::llm::prompts::EXERCISE_SUGGESTIONS_TEMPLATE;

/// Suggests exercises for a user's goal, plan, level, equipment and time budget
pub struct ExerciseSuggestionsFlow;

impl PromptFlow for ExerciseSuggestionsFlow {
    const NAME: &'static str = "suggestExercises";
    const TEMPLATE: &'static str = EXERCISE_SUGGESTIONS_TEMPLATE;
    type Input = SuggestionRequest;
    type Output = SuggestionResult;

    fn input_schema() -> Schema {
        schemas::suggestion_request()
    }

    fn output_schema() -> Schema {
        schemas::suggestion_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::FlowRunner;

    #[test]
    fn test_prompt_lists_every_input_field() {
        let input = SuggestionRequest {
            fitness_goal: "weight-loss".into(),
            current_workout_plan: "Not specified".into(),
            experience_level: "beginner".into(),
            available_equipment: "bodyweight, resistance-bands".into(),
            time_per_workout: "30 minutes".into(),
        };

        let prompt = FlowRunner::render::<ExerciseSuggestionsFlow>(&input).unwrap_or_default();
        for line in [
            "Fitness Goal: weight-loss",
            "Current Workout Plan: Not specified",
            "Experience Level: beginner",
            "Available Equipment: bodyweight, resistance-bands",
            "Time per workout: 30 minutes",
        ] {
            assert!(prompt.contains(line), "missing {line}");
        }
    }
}
