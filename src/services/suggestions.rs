// ABOUTME: Suggestion request handler and workout plan generation on top of prompt flows
// ABOUTME: Maps flow failures to generic user-facing messages and logs the underlying error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

//! # Suggestion Handlers
//!
//! The handlers never surface service errors or model output problems to the caller.
//! Validation violations are our own messages and are returned alongside the
//! generic "Invalid input." message.

use flowstate_core::constants::suggestion_messages;
use flowstate_core::models::{SuggestionForm, SuggestionResult, WorkoutPlan};
use flowstate_core::schemas;
use flowstate_core::validation::FieldViolation;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use super::progress::ProgressService;
use crate::flows::{ExerciseSuggestionsFlow, FlowError, FlowRunner, PromptFlow, WorkoutPlanFlow};

/// A suggestion or plan request that did not produce a result
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SuggestionFailure {
    /// Generic user-facing message
    pub message: String,
    /// Field violations when the input was rejected
    pub violations: Vec<FieldViolation>,
}

impl SuggestionFailure {
    fn invalid_input(violations: Vec<FieldViolation>) -> Self {
        Self {
            message: suggestion_messages::INVALID_INPUT.to_owned(),
            violations,
        }
    }

    fn generic(message: &str) -> Self {
        Self {
            message: message.to_owned(),
            violations: Vec::new(),
        }
    }

    /// Whether the failure was caused by the caller's input
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        !self.violations.is_empty()
    }
}

/// Display-ready outcome of a suggestion form submission
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsState {
    /// Whether suggestions were produced
    pub success: bool,
    /// Generic failure message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Suggestions on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<SuggestionResult>,
    /// Field violations on invalid input
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}

impl SuggestionsState {
    /// State for a failed submission
    #[must_use]
    pub fn failed(failure: SuggestionFailure) -> Self {
        Self {
            success: false,
            error: Some(failure.message),
            data: None,
            violations: failure.violations,
        }
    }
}

impl From<Result<SuggestionResult, SuggestionFailure>> for SuggestionsState {
    fn from(result: Result<SuggestionResult, SuggestionFailure>) -> Self {
        match result {
            Ok(data) => Self {
                success: true,
                error: None,
                data: Some(data),
                violations: Vec::new(),
            },
            Err(failure) => Self::failed(failure),
        }
    }
}

fn map_flow_error<F: PromptFlow>(error: FlowError, failure_message: &str) -> SuggestionFailure {
    match error {
        FlowError::InvalidInput(errors) => SuggestionFailure::invalid_input(errors.into_violations()),
        other => {
            error!(flow = F::NAME, error = %other, "Prompt flow failed");
            SuggestionFailure::generic(failure_message)
        }
    }
}

/// Exercise suggestions for a user's goal, experience and equipment
#[derive(Clone)]
pub struct SuggestionService {
    runner: FlowRunner,
}

impl SuggestionService {
    /// Create a handler running flows through `runner`
    #[must_use]
    pub const fn new(runner: FlowRunner) -> Self {
        Self { runner }
    }

    /// Validate a suggestion request and run the suggestion flow once
    ///
    /// # Errors
    ///
    /// Returns a [`SuggestionFailure`] with "Invalid input." and the violations when
    /// the request does not validate, or the generic service failure message when
    /// the flow fails for any other reason
    pub async fn request_suggestions(&self, input: &Value) -> Result<SuggestionResult, SuggestionFailure> {
        self.runner
            .run::<ExerciseSuggestionsFlow>(input)
            .await
            .map_err(|e| {
                map_flow_error::<ExerciseSuggestionsFlow>(e, suggestion_messages::SERVICE_FAILURE)
            })
    }

    /// Handle a suggestion form submission
    pub async fn submit_form(&self, form: &Value) -> SuggestionsState {
        let form: SuggestionForm = match schemas::suggestion_form().validate_into(form) {
            Ok(form) => form,
            Err(errors) => {
                return SuggestionsState::failed(SuggestionFailure::invalid_input(
                    errors.into_violations(),
                ));
            }
        };

        let request = match serde_json::to_value(form.into_request()) {
            Ok(request) => request,
            Err(e) => {
                error!(error = %e, "Cannot encode suggestion request");
                return SuggestionsState::failed(SuggestionFailure::generic(
                    suggestion_messages::SERVICE_FAILURE,
                ));
            }
        };

        self.request_suggestions(&request).await.into()
    }
}

/// Personalized workout plans grounded in the user's logged history
#[derive(Clone)]
pub struct WorkoutPlanService {
    runner: FlowRunner,
    progress: ProgressService,
}

impl WorkoutPlanService {
    /// Create a plan service reading history through `progress`
    #[must_use]
    pub const fn new(runner: FlowRunner, progress: ProgressService) -> Self {
        Self { runner, progress }
    }

    /// Generate a plan for `actor`
    ///
    /// A missing or blank `pastWorkoutData` is replaced with a digest of the actor's
    /// most recent workouts.
    ///
    /// # Errors
    ///
    /// Returns a [`SuggestionFailure`] with the violations on invalid input, or the
    /// generic plan failure message otherwise
    pub async fn generate_plan(&self, actor: &str, input: &Value) -> Result<WorkoutPlan, SuggestionFailure> {
        let mut candidate = input.clone();
        if let Some(fields) = candidate.as_object_mut() {
            let has_history = fields
                .get("pastWorkoutData")
                .and_then(Value::as_str)
                .is_some_and(|data| !data.trim().is_empty());

            if !has_history {
                let digest = self
                    .progress
                    .history_digest(actor, actor)
                    .await
                    .map_err(|e| {
                        error!(user.id = %actor, error = %e, "Cannot load workout history for plan");
                        SuggestionFailure::generic(suggestion_messages::PLAN_FAILURE)
                    })?;
                fields.insert("pastWorkoutData".into(), Value::String(digest));
            }
        }

        self.runner
            .run::<WorkoutPlanFlow>(&candidate)
            .await
            .map_err(|e| map_flow_error::<WorkoutPlanFlow>(e, suggestion_messages::PLAN_FAILURE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowstate_core::errors::AppError;
    use flowstate_core::validation::ValidationErrors;

    #[test]
    fn test_invalid_input_keeps_violations() {
        let errors = ValidationErrors::single("fitnessGoal", "fitnessGoal must not be empty");
        let failure = map_flow_error::<ExerciseSuggestionsFlow>(
            FlowError::InvalidInput(errors),
            suggestion_messages::SERVICE_FAILURE,
        );
        assert_eq!(failure.message, "Invalid input.");
        assert!(failure.is_invalid_input());
        assert_eq!(failure.violations[0].field, "fitnessGoal");
    }

    #[test]
    fn test_service_error_is_replaced_with_generic_message() {
        let failure = map_flow_error::<ExerciseSuggestionsFlow>(
            FlowError::Service(AppError::external_service("Gemini", "quota exhausted for key abc")),
            suggestion_messages::SERVICE_FAILURE,
        );
        assert_eq!(
            failure.to_string(),
            "Failed to get suggestions from AI. Please try again later."
        );
        assert!(!failure.message.contains("quota"));
        assert!(failure.violations.is_empty());
    }

    #[test]
    fn test_state_serializes_without_empty_parts() {
        let state = SuggestionsState::failed(SuggestionFailure::generic("nope"));
        let json = serde_json::to_value(&state).unwrap_or_default();
        assert_eq!(json, serde_json::json!({"success": false, "error": "nope"}));
    }
}
