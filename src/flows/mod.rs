// ABOUTME: Prompt flows: structured input to templated prompt to validated structured output
// ABOUTME: Defines the PromptFlow contract and the FlowRunner that executes single-shot flows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

//! # Prompt Flows
//!
//! A flow is one hosted text-generation call wrapped in schemas on both sides:
//!
//! 1. the input record is validated against [`PromptFlow::input_schema`]
//! 2. the template is rendered with the record's fields substituted verbatim
//! 3. the provider is asked for JSON matching [`PromptFlow::output_schema`]
//! 4. the reply is parsed, validated and deserialized into [`PromptFlow::Output`]
//!
//! Flows are stateless; each run is independent and nothing is retried.

mod exercise_suggestions;
mod workout_plan;

pub use exercise_suggestions::ExerciseSuggestionsFlow;
pub use workout_plan::WorkoutPlanFlow;

use std::sync::Arc;
use std::time::Instant;

use flowstate_core::errors::{AppError, ErrorCode};
use flowstate_core::validation::{Schema, ValidationErrors};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::llm::{prompts, ChatMessage, ChatRequest, LlmProvider, ResponseFormat};
use crate::logging::AppLogger;

/// A single-shot structured prompt
pub trait PromptFlow {
    /// Flow name used in logs
    const NAME: &'static str;
    /// Prompt template with `{{ field }}` slots
    const TEMPLATE: &'static str;
    /// Structured input record
    type Input: Serialize + DeserializeOwned + Send + Sync;
    /// Structured output record
    type Output: DeserializeOwned + Send;

    /// Declared shape of the input
    fn input_schema() -> Schema;

    /// Declared shape of the output
    fn output_schema() -> Schema;
}

/// Why a flow run failed
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// Input record does not match the input schema
    #[error("invalid flow input: {0}")]
    InvalidInput(ValidationErrors),
    /// Template could not be rendered
    #[error("prompt template failed: {0}")]
    Template(#[from] minijinja::Error),
    /// Provider call failed
    #[error("text generation failed: {0}")]
    Service(#[source] AppError),
    /// Reply contained no parsable JSON object
    #[error("model output is not valid JSON: {0}")]
    MalformedOutput(String),
    /// Reply parsed but does not match the output schema
    #[error("model output does not match the expected shape: {0}")]
    OutputSchema(ValidationErrors),
}

impl From<FlowError> for AppError {
    fn from(error: FlowError) -> Self {
        match error {
            FlowError::InvalidInput(errors) => errors.into(),
            FlowError::Service(source) => source,
            FlowError::Template(_) => Self::internal(error.to_string()),
            FlowError::MalformedOutput(_) | FlowError::OutputSchema(_) => {
                Self::new(ErrorCode::ExternalServiceError, error.to_string())
            }
        }
    }
}

/// Executes prompt flows against a provider
#[derive(Clone)]
pub struct FlowRunner {
    provider: Arc<dyn LlmProvider>,
    model: Option<String>,
}

impl FlowRunner {
    /// Create a runner using the provider's default model
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            model: None,
        }
    }

    /// Use a specific model for every run
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Render a flow's prompt for an already validated input
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Template`] if a slot cannot be filled
    pub fn render<F: PromptFlow>(input: &F::Input) -> Result<String, FlowError> {
        Ok(prompts::render(F::TEMPLATE, input)?)
    }

    /// Validate a candidate input record and run the flow
    ///
    /// # Errors
    ///
    /// Returns a [`FlowError`] describing the stage that failed
    pub async fn run<F: PromptFlow>(&self, candidate: &Value) -> Result<F::Output, FlowError> {
        let input: F::Input = F::input_schema()
            .validate_into(candidate)
            .map_err(FlowError::InvalidInput)?;
        self.invoke::<F>(&input).await
    }

    async fn invoke<F: PromptFlow>(&self, input: &F::Input) -> Result<F::Output, FlowError> {
        let prompt = Self::render::<F>(input)?;
        let instruction = prompts::structured_output_instruction(&F::output_schema().describe())?;

        let capabilities = self.provider.capabilities();
        let messages = if capabilities.supports_system_messages() {
            vec![ChatMessage::system(instruction), ChatMessage::user(prompt)]
        } else {
            vec![ChatMessage::user(format!("{instruction}\n\n{prompt}"))]
        };

        let mut request = ChatRequest::new(messages);
        if capabilities.supports_json_mode() {
            request = request.with_response_format(ResponseFormat::Json);
        }
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_owned());

        let started = Instant::now();
        let response = self.provider.complete(&request).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        AppLogger::log_flow_call(F::NAME, &model, response.is_ok(), elapsed_ms);
        let response = response.map_err(FlowError::Service)?;

        let json_text = extract_json(&response.content)
            .ok_or_else(|| FlowError::MalformedOutput("reply contains no JSON object".into()))?;
        let value: Value = serde_json::from_str(json_text)
            .map_err(|e| FlowError::MalformedOutput(e.to_string()))?;

        F::output_schema()
            .validate_into(&value)
            .map_err(FlowError::OutputSchema)
    }
}

/// Locate the JSON object in a model reply, tolerating markdown fences and chatter
#[must_use]
pub fn extract_json(reply: &str) -> Option<&str> {
    let trimmed = reply.trim();
    let body = trimmed
        .strip_prefix("```")
        .and_then(|fenced| fenced.split_once('\n'))
        .map_or(trimmed, |(_, rest)| rest.rsplit_once("```").map_or(rest, |(inner, _)| inner));

    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if start < end {
        body.get(start..=end)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_from_plain_reply() {
        assert_eq!(extract_json(r#"{"a":1}"#), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_extract_json_from_fenced_reply() {
        let reply = "```json\n{\"workoutPlan\": \"Day 1\"}\n```";
        assert_eq!(extract_json(reply), Some("{\"workoutPlan\": \"Day 1\"}"));
    }

    #[test]
    fn test_extract_json_skips_chatter() {
        let reply = "Here you go: {\"explanation\": \"ok\"} Enjoy!";
        assert_eq!(extract_json(reply), Some("{\"explanation\": \"ok\"}"));
    }

    #[test]
    fn test_extract_json_without_object() {
        assert_eq!(extract_json("no json here"), None);
        assert_eq!(extract_json("} backwards {"), None);
    }
}
