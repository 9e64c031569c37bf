// ABOUTME: Records exchanged with the exercise suggestion and workout plan flows
// ABOUTME: Flow inputs and outputs plus the suggestion form and its conversion to a request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::suggestion_form::{EQUIPMENT_SEPARATOR, UNSPECIFIED_PLAN};

/// Training experience offered by the suggestion form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    /// New to structured training
    Beginner,
    /// Trains consistently
    Intermediate,
    /// Years of structured training
    Advanced,
}

impl ExperienceLevel {
    /// Lowercase wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(format!("unknown experience level: {other}")),
        }
    }
}

/// Input of the exercise suggestion flow
///
/// All five fields are free-form strings; the form layer narrows them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    /// Fitness goal ("muscle-gain")
    pub fitness_goal: String,
    /// Current plan as free text
    pub current_workout_plan: String,
    /// Experience level ("beginner")
    pub experience_level: String,
    /// Comma-separated equipment list
    pub available_equipment: String,
    /// Time budget per session ("45 minutes")
    pub time_per_workout: String,
}

/// Output of the exercise suggestion flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResult {
    /// Suggested exercises
    pub suggested_exercises: Vec<String>,
    /// Why the suggestions fit the user
    pub explanation: String,
}

/// Input of the workout plan flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlanRequest {
    /// Goals the plan should target
    pub fitness_goals: String,
    /// Where the user stands today
    pub current_progress: String,
    /// Digest of recent workouts
    pub past_workout_data: String,
}

/// Output of the workout plan flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    /// Generated plan text
    pub workout_plan: String,
}

/// Suggestion form as submitted by the web client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionForm {
    /// Selected fitness goal
    pub fitness_goal: String,
    /// Selected experience level
    pub experience_level: ExperienceLevel,
    /// Time budget per session
    pub time_per_workout: String,
    /// Selected equipment tags
    pub available_equipment: Vec<String>,
    /// Optional description of the current plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_workout_plan: Option<String>,
}

impl SuggestionForm {
    /// Flatten the form into the flow's request record
    #[must_use]
    pub fn into_request(self) -> SuggestionRequest {
        let current_workout_plan = self
            .current_workout_plan
            .filter(|plan| !plan.trim().is_empty())
            .unwrap_or_else(|| UNSPECIFIED_PLAN.to_owned());

        SuggestionRequest {
            fitness_goal: self.fitness_goal,
            current_workout_plan,
            experience_level: self.experience_level.to_string(),
            available_equipment: self.available_equipment.join(EQUIPMENT_SEPARATOR),
            time_per_workout: self.time_per_workout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_joins_equipment_and_fills_missing_plan() {
        let form = SuggestionForm {
            fitness_goal: "muscle-gain".into(),
            experience_level: ExperienceLevel::Intermediate,
            time_per_workout: "45 minutes".into(),
            available_equipment: vec!["dumbbells".into(), "barbell".into()],
            current_workout_plan: Some("   ".into()),
        };

        let request = form.into_request();
        assert_eq!(request.available_equipment, "dumbbells, barbell");
        assert_eq!(request.current_workout_plan, "Not specified");
        assert_eq!(request.experience_level, "intermediate");
    }

    #[test]
    fn test_experience_level_parses_case_insensitively() {
        assert_eq!("Advanced".parse::<ExperienceLevel>(), Ok(ExperienceLevel::Advanced));
        assert!("expert".parse::<ExperienceLevel>().is_err());
    }
}
