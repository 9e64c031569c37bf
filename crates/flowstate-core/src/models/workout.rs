// ABOUTME: Workout and exercise records as logged by users
// ABOUTME: Workout, NewWorkout and Exercise definitions with volume helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single exercise within a workout
///
/// # Examples
///
/// ```rust
/// use flowstate_core::models::Exercise;
///
/// let squat = Exercise::new("Squat", 5, 5, 100.0);
/// assert!((squat.volume() - 2500.0).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Identifier assigned when the workout is logged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Exercise name ("Bench Press")
    pub name: String,
    /// Number of sets performed
    pub sets: u32,
    /// Repetitions per set
    pub reps: u32,
    /// Load per repetition (kg); zero for bodyweight work
    pub weight: f64,
}

impl Exercise {
    /// Create an exercise without an identifier
    #[must_use]
    pub fn new(name: impl Into<String>, sets: u32, reps: u32, weight: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            sets,
            reps,
            weight,
        }
    }

    /// Training volume: sets x reps x weight
    #[must_use]
    pub fn volume(&self) -> f64 {
        f64::from(self.sets) * f64::from(self.reps) * self.weight
    }
}

/// A validated workout that has not been written yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkout {
    /// Workout name
    pub name: String,
    /// Session date in epoch milliseconds
    pub date: i64,
    /// Session duration in minutes
    #[serde(default)]
    pub duration: u32,
    /// Exercises performed
    pub exercises: Vec<Exercise>,
}

impl NewWorkout {
    /// Attach a store identifier, producing the persisted record
    #[must_use]
    pub fn into_workout(self, id: impl Into<String>) -> Workout {
        Workout {
            id: id.into(),
            name: self.name,
            date: self.date,
            duration: self.duration,
            exercises: self.exercises,
        }
    }
}

/// A logged workout as stored under `users/{uid}/workouts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    /// Store-assigned document identifier
    pub id: String,
    /// Workout name
    pub name: String,
    /// Session date in epoch milliseconds
    pub date: i64,
    /// Session duration in minutes
    pub duration: u32,
    /// Exercises performed
    pub exercises: Vec<Exercise>,
}

impl Workout {
    /// Sum of exercise volumes
    #[must_use]
    pub fn total_volume(&self) -> f64 {
        self.exercises.iter().map(Exercise::volume).sum()
    }

    /// Session date as a UTC timestamp, if representable
    #[must_use]
    pub fn date_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_volume_sums_exercises() {
        let workout = NewWorkout {
            name: "Push".into(),
            date: 0,
            duration: 45,
            exercises: vec![
                Exercise::new("Bench Press", 3, 10, 60.0),
                Exercise::new("Push Up", 3, 15, 0.0),
            ],
        }
        .into_workout("w1");

        assert_eq!(workout.id, "w1");
        assert!((workout.total_volume() - 1800.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serializes_camel_case_without_missing_ids() {
        let exercise = Exercise::new("Row", 4, 8, 50.5);
        let json = serde_json::to_value(&exercise).unwrap_or_default();
        assert!(json.get("id").is_none());
        assert_eq!(json["weight"], 50.5);
    }
}
