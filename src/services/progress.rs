// ABOUTME: Progress aggregation over a user's workouts
// ABOUTME: Dashboard summary, weekly volume series, per-exercise progression and history digest
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

//! # Progress Aggregation
//!
//! Weeks start on Monday 00:00 UTC. Volume is sets x reps x weight summed over
//! exercises. The aggregation functions are pure and take `now` explicitly;
//! [`ProgressService`] loads the workouts and supplies the clock.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use flowstate_core::constants::progress_defaults;
use flowstate_core::errors::AppResult;
use flowstate_core::models::Workout;
use serde::{Deserialize, Serialize};

use super::workouts::WorkoutService;
use crate::database::WorkoutQuery;

/// Dashboard figures for the current week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Workouts dated this week
    pub workouts_this_week: usize,
    /// This week's count minus last week's
    pub change_since_last_week: i64,
    /// Volume lifted this week
    pub total_volume_this_week: f64,
    /// Workouts logged overall
    pub total_workouts: usize,
    /// Most recent workouts, newest first
    pub recent_workouts: Vec<Workout>,
}

/// One bar of the weekly volume chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumePoint {
    /// "Week 1" .. "This Week"
    pub label: String,
    /// Monday 00:00 UTC of the week, epoch ms
    pub week_start: i64,
    /// Volume lifted that week
    pub volume: f64,
}

/// Best weight for an exercise in one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseProgressPoint {
    /// Month abbreviation ("Jan")
    pub month: String,
    /// Year and month ("2025-01")
    pub period: String,
    /// Heaviest weight logged that month
    pub best_weight: f64,
}

/// Monday 00:00 UTC of the week containing `instant`
#[must_use]
pub fn week_start(instant: DateTime<Utc>) -> DateTime<Utc> {
    let days_since_monday = i64::from(instant.weekday().num_days_from_monday());
    (instant.date_naive() - Duration::days(days_since_monday))
        .and_time(NaiveTime::MIN)
        .and_utc()
}

fn in_week(workout: &Workout, start: DateTime<Utc>) -> bool {
    let end = start + Duration::weeks(1);
    workout
        .date_time()
        .is_some_and(|date| date >= start && date < end)
}

fn count_i64(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

fn newest_first(workouts: &[Workout]) -> Vec<Workout> {
    let mut sorted = workouts.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Summarize workouts for the dashboard
#[must_use]
pub fn dashboard_summary(workouts: &[Workout], recent_limit: usize, now: DateTime<Utc>) -> DashboardSummary {
    let this_week = week_start(now);
    let last_week = this_week - Duration::weeks(1);

    let current: Vec<&Workout> = workouts.iter().filter(|w| in_week(w, this_week)).collect();
    let previous = workouts.iter().filter(|w| in_week(w, last_week)).count();

    let mut recent_workouts = newest_first(workouts);
    recent_workouts.truncate(recent_limit);

    DashboardSummary {
        workouts_this_week: current.len(),
        change_since_last_week: count_i64(current.len()) - count_i64(previous),
        total_volume_this_week: current.iter().map(|w| w.total_volume()).sum(),
        total_workouts: workouts.len(),
        recent_workouts,
    }
}

/// Volume per week for the last `weeks` weeks, oldest first
#[must_use]
pub fn weekly_volume(workouts: &[Workout], weeks: usize, now: DateTime<Utc>) -> Vec<VolumePoint> {
    let current = week_start(now);

    (0..weeks)
        .map(|index| {
            let weeks_back = count_i64(weeks - 1 - index);
            let start = current - Duration::weeks(weeks_back);
            let label = if weeks_back == 0 {
                "This Week".to_owned()
            } else {
                format!("Week {}", index + 1)
            };
            VolumePoint {
                label,
                week_start: start.timestamp_millis(),
                volume: workouts
                    .iter()
                    .filter(|w| in_week(w, start))
                    .map(Workout::total_volume)
                    .sum(),
            }
        })
        .collect()
}

/// Heaviest weight per month for an exercise, matched case-insensitively
#[must_use]
pub fn exercise_progress(workouts: &[Workout], exercise: &str) -> Vec<ExerciseProgressPoint> {
    let wanted = exercise.trim().to_lowercase();
    let mut by_month: BTreeMap<(i32, u32), (String, f64)> = BTreeMap::new();

    for workout in workouts {
        let Some(date) = workout.date_time() else {
            continue;
        };
        let best = workout
            .exercises
            .iter()
            .filter(|e| e.name.trim().to_lowercase() == wanted)
            .map(|e| e.weight)
            .reduce(f64::max);

        if let Some(weight) = best {
            let entry = by_month
                .entry((date.year(), date.month()))
                .or_insert_with(|| (date.format("%b").to_string(), weight));
            entry.1 = entry.1.max(weight);
        }
    }

    by_month
        .into_iter()
        .map(|((year, month), (label, best_weight))| ExerciseProgressPoint {
            month: label,
            period: format!("{year}-{month:02}"),
            best_weight,
        })
        .collect()
}

/// One line per workout, newest first, for the workout plan prompt
#[must_use]
pub fn summarize_workouts(workouts: &[Workout], max: usize) -> String {
    if workouts.is_empty() {
        return "No workouts logged yet.".to_owned();
    }

    let mut digest = String::new();
    for workout in newest_first(workouts).iter().take(max) {
        let day = workout
            .date_time()
            .map_or_else(|| "unknown date".to_owned(), |d| d.format("%Y-%m-%d").to_string());
        let exercises: Vec<String> = workout
            .exercises
            .iter()
            .map(|e| format!("{} {}x{} @ {}kg", e.name, e.sets, e.reps, e.weight))
            .collect();
        let _ = writeln!(
            digest,
            "{day}: {} ({} min) - {}",
            workout.name,
            workout.duration,
            exercises.join("; ")
        );
    }
    digest.trim_end().to_owned()
}

/// Loads workouts and aggregates them for progress views
#[derive(Clone)]
pub struct ProgressService {
    workouts: WorkoutService,
}

impl ProgressService {
    /// Create a service reading through the workout service
    #[must_use]
    pub const fn new(workouts: WorkoutService) -> Self {
        Self { workouts }
    }

    async fn all(&self, actor: &str, owner: &str) -> AppResult<Vec<Workout>> {
        self.workouts
            .list(actor, owner, WorkoutQuery::default())
            .await
    }

    /// Dashboard summary as of `now`
    ///
    /// # Errors
    ///
    /// Propagates read errors from the workout service
    pub async fn dashboard(&self, actor: &str, owner: &str, now: DateTime<Utc>) -> AppResult<DashboardSummary> {
        let workouts = self.all(actor, owner).await?;
        Ok(dashboard_summary(&workouts, self.workouts.recent_limit(), now))
    }

    /// Weekly volume series as of `now`
    ///
    /// # Errors
    ///
    /// Propagates read errors from the workout service
    pub async fn weekly_volume(
        &self,
        actor: &str,
        owner: &str,
        weeks: usize,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<VolumePoint>> {
        let weeks = weeks.clamp(1, progress_defaults::MAX_VOLUME_WEEKS);
        let workouts = self.all(actor, owner).await?;
        Ok(weekly_volume(&workouts, weeks, now))
    }

    /// Monthly best weights for one exercise
    ///
    /// # Errors
    ///
    /// Propagates read errors from the workout service
    pub async fn exercise_progress(
        &self,
        actor: &str,
        owner: &str,
        exercise: &str,
    ) -> AppResult<Vec<ExerciseProgressPoint>> {
        let workouts = self.all(actor, owner).await?;
        Ok(exercise_progress(&workouts, exercise))
    }

    /// Digest of the most recent workouts
    ///
    /// # Errors
    ///
    /// Propagates read errors from the workout service
    pub async fn history_digest(&self, actor: &str, owner: &str) -> AppResult<String> {
        let workouts = self
            .workouts
            .list(
                actor,
                owner,
                WorkoutQuery::recent(progress_defaults::DIGEST_WORKOUTS),
            )
            .await?;
        Ok(summarize_workouts(&workouts, progress_defaults::DIGEST_WORKOUTS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use flowstate_core::models::Exercise;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    fn workout(id: &str, date: DateTime<Utc>, exercises: Vec<Exercise>) -> Workout {
        Workout {
            id: id.into(),
            name: format!("Session {id}"),
            date: date.timestamp_millis(),
            duration: 45,
            exercises,
        }
    }

    // 2025-03-12 is a Wednesday
    fn now() -> DateTime<Utc> {
        at(2025, 3, 12)
    }

    #[test]
    fn test_week_starts_on_monday_midnight() {
        let start = week_start(now());
        assert_eq!(start.weekday(), chrono::Weekday::Mon);
        assert_eq!(start.format("%Y-%m-%d %H:%M").to_string(), "2025-03-10 00:00");
    }

    #[test]
    fn test_dashboard_counts_weeks_and_volume() {
        let workouts = vec![
            workout("a", at(2025, 3, 10), vec![Exercise::new("Squat", 5, 5, 100.0)]),
            workout("b", at(2025, 3, 11), vec![Exercise::new("Bench Press", 3, 10, 60.0)]),
            workout("c", at(2025, 3, 4), vec![Exercise::new("Squat", 5, 5, 95.0)]),
            workout("d", at(2025, 3, 5), vec![]),
            workout("e", at(2025, 3, 6), vec![]),
            workout("f", at(2025, 2, 1), vec![]),
        ];

        let summary = dashboard_summary(&workouts, 3, now());
        assert_eq!(summary.workouts_this_week, 2);
        assert_eq!(summary.change_since_last_week, -1);
        assert!((summary.total_volume_this_week - 4300.0).abs() < f64::EPSILON);
        assert_eq!(summary.total_workouts, 6);
        let ids: Vec<&str> = summary.recent_workouts.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "e"]);
    }

    #[test]
    fn test_weekly_volume_labels_oldest_first() {
        let workouts = vec![
            workout("a", at(2025, 3, 11), vec![Exercise::new("Deadlift", 1, 5, 140.0)]),
            workout("b", at(2025, 2, 12), vec![Exercise::new("Deadlift", 1, 5, 120.0)]),
        ];

        let series = weekly_volume(&workouts, 5, now());
        let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Week 1", "Week 2", "Week 3", "Week 4", "This Week"]);
        assert!((series[0].volume - 600.0).abs() < f64::EPSILON);
        assert!((series[4].volume - 700.0).abs() < f64::EPSILON);
        assert!(series[1].volume.abs() < f64::EPSILON);
    }

    #[test]
    fn test_exercise_progress_takes_monthly_best() {
        let workouts = vec![
            workout("a", at(2025, 1, 6), vec![Exercise::new("Bench Press", 3, 5, 80.0)]),
            workout("b", at(2025, 1, 20), vec![Exercise::new("bench press", 3, 5, 82.5)]),
            workout("c", at(2025, 2, 3), vec![Exercise::new("Bench Press ", 3, 5, 85.0)]),
            workout("d", at(2025, 2, 10), vec![Exercise::new("Squat", 3, 5, 120.0)]),
        ];

        let progress = exercise_progress(&workouts, "Bench Press");
        assert_eq!(progress.len(), 2);
        assert_eq!(progress[0].month, "Jan");
        assert_eq!(progress[0].period, "2025-01");
        assert!((progress[0].best_weight - 82.5).abs() < f64::EPSILON);
        assert_eq!(progress[1].month, "Feb");
    }

    #[test]
    fn test_digest_lists_newest_first() {
        let workouts = vec![
            workout("a", at(2025, 3, 1), vec![Exercise::new("Squat", 5, 5, 100.0)]),
            workout("b", at(2025, 3, 8), vec![Exercise::new("Row", 4, 8, 60.0)]),
        ];

        let digest = summarize_workouts(&workouts, 10);
        let lines: Vec<&str> = digest.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "2025-03-08: Session b (45 min) - Row 4x8 @ 60kg");
        assert_eq!(summarize_workouts(&[], 10), "No workouts logged yet.");
    }
}
