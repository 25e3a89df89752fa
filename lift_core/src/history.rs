//! Exercise history queries over completed-workout records.
//!
//! The suggestion engine consumes the full set history for an exercise.
//! A time-windowed variant is also provided for callers that want to limit
//! planning to recent sessions; the engine itself applies no window by
//! default.

use crate::{CompletedSet, CompletedWorkout};
use chrono::{DateTime, Utc};

/// All sets ever logged for an exercise, oldest session first
///
/// Exercises are matched by their snapshot name, since completed records
/// embed copies rather than references.
pub fn exercise_history(completed: &[CompletedWorkout], exercise_name: &str) -> Vec<CompletedSet> {
    let mut workouts: Vec<&CompletedWorkout> = completed.iter().collect();
    workouts.sort_by_key(|w| w.completed_at);

    workouts
        .iter()
        .flat_map(|w| &w.exercises)
        .filter(|e| e.name == exercise_name)
        .flat_map(|e| e.sets.iter().cloned())
        .collect()
}

/// Sets logged for an exercise in workouts completed at or after `cutoff`
pub fn exercise_history_since(
    completed: &[CompletedWorkout],
    exercise_name: &str,
    cutoff: DateTime<Utc>,
) -> Vec<CompletedSet> {
    let recent: Vec<CompletedWorkout> = completed
        .iter()
        .filter(|w| w.completed_at >= cutoff)
        .cloned()
        .collect();

    exercise_history(&recent, exercise_name)
}
