//! CSV export of completed-workout history.
//!
//! Flattens session records into one row per completed set for spreadsheet
//! analysis.

use crate::{CompletedWorkout, Result};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    workout_id: String,
    workout: String,
    completed_at: String,
    exercise: String,
    kind: String,
    set_index: usize,
    reps: u32,
    weight: f64,
    rpe: u8,
    rest_seconds: u32,
}

/// Write completed workouts to a CSV file, one row per completed set
///
/// Skipped exercises carry no sets and therefore produce no rows. Returns
/// the number of rows written.
pub fn export_completed(completed: &[CompletedWorkout], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    let mut rows = 0;

    for workout in completed {
        for exercise in &workout.exercises {
            for (set_index, set) in exercise.sets.iter().enumerate() {
                writer.serialize(CsvRow {
                    workout_id: workout.id.to_string(),
                    workout: workout.name.clone(),
                    completed_at: workout.completed_at.to_rfc3339(),
                    exercise: exercise.name.clone(),
                    kind: exercise.kind.to_string(),
                    set_index,
                    reps: set.reps,
                    weight: set.weight,
                    rpe: set.rpe,
                    rest_seconds: set.rest_seconds,
                })?;
                rows += 1;
            }
        }
    }

    writer.flush()?;
    tracing::info!("Exported {} set rows to {}", rows, path.display());
    Ok(rows)
}
