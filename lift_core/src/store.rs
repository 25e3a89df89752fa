//! File-backed persistence for exercises, workouts, and completed sessions.
//!
//! Records are appended to JSONL (JSON Lines) files with file locking so
//! concurrent CLI invocations cannot interleave writes. Each collection
//! lives in its own file under the data directory:
//! `exercises.jsonl`, `workouts.jsonl`, `completed_workouts.jsonl`.

use crate::{
    CompletedExercise, CompletedWorkout, Error, Exercise, ExerciseKind, MuscleGroup, Result,
    Workout, WorkoutExercise, WorkoutSummary,
};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Persistence operations the session shell and CLI depend on
pub trait WorkoutStore {
    fn create_exercise(
        &self,
        name: &str,
        kind: ExerciseKind,
        muscles: Vec<MuscleGroup>,
    ) -> Result<Uuid>;

    fn list_exercises(&self) -> Result<Vec<Exercise>>;

    fn create_workout(&self, name: &str, exercises: Vec<WorkoutExercise>) -> Result<Uuid>;

    fn list_workouts(&self) -> Result<Vec<WorkoutSummary>>;

    /// Fetch a workout template by id; `NotFound` if the id is unknown
    fn get_workout(&self, id: Uuid) -> Result<Workout>;

    /// Record a finished session against its originating template
    ///
    /// Fails with `NotFound` (and writes nothing) if the template id is
    /// unknown. Stamps the record's id and completion time.
    fn complete_workout(
        &self,
        workout_id: Uuid,
        exercises: Vec<CompletedExercise>,
    ) -> Result<CompletedWorkout>;

    fn list_completed(&self) -> Result<Vec<CompletedWorkout>>;
}

/// JSONL-file store rooted at a data directory
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn exercises_path(&self) -> PathBuf {
        self.dir.join("exercises.jsonl")
    }

    fn workouts_path(&self) -> PathBuf {
        self.dir.join("workouts.jsonl")
    }

    fn completed_path(&self) -> PathBuf {
        self.dir.join("completed_workouts.jsonl")
    }
}

impl WorkoutStore for JsonStore {
    fn create_exercise(
        &self,
        name: &str,
        kind: ExerciseKind,
        muscles: Vec<MuscleGroup>,
    ) -> Result<Uuid> {
        if name.trim().is_empty() {
            return Err(Error::Validation("Exercise name is required".into()));
        }
        if muscles.is_empty() {
            return Err(Error::Validation(
                "At least one muscle group is required".into(),
            ));
        }

        let exercise = Exercise {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            kind,
            muscles,
        };

        append_record(&self.exercises_path(), &exercise)?;
        tracing::info!("Created exercise '{}' ({})", exercise.name, exercise.id);
        Ok(exercise.id)
    }

    fn list_exercises(&self) -> Result<Vec<Exercise>> {
        read_records(&self.exercises_path())
    }

    fn create_workout(&self, name: &str, exercises: Vec<WorkoutExercise>) -> Result<Uuid> {
        if name.trim().is_empty() {
            return Err(Error::Validation("Workout name is required".into()));
        }
        if exercises.is_empty() {
            return Err(Error::Validation(
                "A workout needs at least one exercise".into(),
            ));
        }
        for exercise in &exercises {
            if exercise.sets.is_empty() {
                return Err(Error::Validation(format!(
                    "Exercise '{}' needs at least one planned set",
                    exercise.name
                )));
            }
        }

        let workout = Workout {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            exercises,
        };

        append_record(&self.workouts_path(), &workout)?;
        tracing::info!("Created workout '{}' ({})", workout.name, workout.id);
        Ok(workout.id)
    }

    fn list_workouts(&self) -> Result<Vec<WorkoutSummary>> {
        let workouts: Vec<Workout> = read_records(&self.workouts_path())?;
        Ok(workouts.iter().map(WorkoutSummary::from).collect())
    }

    fn get_workout(&self, id: Uuid) -> Result<Workout> {
        let workouts: Vec<Workout> = read_records(&self.workouts_path())?;
        workouts
            .into_iter()
            .find(|w| w.id == id)
            .ok_or_else(|| Error::NotFound(format!("Workout {}", id)))
    }

    fn complete_workout(
        &self,
        workout_id: Uuid,
        exercises: Vec<CompletedExercise>,
    ) -> Result<CompletedWorkout> {
        // The template must still exist; otherwise the session data is lost
        let workout = self.get_workout(workout_id)?;

        let record = CompletedWorkout {
            id: Uuid::new_v4(),
            workout_id,
            name: workout.name,
            completed_at: chrono::Utc::now(),
            exercises,
        };

        append_record(&self.completed_path(), &record)?;
        tracing::info!(
            "Recorded completed workout '{}' ({} exercises)",
            record.name,
            record.exercises.len()
        );
        Ok(record)
    }

    fn list_completed(&self) -> Result<Vec<CompletedWorkout>> {
        read_records(&self.completed_path())
    }
}

/// Append one record as a JSON line with an exclusive lock
fn append_record<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    file.lock_exclusive()?;

    let mut writer = std::io::BufWriter::new(&file);
    let line = serde_json::to_string(record)?;
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    file.unlock()?;
    Ok(())
}

/// Read all records from a JSONL file with a shared lock
///
/// A missing file is an empty collection. Unparseable lines are logged and
/// skipped rather than failing the whole read.
fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<T>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(
                    "Skipping malformed record at {}:{}: {}",
                    path.display(),
                    line_num + 1,
                    e
                );
            }
        }
    }

    file.unlock()?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlannedSet;

    fn test_store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        (dir, store)
    }

    fn bench_press(store: &JsonStore) -> Uuid {
        store
            .create_exercise(
                "Bench Press",
                ExerciseKind::Hypertrophy,
                vec![MuscleGroup::Chest, MuscleGroup::Triceps],
            )
            .unwrap()
    }

    fn planned_sets(count: usize) -> Vec<PlannedSet> {
        vec![
            PlannedSet {
                target_reps: 8,
                rest_seconds: 90,
                target_weight: Some(95.0),
            };
            count
        ]
    }

    #[test]
    fn test_create_and_list_exercises() {
        let (_dir, store) = test_store();

        let id = bench_press(&store);
        let exercises = store.list_exercises().unwrap();

        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].id, id);
        assert_eq!(exercises[0].name, "Bench Press");
        assert_eq!(exercises[0].kind, ExerciseKind::Hypertrophy);
    }

    #[test]
    fn test_create_exercise_requires_muscles() {
        let (_dir, store) = test_store();

        let result = store.create_exercise("Bench Press", ExerciseKind::Hypertrophy, vec![]);
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(store.list_exercises().unwrap().is_empty());
    }

    #[test]
    fn test_workout_roundtrip() {
        let (_dir, store) = test_store();
        bench_press(&store);
        let exercise = store.list_exercises().unwrap().remove(0);

        let snapshot = WorkoutExercise::from_exercise(&exercise, planned_sets(3));
        let id = store.create_workout("Push Day", vec![snapshot]).unwrap();

        let summaries = store.list_workouts().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].exercise_count, 1);

        let workout = store.get_workout(id).unwrap();
        assert_eq!(workout.name, "Push Day");
        assert_eq!(workout.exercises[0].sets.len(), 3);
    }

    #[test]
    fn test_snapshots_are_frozen_copies() {
        let (_dir, store) = test_store();
        bench_press(&store);
        let exercise = store.list_exercises().unwrap().remove(0);

        let snapshot = WorkoutExercise::from_exercise(&exercise, planned_sets(2));
        let id = store.create_workout("Push Day", vec![snapshot]).unwrap();

        // A later exercise with the same name must not affect the template
        store
            .create_exercise("Bench Press", ExerciseKind::Strength, vec![MuscleGroup::Chest])
            .unwrap();

        let workout = store.get_workout(id).unwrap();
        assert_eq!(workout.exercises[0].kind, ExerciseKind::Hypertrophy);
    }

    #[test]
    fn test_get_workout_not_found() {
        let (_dir, store) = test_store();

        let result = store.get_workout(Uuid::new_v4());
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_complete_workout_unknown_id_writes_nothing() {
        let (_dir, store) = test_store();

        let result = store.complete_workout(Uuid::new_v4(), vec![]);
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert!(store.list_completed().unwrap().is_empty());
    }

    #[test]
    fn test_complete_workout_records_session() {
        let (_dir, store) = test_store();
        bench_press(&store);
        let exercise = store.list_exercises().unwrap().remove(0);
        let snapshot = WorkoutExercise::from_exercise(&exercise, planned_sets(1));
        let workout_id = store.create_workout("Push Day", vec![snapshot]).unwrap();

        let completed = vec![CompletedExercise {
            name: "Bench Press".into(),
            kind: ExerciseKind::Hypertrophy,
            muscles: vec![MuscleGroup::Chest],
            sets: vec![crate::CompletedSet {
                reps: 8,
                rest_seconds: 90,
                weight: 95.0,
                rpe: 7,
            }],
        }];

        let record = store.complete_workout(workout_id, completed).unwrap();
        assert_eq!(record.workout_id, workout_id);
        assert_eq!(record.name, "Push Day");

        let listed = store.list_completed().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, record.id);
        assert_eq!(listed[0].exercises[0].sets.len(), 1);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let (dir, store) = test_store();
        bench_press(&store);

        let path = dir.path().join("exercises.jsonl");
        let mut contents = std::fs::read_to_string(&path).unwrap();
        contents.push_str("{ not json }\n");
        std::fs::write(&path, contents).unwrap();

        let exercises = store.list_exercises().unwrap();
        assert_eq!(exercises.len(), 1);
    }
}
