//! Built-in preset exercises and workout templates.
//!
//! Provides the six stock push/pull/legs workouts so a fresh install has
//! something to train with. Presets are seeded through the store like any
//! user-created data; templates embed exercise snapshots at seed time.

use crate::{
    ExerciseKind, MuscleGroup, PlannedSet, Result, WorkoutExercise, WorkoutStore,
};
use once_cell::sync::Lazy;

/// An exercise definition before it is assigned an id by the store
#[derive(Clone, Debug)]
pub struct PresetExercise {
    pub name: &'static str,
    pub kind: ExerciseKind,
    pub muscles: &'static [MuscleGroup],
}

/// A workout plan naming preset exercises and their planned sets
#[derive(Clone, Debug)]
pub struct PresetWorkout {
    pub name: &'static str,
    pub exercises: Vec<(&'static str, Vec<PlannedSet>)>,
}

/// The complete built-in catalog
#[derive(Clone, Debug)]
pub struct PresetCatalog {
    pub exercises: Vec<PresetExercise>,
    pub workouts: Vec<PresetWorkout>,
}

/// Cached preset catalog - built once and reused across all operations
static PRESET_CATALOG: Lazy<PresetCatalog> = Lazy::new(build_preset_catalog);

/// Get a reference to the cached preset catalog
pub fn preset_catalog() -> &'static PresetCatalog {
    &PRESET_CATALOG
}

fn sets(count: usize, target_reps: u32, rest_seconds: u32) -> Vec<PlannedSet> {
    vec![
        PlannedSet {
            target_reps,
            rest_seconds,
            target_weight: None,
        };
        count
    ]
}

fn build_preset_catalog() -> PresetCatalog {
    use ExerciseKind::{Hypertrophy, Strength};
    use MuscleGroup::*;

    let exercises = vec![
        PresetExercise {
            name: "Bench Press",
            kind: Hypertrophy,
            muscles: &[Chest, Triceps, FrontDelts],
        },
        PresetExercise {
            name: "Overhead Press",
            kind: Strength,
            muscles: &[FrontDelts, SideDelts, Triceps],
        },
        PresetExercise {
            name: "Incline Dumbbell Press",
            kind: Hypertrophy,
            muscles: &[Chest, FrontDelts],
        },
        PresetExercise {
            name: "Triceps Pushdown",
            kind: Hypertrophy,
            muscles: &[Triceps],
        },
        PresetExercise {
            name: "Lateral Raise",
            kind: Hypertrophy,
            muscles: &[SideDelts],
        },
        PresetExercise {
            name: "Deadlift",
            kind: Strength,
            muscles: &[Back, LowerBack, Hamstrings, Glutes],
        },
        PresetExercise {
            name: "Barbell Row",
            kind: Hypertrophy,
            muscles: &[Back, Biceps, RearDelts],
        },
        PresetExercise {
            name: "Lat Pulldown",
            kind: Hypertrophy,
            muscles: &[Back, Biceps],
        },
        PresetExercise {
            name: "Face Pull",
            kind: Hypertrophy,
            muscles: &[RearDelts, Traps],
        },
        PresetExercise {
            name: "Barbell Curl",
            kind: Hypertrophy,
            muscles: &[Biceps, Forearms],
        },
        PresetExercise {
            name: "Back Squat",
            kind: Strength,
            muscles: &[Quads, Glutes, LowerBack],
        },
        PresetExercise {
            name: "Romanian Deadlift",
            kind: Hypertrophy,
            muscles: &[Hamstrings, Glutes, LowerBack],
        },
        PresetExercise {
            name: "Leg Press",
            kind: Hypertrophy,
            muscles: &[Quads, Glutes],
        },
        PresetExercise {
            name: "Leg Curl",
            kind: Hypertrophy,
            muscles: &[Hamstrings],
        },
        PresetExercise {
            name: "Standing Calf Raise",
            kind: Hypertrophy,
            muscles: &[Calves],
        },
    ];

    let workouts = vec![
        PresetWorkout {
            name: "push1",
            exercises: vec![
                ("Bench Press", sets(3, 8, 120)),
                ("Overhead Press", sets(3, 5, 150)),
                ("Triceps Pushdown", sets(3, 12, 60)),
                ("Lateral Raise", sets(3, 12, 60)),
            ],
        },
        PresetWorkout {
            name: "pull1",
            exercises: vec![
                ("Deadlift", sets(3, 5, 180)),
                ("Barbell Row", sets(3, 8, 120)),
                ("Face Pull", sets(3, 12, 60)),
                ("Barbell Curl", sets(3, 10, 60)),
            ],
        },
        PresetWorkout {
            name: "legs1",
            exercises: vec![
                ("Back Squat", sets(3, 5, 180)),
                ("Romanian Deadlift", sets(3, 8, 120)),
                ("Leg Curl", sets(3, 12, 60)),
                ("Standing Calf Raise", sets(3, 12, 60)),
            ],
        },
        PresetWorkout {
            name: "push2",
            exercises: vec![
                ("Overhead Press", sets(3, 5, 150)),
                ("Incline Dumbbell Press", sets(3, 10, 90)),
                ("Lateral Raise", sets(3, 12, 60)),
                ("Triceps Pushdown", sets(3, 12, 60)),
            ],
        },
        PresetWorkout {
            name: "pull2",
            exercises: vec![
                ("Barbell Row", sets(3, 8, 120)),
                ("Lat Pulldown", sets(3, 10, 90)),
                ("Barbell Curl", sets(3, 10, 60)),
                ("Face Pull", sets(3, 12, 60)),
            ],
        },
        PresetWorkout {
            name: "legs2",
            exercises: vec![
                ("Back Squat", sets(3, 5, 180)),
                ("Leg Press", sets(3, 10, 90)),
                ("Leg Curl", sets(3, 12, 60)),
                ("Standing Calf Raise", sets(3, 15, 60)),
            ],
        },
    ];

    PresetCatalog {
        exercises,
        workouts,
    }
}

/// Seed the preset catalog into a store
///
/// Exercises and workouts whose names already exist are left alone, so
/// seeding is safe to repeat. Returns the number of workouts created.
pub fn seed_presets(store: &dyn WorkoutStore) -> Result<usize> {
    let catalog = preset_catalog();

    let existing_names: Vec<String> = store
        .list_exercises()?
        .into_iter()
        .map(|e| e.name)
        .collect();

    for preset in &catalog.exercises {
        if !existing_names.iter().any(|n| n == preset.name) {
            store.create_exercise(preset.name, preset.kind, preset.muscles.to_vec())?;
        }
    }

    let exercises = store.list_exercises()?;
    let existing_workouts: Vec<String> = store
        .list_workouts()?
        .into_iter()
        .map(|w| w.name)
        .collect();

    let mut created = 0;
    for plan in &catalog.workouts {
        if existing_workouts.iter().any(|n| n == plan.name) {
            continue;
        }

        let mut snapshots = Vec::new();
        for (exercise_name, planned_sets) in &plan.exercises {
            let exercise = exercises
                .iter()
                .find(|e| e.name == *exercise_name)
                .ok_or_else(|| {
                    crate::Error::Other(format!(
                        "Preset workout '{}' references unknown exercise '{}'",
                        plan.name, exercise_name
                    ))
                })?;
            snapshots.push(WorkoutExercise::from_exercise(
                exercise,
                planned_sets.clone(),
            ));
        }

        store.create_workout(plan.name, snapshots)?;
        created += 1;
    }

    tracing::info!("Seeded {} preset workouts", created);
    Ok(created)
}
