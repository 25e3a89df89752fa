//! Core domain types for the Lift Coach system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and their muscle-group targets
//! - Workout templates with embedded exercise snapshots
//! - Planned sets and completed sets
//! - Completed-workout session records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Exercise Types
// ============================================================================

/// Training goal an exercise is programmed for
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Hypertrophy,
    Strength,
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hypertrophy => write!(f, "hypertrophy"),
            Self::Strength => write!(f, "strength"),
        }
    }
}

impl FromStr for ExerciseKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hypertrophy" => Ok(Self::Hypertrophy),
            "strength" => Ok(Self::Strength),
            other => Err(format!("Unknown exercise kind: {}", other)),
        }
    }
}

/// Muscle groups an exercise can target
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Triceps,
    Biceps,
    FrontDelts,
    SideDelts,
    RearDelts,
    Traps,
    Quads,
    Calves,
    Glutes,
    Abs,
    Back,
    Forearms,
    Hips,
    LowerBack,
    Neck,
    Hamstrings,
}

impl MuscleGroup {
    /// All muscle groups, in display order
    pub const ALL: [MuscleGroup; 17] = [
        Self::Chest,
        Self::Triceps,
        Self::Biceps,
        Self::FrontDelts,
        Self::SideDelts,
        Self::RearDelts,
        Self::Traps,
        Self::Quads,
        Self::Calves,
        Self::Glutes,
        Self::Abs,
        Self::Back,
        Self::Forearms,
        Self::Hips,
        Self::LowerBack,
        Self::Neck,
        Self::Hamstrings,
    ];
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Chest => "chest",
            Self::Triceps => "triceps",
            Self::Biceps => "biceps",
            Self::FrontDelts => "front_delts",
            Self::SideDelts => "side_delts",
            Self::RearDelts => "rear_delts",
            Self::Traps => "traps",
            Self::Quads => "quads",
            Self::Calves => "calves",
            Self::Glutes => "glutes",
            Self::Abs => "abs",
            Self::Back => "back",
            Self::Forearms => "forearms",
            Self::Hips => "hips",
            Self::LowerBack => "lower_back",
            Self::Neck => "neck",
            Self::Hamstrings => "hamstrings",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for MuscleGroup {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chest" => Ok(Self::Chest),
            "triceps" => Ok(Self::Triceps),
            "biceps" => Ok(Self::Biceps),
            "front_delts" => Ok(Self::FrontDelts),
            "side_delts" => Ok(Self::SideDelts),
            "rear_delts" => Ok(Self::RearDelts),
            "traps" => Ok(Self::Traps),
            "quads" => Ok(Self::Quads),
            "calves" => Ok(Self::Calves),
            "glutes" => Ok(Self::Glutes),
            "abs" => Ok(Self::Abs),
            "back" => Ok(Self::Back),
            "forearms" => Ok(Self::Forearms),
            "hips" => Ok(Self::Hips),
            "lower_back" => Ok(Self::LowerBack),
            "neck" => Ok(Self::Neck),
            "hamstrings" => Ok(Self::Hamstrings),
            other => Err(format!("Unknown muscle group: {}", other)),
        }
    }
}

/// An exercise definition (e.g., "Bench Press")
///
/// Exercises are created once and immutable thereafter; workout templates
/// embed copies rather than referencing them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub kind: ExerciseKind,
    pub muscles: Vec<MuscleGroup>,
}

// ============================================================================
// Workout Template Types
// ============================================================================

/// A single planned set within a workout-exercise pairing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlannedSet {
    pub target_reps: u32,
    pub rest_seconds: u32,
    pub target_weight: Option<f64>,
}

/// An exercise snapshot embedded in a workout template
///
/// Carries its own copy of the exercise fields plus the planned sets, so
/// later edits to the exercise definition never change existing templates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub name: String,
    pub kind: ExerciseKind,
    pub muscles: Vec<MuscleGroup>,
    pub sets: Vec<PlannedSet>,
}

impl WorkoutExercise {
    /// Snapshot an exercise definition with the given planned sets
    pub fn from_exercise(exercise: &Exercise, sets: Vec<PlannedSet>) -> Self {
        Self {
            name: exercise.name.clone(),
            kind: exercise.kind,
            muscles: exercise.muscles.clone(),
            sets,
        }
    }
}

/// A workout template: a frozen, ordered plan of exercise snapshots
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    pub name: String,
    pub exercises: Vec<WorkoutExercise>,
}

/// Projection of a workout template for listings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub id: Uuid,
    pub name: String,
    pub exercise_count: usize,
}

impl From<&Workout> for WorkoutSummary {
    fn from(workout: &Workout) -> Self {
        Self {
            id: workout.id,
            name: workout.name.clone(),
            exercise_count: workout.exercises.len(),
        }
    }
}

// ============================================================================
// Session Record Types
// ============================================================================

/// A set as actually performed during a session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CompletedSet {
    pub reps: u32,
    pub rest_seconds: u32,
    pub weight: f64,
    /// Perceived effort on the 1-10 RPE scale
    pub rpe: u8,
}

/// An exercise as performed: snapshot fields plus its completed sets
///
/// A skipped exercise is recorded with an empty set list.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CompletedExercise {
    pub name: String,
    pub kind: ExerciseKind,
    pub muscles: Vec<MuscleGroup>,
    pub sets: Vec<CompletedSet>,
}

impl CompletedExercise {
    /// Package a workout-exercise snapshot with its accumulated sets
    pub fn finalize(exercise: &WorkoutExercise, sets: Vec<CompletedSet>) -> Self {
        Self {
            name: exercise.name.clone(),
            kind: exercise.kind,
            muscles: exercise.muscles.clone(),
            sets,
        }
    }
}

/// Record of a finished session, written exactly once and never mutated
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompletedWorkout {
    pub id: Uuid,
    /// The originating workout template
    pub workout_id: Uuid,
    pub name: String,
    pub completed_at: DateTime<Utc>,
    pub exercises: Vec<CompletedExercise>,
}
