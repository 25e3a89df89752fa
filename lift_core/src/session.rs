//! Session walker state machine.
//!
//! Walks a workout template exercise-by-exercise and set-by-set, capturing
//! performed sets, supporting skip and undo, and emitting a single persist
//! effect when the last exercise is finalized.
//!
//! The walker is an immutable value: transitions take `&self` and return a
//! [`Step`] holding the successor state plus the side effects for the
//! surrounding shell to execute (start/cancel a rest countdown, prefill the
//! input form, persist the finished session). A rejected input returns an
//! error and leaves the caller's state untouched.
//!
//! Undo is an explicit snapshot stack with one entry per accepted
//! submit/skip, so `go_back` is a pop rather than reconstructive slicing.

use crate::{
    CompletedExercise, CompletedSet, Error, PlannedSet, Result, SessionConfig, Workout,
    WorkoutExercise,
};
use uuid::Uuid;

// ============================================================================
// Inputs and Effects
// ============================================================================

/// Raw per-set form input; any missing field is a validation rejection
#[derive(Clone, Copy, Debug, Default)]
pub struct SetInput {
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    pub rpe: Option<u8>,
}

/// Side effect requested by a transition, executed by the shell
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Show a rest countdown before the next set (cosmetic, never a gate)
    StartRest { seconds: u32 },
    /// Discard any running rest countdown
    CancelRest,
    /// Repopulate the input fields with a previously submitted set
    Prefill { set: CompletedSet },
    /// Write the finished session record; the one and only persistence write
    Persist {
        workout_id: Uuid,
        exercises: Vec<CompletedExercise>,
    },
}

/// Result of a transition: the successor state and its effects
#[derive(Clone, Debug)]
pub struct Step {
    pub session: Session,
    pub effects: Vec<Effect>,
}

// ============================================================================
// Session State
// ============================================================================

/// Position within the workout walk
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    AtSet { exercise: usize, set: usize },
    Finished,
}

/// The undoable portion of the walk: position plus accumulated records
#[derive(Clone, Debug)]
struct Progress {
    phase: Phase,
    completed: Vec<CompletedExercise>,
    buffer: Vec<CompletedSet>,
}

/// One undo stack entry: the pre-transition snapshot, plus the submitted
/// set to refill the form with when the transition was a submit
#[derive(Clone, Debug)]
struct UndoEntry {
    progress: Progress,
    prefill: Option<CompletedSet>,
}

/// An in-progress walk through one workout template
///
/// Private to a single process; no state is shared across sessions.
#[derive(Clone, Debug)]
pub struct Session {
    workout: Workout,
    default_rest_seconds: u32,
    progress: Progress,
    undo: Vec<UndoEntry>,
}

impl Session {
    /// Begin a session at the first set of the first exercise
    pub fn start(workout: Workout, config: &SessionConfig) -> Result<Self> {
        if workout.exercises.is_empty() {
            return Err(Error::Session(format!(
                "Workout '{}' has no exercises",
                workout.name
            )));
        }
        for exercise in &workout.exercises {
            if exercise.sets.is_empty() {
                return Err(Error::Session(format!(
                    "Exercise '{}' has no planned sets",
                    exercise.name
                )));
            }
        }

        tracing::info!(
            "Starting session for '{}' ({} exercises)",
            workout.name,
            workout.exercises.len()
        );

        Ok(Self {
            workout,
            default_rest_seconds: config.default_rest_seconds,
            progress: Progress {
                phase: Phase::AtSet {
                    exercise: 0,
                    set: 0,
                },
                completed: Vec::new(),
                buffer: Vec::new(),
            },
            undo: Vec::new(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.progress.phase
    }

    pub fn is_finished(&self) -> bool {
        self.progress.phase == Phase::Finished
    }

    pub fn workout(&self) -> &Workout {
        &self.workout
    }

    /// The exercise currently being performed, if the walk is not finished
    pub fn current_exercise(&self) -> Option<&WorkoutExercise> {
        match self.progress.phase {
            Phase::AtSet { exercise, .. } => self.workout.exercises.get(exercise),
            Phase::Finished => None,
        }
    }

    /// The planned set currently being performed
    pub fn current_set(&self) -> Option<&PlannedSet> {
        match self.progress.phase {
            Phase::AtSet { exercise, set } => self
                .workout
                .exercises
                .get(exercise)
                .and_then(|e| e.sets.get(set)),
            Phase::Finished => None,
        }
    }

    /// Exercises finalized so far, in walk order
    pub fn completed_exercises(&self) -> &[CompletedExercise] {
        &self.progress.completed
    }

    /// Sets recorded for the current exercise so far
    pub fn current_sets(&self) -> &[CompletedSet] {
        &self.progress.buffer
    }

    /// Record a performed set and advance the walk
    ///
    /// Missing fields and out-of-range RPE are validation rejections: the
    /// error carries the message to surface and the caller's state is
    /// unchanged.
    pub fn submit_set(&self, input: &SetInput) -> Result<Step> {
        let (exercise_idx, set_idx) = self.require_at_set()?;

        let reps = input
            .reps
            .ok_or_else(|| Error::Validation("Reps value is required".into()))?;
        let weight = input
            .weight
            .ok_or_else(|| Error::Validation("Weight value is required".into()))?;
        let rpe = input
            .rpe
            .ok_or_else(|| Error::Validation("RPE value is required".into()))?;
        if !(1..=10).contains(&rpe) {
            return Err(Error::Validation(format!(
                "RPE must be between 1 and 10, got {}",
                rpe
            )));
        }

        let exercise = &self.workout.exercises[exercise_idx];
        let completed = CompletedSet {
            reps,
            rest_seconds: self.rest_for(&exercise.sets[set_idx]),
            weight,
            rpe,
        };

        let mut next = self.clone();
        next.push_undo(Some(completed.clone()));
        next.progress.buffer.push(completed);

        let mut effects = Vec::new();
        if set_idx + 1 < exercise.sets.len() {
            next.progress.phase = Phase::AtSet {
                exercise: exercise_idx,
                set: set_idx + 1,
            };
            effects.push(Effect::StartRest {
                seconds: self.rest_for(&exercise.sets[set_idx + 1]),
            });
        } else {
            next.finalize_current(&mut effects);
        }

        Ok(Step {
            session: next,
            effects,
        })
    }

    /// Finalize the current exercise with whatever sets accumulated
    /// (possibly zero) and advance
    pub fn skip_exercise(&self) -> Result<Step> {
        let (exercise_idx, _) = self.require_at_set()?;
        tracing::debug!(
            "Skipping exercise '{}'",
            self.workout.exercises[exercise_idx].name
        );

        let mut next = self.clone();
        next.push_undo(None);

        let mut effects = Vec::new();
        next.finalize_current(&mut effects);

        Ok(Step {
            session: next,
            effects,
        })
    }

    /// Undo the most recent submit or skip
    ///
    /// Pops the snapshot stack, restoring position and buffers exactly as
    /// they were; undoing a submit also asks the shell to prefill the form
    /// with that set's values for correction. No-op at the very first set of
    /// the first exercise and after the walk has finished.
    pub fn go_back(&self) -> Step {
        if self.is_finished() {
            return Step {
                session: self.clone(),
                effects: Vec::new(),
            };
        }

        let mut next = self.clone();
        match next.undo.pop() {
            Some(entry) => {
                next.progress = entry.progress;
                let mut effects = vec![Effect::CancelRest];
                if let Some(set) = entry.prefill {
                    effects.push(Effect::Prefill { set });
                }
                Step {
                    session: next,
                    effects,
                }
            }
            None => Step {
                session: next,
                effects: Vec::new(),
            },
        }
    }

    fn require_at_set(&self) -> Result<(usize, usize)> {
        match self.progress.phase {
            Phase::AtSet { exercise, set } => Ok((exercise, set)),
            Phase::Finished => Err(Error::Session("Session already finished".into())),
        }
    }

    fn push_undo(&mut self, prefill: Option<CompletedSet>) {
        self.undo.push(UndoEntry {
            progress: self.progress.clone(),
            prefill,
        });
    }

    /// Rest to apply for a planned set, falling back to the configured
    /// default when the plan leaves it at zero
    fn rest_for(&self, set: &PlannedSet) -> u32 {
        if set.rest_seconds == 0 {
            self.default_rest_seconds
        } else {
            set.rest_seconds
        }
    }

    /// Package the current buffer into a CompletedExercise and move to the
    /// next exercise, or to Finished with the session's single persist
    fn finalize_current(&mut self, effects: &mut Vec<Effect>) {
        let exercise_idx = match self.progress.phase {
            Phase::AtSet { exercise, .. } => exercise,
            Phase::Finished => return,
        };

        let sets = std::mem::take(&mut self.progress.buffer);
        let record = CompletedExercise::finalize(&self.workout.exercises[exercise_idx], sets);
        self.progress.completed.push(record);

        if exercise_idx + 1 < self.workout.exercises.len() {
            self.progress.phase = Phase::AtSet {
                exercise: exercise_idx + 1,
                set: 0,
            };
            effects.push(Effect::CancelRest);
        } else {
            self.progress.phase = Phase::Finished;
            tracing::info!(
                "Session finished: {} exercises recorded",
                self.progress.completed.len()
            );
            effects.push(Effect::Persist {
                workout_id: self.workout.id,
                exercises: self.progress.completed.clone(),
            });
        }
    }
}

// ============================================================================
// Rest Timer
// ============================================================================

/// Countdown shown between sets
///
/// Ticks once per second and saturates at zero. Owned by the shell and
/// purely informational: input is never blocked while it runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestTimer {
    remaining_seconds: u32,
}

impl RestTimer {
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining_seconds: seconds,
        }
    }

    /// Advance one second, returning the remaining time
    pub fn tick(&mut self) -> u32 {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.remaining_seconds
    }

    pub fn remaining(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_done(&self) -> bool {
        self.remaining_seconds == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExerciseKind, MuscleGroup};

    fn planned_set(rest: u32) -> PlannedSet {
        PlannedSet {
            target_reps: 8,
            rest_seconds: rest,
            target_weight: Some(95.0),
        }
    }

    fn test_workout(exercises: usize, sets_each: usize) -> Workout {
        let exercises = (0..exercises)
            .map(|i| WorkoutExercise {
                name: format!("Exercise {}", i + 1),
                kind: ExerciseKind::Hypertrophy,
                muscles: vec![MuscleGroup::Chest],
                sets: vec![planned_set(60); sets_each],
            })
            .collect();

        Workout {
            id: Uuid::new_v4(),
            name: "Test Workout".into(),
            exercises,
        }
    }

    fn start(workout: Workout) -> Session {
        Session::start(workout, &SessionConfig::default()).unwrap()
    }

    fn input(reps: u32, weight: f64, rpe: u8) -> SetInput {
        SetInput {
            reps: Some(reps),
            weight: Some(weight),
            rpe: Some(rpe),
        }
    }

    fn persisted(effects: &[Effect]) -> Option<&Vec<CompletedExercise>> {
        effects.iter().find_map(|e| match e {
            Effect::Persist { exercises, .. } => Some(exercises),
            _ => None,
        })
    }

    #[test]
    fn test_full_walk_produces_complete_record() {
        let mut session = start(test_workout(2, 3));
        let mut persist = None;

        for _ in 0..2 {
            for _ in 0..3 {
                let step = session.submit_set(&input(8, 95.0, 7)).unwrap();
                session = step.session;
                if let Some(exercises) = persisted(&step.effects) {
                    persist = Some(exercises.clone());
                }
            }
        }

        assert!(session.is_finished());
        let exercises = persist.expect("final submit should request a persist");
        assert_eq!(exercises.len(), 2);
        assert_eq!(exercises[0].name, "Exercise 1");
        assert_eq!(exercises[1].name, "Exercise 2");
        assert!(exercises.iter().all(|e| e.sets.len() == 3));
    }

    #[test]
    fn test_submit_advances_set_and_starts_rest() {
        let session = start(test_workout(1, 3));

        let step = session.submit_set(&input(8, 95.0, 7)).unwrap();
        assert_eq!(
            step.session.phase(),
            Phase::AtSet {
                exercise: 0,
                set: 1
            }
        );
        assert_eq!(step.effects, vec![Effect::StartRest { seconds: 60 }]);
        assert_eq!(step.session.current_sets().len(), 1);
    }

    #[test]
    fn test_rest_falls_back_to_configured_default() {
        let mut workout = test_workout(1, 2);
        workout.exercises[0].sets = vec![planned_set(0); 2];
        let session = start(workout);

        let step = session.submit_set(&input(8, 95.0, 7)).unwrap();
        assert_eq!(step.effects, vec![Effect::StartRest { seconds: 90 }]);
        assert_eq!(step.session.current_sets()[0].rest_seconds, 90);
    }

    #[test]
    fn test_missing_weight_is_rejected_without_state_change() {
        let session = start(test_workout(1, 3));
        let bad = SetInput {
            reps: Some(8),
            weight: None,
            rpe: Some(7),
        };

        let err = session.submit_set(&bad).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        // The walker is untouched: same position, nothing buffered
        assert_eq!(
            session.phase(),
            Phase::AtSet {
                exercise: 0,
                set: 0
            }
        );
        assert!(session.current_sets().is_empty());
    }

    #[test]
    fn test_rpe_out_of_range_is_rejected() {
        let session = start(test_workout(1, 1));
        let err = session.submit_set(&input(8, 95.0, 11)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_skip_first_exercise_records_zero_sets() {
        let session = start(test_workout(2, 3));

        let step = session.skip_exercise().unwrap();
        assert_eq!(
            step.session.phase(),
            Phase::AtSet {
                exercise: 1,
                set: 0
            }
        );
        assert_eq!(step.session.completed_exercises().len(), 1);
        assert!(step.session.completed_exercises()[0].sets.is_empty());
    }

    #[test]
    fn test_skipped_exercise_appears_in_final_record() {
        let mut session = start(test_workout(2, 1));
        session = session.skip_exercise().unwrap().session;

        let step = session.submit_set(&input(5, 135.0, 9)).unwrap();
        let exercises = persisted(&step.effects).expect("persist on final submit");

        assert_eq!(exercises.len(), 2);
        assert!(exercises[0].sets.is_empty());
        assert_eq!(exercises[1].sets.len(), 1);
    }

    #[test]
    fn test_go_back_at_start_is_noop() {
        let session = start(test_workout(2, 3));

        let step = session.go_back();
        assert_eq!(
            step.session.phase(),
            Phase::AtSet {
                exercise: 0,
                set: 0
            }
        );
        assert!(step.effects.is_empty());
    }

    #[test]
    fn test_go_back_restores_previous_set_and_prefills() {
        let session = start(test_workout(1, 3));
        let submitted = input(8, 95.0, 7);

        let session = session.submit_set(&submitted).unwrap().session;
        let step = session.go_back();

        assert_eq!(
            step.session.phase(),
            Phase::AtSet {
                exercise: 0,
                set: 0
            }
        );
        assert!(step.session.current_sets().is_empty());
        assert!(step.effects.contains(&Effect::CancelRest));
        let prefill = step.effects.iter().find_map(|e| match e {
            Effect::Prefill { set } => Some(set),
            _ => None,
        });
        let set = prefill.expect("undo of a submit should prefill the form");
        assert_eq!(set.reps, 8);
        assert_eq!(set.weight, 95.0);
        assert_eq!(set.rpe, 7);
    }

    #[test]
    fn test_go_back_across_exercise_boundary() {
        let mut session = start(test_workout(2, 2));
        session = session.submit_set(&input(8, 95.0, 7)).unwrap().session;
        session = session.submit_set(&input(7, 95.0, 8)).unwrap().session;
        assert_eq!(
            session.phase(),
            Phase::AtSet {
                exercise: 1,
                set: 0
            }
        );
        assert_eq!(session.completed_exercises().len(), 1);

        // Undo the finalizing submit: back on exercise 1's last set with
        // that set removed from the buffer and offered for correction
        let step = session.go_back();
        assert_eq!(
            step.session.phase(),
            Phase::AtSet {
                exercise: 0,
                set: 1
            }
        );
        assert!(step.session.completed_exercises().is_empty());
        assert_eq!(step.session.current_sets().len(), 1);
        let prefill = step.effects.iter().find_map(|e| match e {
            Effect::Prefill { set } => Some(set.clone()),
            _ => None,
        });
        assert_eq!(prefill.map(|s| s.reps), Some(7));
    }

    #[test]
    fn test_go_back_after_skip_restores_position() {
        let mut session = start(test_workout(2, 2));
        session = session.submit_set(&input(8, 95.0, 7)).unwrap().session;
        session = session.skip_exercise().unwrap().session;

        let step = session.go_back();
        // Back where the skip happened, buffer intact, nothing to prefill
        assert_eq!(
            step.session.phase(),
            Phase::AtSet {
                exercise: 0,
                set: 1
            }
        );
        assert_eq!(step.session.current_sets().len(), 1);
        assert!(!step
            .effects
            .iter()
            .any(|e| matches!(e, Effect::Prefill { .. })));
    }

    #[test]
    fn test_transitions_after_finish_are_rejected() {
        let mut session = start(test_workout(1, 1));
        session = session.submit_set(&input(5, 135.0, 9)).unwrap().session;
        assert!(session.is_finished());

        assert!(matches!(
            session.submit_set(&input(5, 135.0, 9)),
            Err(Error::Session(_))
        ));
        assert!(matches!(session.skip_exercise(), Err(Error::Session(_))));

        let step = session.go_back();
        assert!(step.session.is_finished());
        assert!(step.effects.is_empty());
    }

    #[test]
    fn test_session_rejects_empty_workout() {
        let workout = Workout {
            id: Uuid::new_v4(),
            name: "Empty".into(),
            exercises: vec![],
        };
        assert!(matches!(
            Session::start(workout, &SessionConfig::default()),
            Err(Error::Session(_))
        ));
    }

    #[test]
    fn test_rest_timer_ticks_down_and_saturates() {
        let mut timer = RestTimer::new(2);
        assert!(!timer.is_done());
        assert_eq!(timer.tick(), 1);
        assert_eq!(timer.tick(), 0);
        assert!(timer.is_done());
        // Ticking past zero stays at zero
        assert_eq!(timer.tick(), 0);
    }
}
