//! Next-session target suggestion engine.
//!
//! Implements the double-progression heuristic: increase reps until the
//! rep-range ceiling for the exercise kind is hit, then increase weight and
//! reset reps to the range floor. Pure function over historical sets; no
//! deload logic and no bound on weight growth.

use crate::{CompletedSet, ExerciseKind, ProgressionConfig};
use std::collections::BTreeMap;

/// A suggested (weight, reps) target for the next session
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Suggestion {
    pub weight: f64,
    pub reps: u32,
}

/// Suggest the next-session target for an exercise from its set history
///
/// With no history, returns the starting weight and the rep-range floor for
/// the exercise kind. Otherwise:
/// 1. `max_weight` = heaviest weight across all historical sets
/// 2. `max_reps` = best reps achieved at `max_weight`
/// 3. `most_common_reps` = modal rep count across all sets; ties resolve to
///    the larger rep value
/// 4. Below the ceiling: same weight, `max_reps + 2`. At or past it: add the
///    weight increment and reset reps to the floor.
pub fn suggest_next(
    history: &[CompletedSet],
    kind: ExerciseKind,
    config: &ProgressionConfig,
) -> Suggestion {
    if history.is_empty() {
        let reps = match kind {
            ExerciseKind::Hypertrophy => config.hypertrophy_rep_floor,
            ExerciseKind::Strength => config.strength_rep_floor,
        };
        tracing::debug!("No history, suggesting starting target ({} reps)", reps);
        return Suggestion {
            weight: config.starting_weight,
            reps,
        };
    }

    let max_weight = history.iter().map(|s| s.weight).fold(f64::MIN, f64::max);

    let max_reps = history
        .iter()
        .filter(|s| s.weight == max_weight)
        .map(|s| s.reps)
        .max()
        .unwrap_or(0);

    let most_common = most_common_reps(history);

    let suggestion = match kind {
        ExerciseKind::Hypertrophy => {
            if most_common < config.hypertrophy_rep_ceiling {
                Suggestion {
                    weight: max_weight,
                    reps: max_reps + 2,
                }
            } else {
                Suggestion {
                    weight: max_weight + config.weight_increment,
                    reps: config.hypertrophy_rep_floor,
                }
            }
        }
        ExerciseKind::Strength => {
            if most_common <= config.strength_rep_ceiling {
                Suggestion {
                    weight: max_weight,
                    reps: max_reps + 2,
                }
            } else {
                Suggestion {
                    weight: max_weight + config.weight_increment,
                    reps: config.strength_rep_floor,
                }
            }
        }
    };

    tracing::debug!(
        "Suggested {} x {} (max_weight {}, max_reps {}, most_common_reps {})",
        suggestion.weight,
        suggestion.reps,
        max_weight,
        max_reps,
        most_common
    );

    suggestion
}

/// The rep count appearing most often in the history
///
/// Ties resolve to the numerically larger rep value.
fn most_common_reps(history: &[CompletedSet]) -> u32 {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for set in history {
        *counts.entry(set.reps).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by_key(|&(reps, count)| (count, reps))
        .map(|(reps, _)| reps)
        .unwrap_or(0)
}
