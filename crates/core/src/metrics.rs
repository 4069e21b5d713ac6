//! Pure performance calculations over sets and sessions.
//!
//! Nothing here is cached: every figure is derived from the sets it is given.

use crate::model::{ExerciseStats, ProgressPoint, WorkoutSession, WorkoutSet};

/// Estimated one-rep max using the Epley formula, rounded to the nearest unit.
///
/// Returns 0 when `weight` is not positive (or not finite) or `reps` is 0.
#[must_use]
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> f64 {
    if !weight.is_finite() || weight <= 0.0 || reps == 0 {
        return 0.0;
    }
    (weight * (1.0 + f64::from(reps) / 30.0)).round()
}

#[must_use]
pub fn set_volume(set: &WorkoutSet) -> f64 {
    set.volume()
}

/// Sum of set volumes over a slice of sets.
#[must_use]
pub fn sets_volume(sets: &[WorkoutSet]) -> f64 {
    sets.iter().map(set_volume).sum()
}

#[must_use]
pub fn session_volume(session: &WorkoutSession) -> f64 {
    sets_volume(session.sets())
}

/// Heaviest single-set weight in a session.
#[must_use]
pub fn max_weight(session: &WorkoutSession) -> f64 {
    session.sets().iter().map(|s| s.weight).fold(0.0, f64::max)
}

#[must_use]
pub fn max_reps(session: &WorkoutSession) -> u32 {
    session.sets().iter().map(|s| s.reps).max().unwrap_or(0)
}

/// Greatest weight across every set of every session; 0 with no sessions.
#[must_use]
pub fn personal_best<'a>(sessions: impl IntoIterator<Item = &'a WorkoutSession>) -> f64 {
    sessions.into_iter().map(max_weight).fold(0.0, f64::max)
}

/// The heaviest set on record. A weight tie goes to the set with more reps.
#[must_use]
pub fn best_set<'a>(sessions: impl IntoIterator<Item = &'a WorkoutSession>) -> Option<WorkoutSet> {
    sessions
        .into_iter()
        .flat_map(WorkoutSession::sets)
        .copied()
        .reduce(|best, set| {
            let heavier = set.weight > best.weight;
            let same_weight_more_reps = set.weight == best.weight && set.reps > best.reps;
            if heavier || same_weight_more_reps {
                set
            } else {
                best
            }
        })
}

/// Full statistics for one exercise history.
#[must_use]
pub fn exercise_stats(sessions: &[WorkoutSession]) -> ExerciseStats {
    let estimated_one_rep_max =
        best_set(sessions).map_or(0.0, |set| estimate_one_rep_max(set.weight, set.reps));

    ExerciseStats {
        personal_best: personal_best(sessions),
        estimated_one_rep_max,
        max_reps: sessions.iter().map(max_reps).max().unwrap_or(0),
        total_volume: sessions.iter().map(session_volume).sum(),
        total_sessions: u32::try_from(sessions.len()).unwrap_or(u32::MAX),
    }
}

#[must_use]
pub fn progress_point(session: &WorkoutSession) -> ProgressPoint {
    ProgressPoint {
        recorded_at: session.recorded_at(),
        max_weight: max_weight(session),
        total_volume: session_volume(session),
    }
}
