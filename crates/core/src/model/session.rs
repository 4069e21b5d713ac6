use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metrics;
use crate::model::{ExerciseId, WorkoutSet};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WorkoutSessionError {
    #[error("a session needs at least one set")]
    NoSets,

    #[error("too many sets for a single session: {len}")]
    TooManySets { len: usize },
}

/// A completed performance of one exercise: its sets plus notes and duration.
///
/// Sessions are immutable once built. Amending one produces a new session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    exercise_id: ExerciseId,
    sets: Vec<WorkoutSet>,
    notes: String,
    duration_minutes: u32,
    recorded_at: DateTime<Utc>,
}

impl WorkoutSession {
    /// Build a session from editor sets.
    ///
    /// Sets are sanitized (see [`WorkoutSet::sanitized`]) and renumbered `1..=N`
    /// in the order given.
    ///
    /// # Errors
    ///
    /// Returns `WorkoutSessionError::NoSets` when `sets` is empty, or
    /// `WorkoutSessionError::TooManySets` if the count does not fit in `u32`.
    pub fn new(
        exercise_id: ExerciseId,
        sets: &[WorkoutSet],
        notes: impl Into<String>,
        duration_minutes: u32,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self, WorkoutSessionError> {
        if sets.is_empty() {
            return Err(WorkoutSessionError::NoSets);
        }
        if u32::try_from(sets.len()).is_err() {
            return Err(WorkoutSessionError::TooManySets { len: sets.len() });
        }

        let sets = sets
            .iter()
            .zip(1_u32..)
            .map(|(set, ordinal)| set.sanitized(ordinal))
            .collect();

        Ok(Self {
            exercise_id,
            sets,
            notes: notes.into().trim().to_string(),
            duration_minutes,
            recorded_at,
        })
    }

    /// A corrected copy with new sets and notes, keeping exercise, timestamp and
    /// duration.
    ///
    /// # Errors
    ///
    /// Same as [`WorkoutSession::new`].
    pub fn amended(
        &self,
        sets: &[WorkoutSet],
        notes: impl Into<String>,
    ) -> Result<Self, WorkoutSessionError> {
        Self::new(
            self.exercise_id.clone(),
            sets,
            notes,
            self.duration_minutes,
            self.recorded_at,
        )
    }

    #[must_use]
    pub fn exercise_id(&self) -> &ExerciseId {
        &self.exercise_id
    }

    #[must_use]
    pub fn sets(&self) -> &[WorkoutSet] {
        &self.sets
    }

    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    #[must_use]
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    #[must_use]
    pub fn total_volume(&self) -> f64 {
        metrics::session_volume(self)
    }

    #[must_use]
    pub fn max_weight(&self) -> f64 {
        metrics::max_weight(self)
    }

    #[must_use]
    pub fn max_reps(&self) -> u32 {
        metrics::max_reps(self)
    }
}
