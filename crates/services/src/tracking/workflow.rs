use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use storage::repository::SavedSession;
use workout_core::model::{ExerciseId, ExerciseStats, TimeWindow, WorkoutSession};

use super::controller::WorkoutTracker;
use crate::error::TrackingError;
use crate::progress::ProgressReport;
use crate::workouts::{HistoryEntry, WorkoutService};

/// Stats and progress recomputed from refreshed history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseAnalytics {
    pub history: Vec<HistoryEntry>,
    pub stats: ExerciseStats,
    pub progress: ProgressReport,
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveOutcome {
    pub saved: SavedSession,
    pub session: WorkoutSession,
    /// `None` when the post-save refresh failed; the session itself is stored.
    pub analytics: Option<ExerciseAnalytics>,
}

/// Persists tracker snapshots and refreshes analytics afterwards.
#[derive(Clone)]
pub struct SaveWorkflow {
    workouts: Arc<WorkoutService>,
}

impl SaveWorkflow {
    #[must_use]
    pub fn new(workouts: Arc<WorkoutService>) -> Self {
        Self { workouts }
    }

    #[must_use]
    pub fn workouts(&self) -> Arc<WorkoutService> {
        Arc::clone(&self.workouts)
    }

    /// Save the tracker's current sets, then refetch history.
    ///
    /// The empty check happens before any collaborator call. The tracker is
    /// reset only once the save has been acknowledged, and the refetch starts
    /// only after that.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Inactive` on a closed screen,
    /// `TrackingError::EmptySession` with no sets, or
    /// `TrackingError::Workouts` if the save is rejected. On error the
    /// tracker is left untouched.
    pub async fn save(
        &self,
        tracker: &mut WorkoutTracker,
        window: TimeWindow,
    ) -> Result<SaveOutcome, TrackingError> {
        let session = tracker.snapshot()?;
        let saved = self.persist(&session).await?;
        tracker.mark_saved();
        let analytics = self.analytics_after_save(session.exercise_id(), window).await;
        Ok(SaveOutcome {
            saved,
            session,
            analytics,
        })
    }

    /// Hand an already-taken snapshot to the collaborator.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Workouts` if the save is rejected.
    pub async fn persist(&self, session: &WorkoutSession) -> Result<SavedSession, TrackingError> {
        match self.workouts.save_session(session).await {
            Ok(saved) => {
                info!(session_id = %saved.id, auto_tracked = saved.auto_tracked, "tracked session saved");
                Ok(saved)
            }
            Err(err) => {
                warn!(exercise_id = %session.exercise_id(), error = %err, "save failed; sets kept for retry");
                Err(err.into())
            }
        }
    }

    /// Refetch after an acknowledged save. A failure is logged and yields
    /// `None`; the save itself still stands.
    pub async fn analytics_after_save(
        &self,
        exercise_id: &ExerciseId,
        window: TimeWindow,
    ) -> Option<ExerciseAnalytics> {
        match self.refresh(exercise_id, window).await {
            Ok(analytics) => Some(analytics),
            Err(err) => {
                warn!(exercise_id = %exercise_id, error = %err, "post-save refresh failed");
                None
            }
        }
    }

    /// Recompute stats and progress from the collaborator's current history.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Workouts` on read failures.
    pub async fn refresh(
        &self,
        exercise_id: &ExerciseId,
        window: TimeWindow,
    ) -> Result<ExerciseAnalytics, TrackingError> {
        let history = self.workouts.history(exercise_id).await?;
        let stats = self.workouts.stats(exercise_id).await?;
        let progress = self.workouts.progress(exercise_id, window).await?;
        Ok(ExerciseAnalytics {
            history,
            stats,
            progress,
        })
    }
}
