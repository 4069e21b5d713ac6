//! Query and history facade over the catalog and session collaborators.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use storage::repository::{ExerciseCatalog, SavedSession, SessionRepository, SessionRow};
use workout_core::metrics;
use workout_core::model::{
    Exercise, ExerciseCategory, ExerciseId, ExerciseStats, SessionId, TimeWindow,
    TrackerSettings, WeightUnit, WorkoutSession, WorkoutSet,
};
use workout_core::Clock;

use crate::error::WorkoutServiceError;
use crate::progress::{self, ProgressReport};

/// Exercise reference data plus the most recent session, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseDetail {
    pub exercise: Exercise,
    pub last_session: Option<SessionRow>,
}

/// Per-session history line, newest first in listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: SessionId,
    pub recorded_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub notes: String,
    pub sets: Vec<WorkoutSet>,
    pub total_sets: usize,
    pub max_weight: f64,
    pub max_reps: u32,
    pub total_volume: f64,
}

impl HistoryEntry {
    #[must_use]
    pub fn from_row(row: &SessionRow) -> Self {
        let session = &row.session;
        Self {
            id: row.id,
            recorded_at: session.recorded_at(),
            duration_minutes: session.duration_minutes(),
            notes: session.notes().to_string(),
            sets: session.sets().to_vec(),
            total_sets: session.sets().len(),
            max_weight: session.max_weight(),
            max_reps: session.max_reps(),
            total_volume: session.total_volume(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentWorkout {
    pub exercise_id: ExerciseId,
    pub name: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavoriteExercise {
    pub exercise_id: ExerciseId,
    pub name: String,
    pub count: usize,
}

/// Cross-exercise totals for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_workouts: usize,
    pub total_volume_lifted: f64,
    pub recent_workout: Option<RecentWorkout>,
    pub favorite_exercise: Option<FavoriteExercise>,
    pub weight_unit: WeightUnit,
}

#[derive(Clone)]
pub struct WorkoutService {
    clock: Clock,
    settings: TrackerSettings,
    exercises: Arc<dyn ExerciseCatalog>,
    sessions: Arc<dyn SessionRepository>,
}

impl WorkoutService {
    #[must_use]
    pub fn new(
        clock: Clock,
        settings: TrackerSettings,
        exercises: Arc<dyn ExerciseCatalog>,
        sessions: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            clock,
            settings,
            exercises,
            sessions,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn settings(&self) -> TrackerSettings {
        self.settings
    }

    //
    // ─── CATALOG ───────────────────────────────────────────────────────────────
    //

    /// List the catalog, optionally filtered by a category name.
    ///
    /// An unrecognised category yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `WorkoutServiceError::Storage` on catalog failures.
    pub async fn list_exercises(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<Exercise>, WorkoutServiceError> {
        let category = match category.map(str::parse::<ExerciseCategory>) {
            None => None,
            Some(Ok(category)) => Some(category),
            Some(Err(err)) => {
                debug!(error = %err, "unknown category filter");
                return Ok(Vec::new());
            }
        };
        let mut exercises = self.exercises.list_exercises(category).await?;
        exercises.sort_by(|a, b| a.category().cmp(&b.category()).then_with(|| a.name().cmp(b.name())));
        Ok(exercises)
    }

    /// # Errors
    ///
    /// Returns `WorkoutServiceError::ExerciseNotFound` for an unknown id.
    pub async fn exercise_detail(
        &self,
        exercise_id: &ExerciseId,
    ) -> Result<ExerciseDetail, WorkoutServiceError> {
        let exercise = self
            .exercises
            .get_exercise(exercise_id)
            .await?
            .ok_or_else(|| WorkoutServiceError::ExerciseNotFound(exercise_id.to_string()))?;
        let last_session = self.sessions.latest_session(exercise_id).await?;
        Ok(ExerciseDetail {
            exercise,
            last_session,
        })
    }

    //
    // ─── HISTORY ───────────────────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// Returns `WorkoutServiceError::Storage` on read failures.
    pub async fn last_session(
        &self,
        exercise_id: &ExerciseId,
    ) -> Result<Option<WorkoutSession>, WorkoutServiceError> {
        Ok(self
            .sessions
            .latest_session(exercise_id)
            .await?
            .map(|row| row.session))
    }

    /// Full session history for one exercise, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns `WorkoutServiceError::Storage` on read failures.
    pub async fn session_history(
        &self,
        exercise_id: &ExerciseId,
    ) -> Result<Vec<WorkoutSession>, WorkoutServiceError> {
        Ok(self
            .sessions
            .list_sessions(exercise_id)
            .await?
            .into_iter()
            .map(|row| row.session)
            .collect())
    }

    /// History lines for one exercise, newest first.
    ///
    /// # Errors
    ///
    /// Returns `WorkoutServiceError::Storage` on read failures.
    pub async fn history(
        &self,
        exercise_id: &ExerciseId,
    ) -> Result<Vec<HistoryEntry>, WorkoutServiceError> {
        let mut rows = self.sessions.list_sessions(exercise_id).await?;
        rows.sort_by(|a, b| b.session.recorded_at().cmp(&a.session.recorded_at()));
        Ok(rows.iter().map(HistoryEntry::from_row).collect())
    }

    /// # Errors
    ///
    /// Returns `WorkoutServiceError::Storage` on read failures.
    pub async fn stats(
        &self,
        exercise_id: &ExerciseId,
    ) -> Result<ExerciseStats, WorkoutServiceError> {
        let sessions = self.session_history(exercise_id).await?;
        Ok(metrics::exercise_stats(&sessions))
    }

    /// Progress report for `window`, bounded relative to the clock's now.
    ///
    /// # Errors
    ///
    /// Returns `WorkoutServiceError::Storage` on read failures.
    pub async fn progress(
        &self,
        exercise_id: &ExerciseId,
        window: TimeWindow,
    ) -> Result<ProgressReport, WorkoutServiceError> {
        let sessions = self.session_history(exercise_id).await?;
        Ok(progress::aggregate(&sessions, window, self.clock.now()))
    }

    /// # Errors
    ///
    /// Returns `WorkoutServiceError::Storage` on read failures.
    pub async fn dashboard(&self) -> Result<DashboardStats, WorkoutServiceError> {
        let rows = self.sessions.list_all_sessions().await?;

        let total_volume_lifted = rows.iter().map(|row| row.session.total_volume()).sum();
        let recent = rows
            .iter()
            .max_by_key(|row| row.session.recorded_at())
            .map(|row| (row.session.exercise_id().clone(), row.session.recorded_at()));

        let mut per_exercise: HashMap<&ExerciseId, (usize, DateTime<Utc>)> = HashMap::new();
        for row in &rows {
            let at = row.session.recorded_at();
            let entry = per_exercise
                .entry(row.session.exercise_id())
                .or_insert((0, at));
            entry.0 += 1;
            entry.1 = entry.1.max(at);
        }
        let favorite = per_exercise
            .into_iter()
            .max_by_key(|(_, (count, latest))| (*count, *latest))
            .map(|(id, (count, _))| (id.clone(), count));

        let recent_workout = match recent {
            Some((exercise_id, recorded_at)) => Some(RecentWorkout {
                name: self.exercise_name(&exercise_id).await?,
                exercise_id,
                recorded_at,
            }),
            None => None,
        };
        let favorite_exercise = match favorite {
            Some((exercise_id, count)) => Some(FavoriteExercise {
                name: self.exercise_name(&exercise_id).await?,
                exercise_id,
                count,
            }),
            None => None,
        };

        Ok(DashboardStats {
            total_workouts: rows.len(),
            total_volume_lifted,
            recent_workout,
            favorite_exercise,
            weight_unit: self.settings.weight_unit(),
        })
    }

    //
    // ─── MUTATIONS ─────────────────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// Returns `WorkoutServiceError::Storage` if the collaborator rejects it.
    pub async fn save_session(
        &self,
        session: &WorkoutSession,
    ) -> Result<SavedSession, WorkoutServiceError> {
        let saved = self.sessions.save_session(session).await?;
        info!(
            session_id = %saved.id,
            exercise_id = %session.exercise_id(),
            sets = session.sets().len(),
            duration_minutes = session.duration_minutes(),
            "workout session saved"
        );
        Ok(saved)
    }

    /// Replace a stored session's sets and notes. The stored session is
    /// retired and a corrected copy recorded under a new id.
    ///
    /// # Errors
    ///
    /// Returns `WorkoutServiceError::SessionNotFound` for an unknown or retired
    /// id, or `WorkoutServiceError::Session` when `sets` is empty.
    pub async fn amend_session(
        &self,
        id: SessionId,
        sets: &[WorkoutSet],
        notes: &str,
    ) -> Result<SessionId, WorkoutServiceError> {
        let current = self.sessions.get_session(id).await?;
        let amended = current.session.amended(sets, notes)?;
        let new_id = self.sessions.replace_session(id, &amended).await?;
        info!(old_id = %id, new_id = %new_id, "workout session amended");
        Ok(new_id)
    }

    /// # Errors
    ///
    /// Returns `WorkoutServiceError::SessionNotFound` for an unknown or retired id.
    pub async fn delete_session(&self, id: SessionId) -> Result<(), WorkoutServiceError> {
        self.sessions.delete_session(id).await?;
        info!(session_id = %id, "workout session deleted");
        Ok(())
    }

    async fn exercise_name(&self, id: &ExerciseId) -> Result<String, WorkoutServiceError> {
        Ok(self
            .exercises
            .get_exercise(id)
            .await?
            .map_or_else(|| id.to_string(), |exercise| exercise.name().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use storage::repository::{InMemoryRepository, Storage};
    use workout_core::time::{fixed_clock, fixed_now};

    fn service(repo: &InMemoryRepository) -> WorkoutService {
        let storage = Storage::from_repository(repo.clone());
        WorkoutService::new(
            fixed_clock(),
            TrackerSettings::default(),
            storage.exercises,
            storage.sessions,
        )
    }

    fn id(raw: &str) -> ExerciseId {
        ExerciseId::new(raw).unwrap()
    }

    fn session(exercise: &str, days_ago: i64, sets: &[(u32, f64)]) -> WorkoutSession {
        let sets: Vec<WorkoutSet> = sets
            .iter()
            .zip(1_u32..)
            .map(|(&(reps, weight), ordinal)| WorkoutSet::new(ordinal, reps, weight, 7))
            .collect();
        WorkoutSession::new(
            id(exercise),
            &sets,
            "",
            30,
            fixed_now() - Duration::days(days_ago),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn unknown_category_lists_nothing() {
        let repo = InMemoryRepository::with_builtin_catalog();
        let svc = service(&repo);

        assert!(svc.list_exercises(Some("Cardio")).await.unwrap().is_empty());
        assert_eq!(svc.list_exercises(Some("arms")).await.unwrap().len(), 5);
        assert_eq!(svc.list_exercises(None).await.unwrap().len(), 35);
    }

    #[tokio::test]
    async fn detail_for_unknown_exercise_is_not_found() {
        let svc = service(&InMemoryRepository::with_builtin_catalog());
        let err = svc.exercise_detail(&id("moon-walk")).await.unwrap_err();
        assert!(matches!(err, WorkoutServiceError::ExerciseNotFound(_)));
    }

    #[tokio::test]
    async fn detail_includes_latest_session() {
        let repo = InMemoryRepository::with_builtin_catalog();
        let svc = service(&repo);
        svc.save_session(&session("squat", 3, &[(5, 100.0)])).await.unwrap();
        svc.save_session(&session("squat", 1, &[(5, 105.0)])).await.unwrap();

        let detail = svc.exercise_detail(&id("squat")).await.unwrap();
        assert_eq!(detail.exercise.name(), "Squat");
        assert_eq!(detail.last_session.unwrap().session.max_weight(), 105.0);
    }

    #[tokio::test]
    async fn history_is_newest_first_with_projections() {
        let repo = InMemoryRepository::with_builtin_catalog();
        let svc = service(&repo);
        svc.save_session(&session("bench-press", 10, &[(10, 60.0)])).await.unwrap();
        svc.save_session(&session("bench-press", 2, &[(8, 70.0), (12, 65.0)]))
            .await
            .unwrap();

        let history = svc.history(&id("bench-press")).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].total_sets, 2);
        assert_eq!(history[0].max_weight, 70.0);
        assert_eq!(history[0].max_reps, 12);
        assert_eq!(history[0].total_volume, 1340.0);
        assert!(history[0].recorded_at > history[1].recorded_at);
    }

    #[tokio::test]
    async fn stats_use_heaviest_set() {
        let repo = InMemoryRepository::with_builtin_catalog();
        let svc = service(&repo);
        svc.save_session(&session("bench-press", 5, &[(10, 60.0), (15, 40.0)]))
            .await
            .unwrap();
        svc.save_session(&session("bench-press", 1, &[(5, 80.0)])).await.unwrap();

        let stats = svc.stats(&id("bench-press")).await.unwrap();
        assert_eq!(stats.personal_best, 80.0);
        assert_eq!(stats.estimated_one_rep_max, 93.0);
        assert_eq!(stats.max_reps, 15);
        assert_eq!(stats.total_volume, 1600.0);
        assert_eq!(stats.total_sessions, 2);
    }

    #[tokio::test]
    async fn stats_without_history_are_zero() {
        let svc = service(&InMemoryRepository::with_builtin_catalog());
        let stats = svc.stats(&id("plank")).await.unwrap();
        assert_eq!(stats, ExerciseStats::default());
    }

    #[tokio::test]
    async fn amend_recomputes_and_retires_original() {
        let repo = InMemoryRepository::with_builtin_catalog();
        let svc = service(&repo);
        let saved = svc
            .save_session(&session("bench-press", 1, &[(10, 80.0), (8, 80.0), (6, 60.0)]))
            .await
            .unwrap();
        assert_eq!(svc.stats(&id("bench-press")).await.unwrap().total_volume, 1800.0);

        let corrected = [WorkoutSet::new(1, 10, 70.0, 7), WorkoutSet::new(2, 11, 70.0, 8)];
        let new_id = svc.amend_session(saved.id, &corrected, "typo").await.unwrap();

        let history = svc.history(&id("bench-press")).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, new_id);
        assert_eq!(history[0].total_volume, 1470.0);
        assert_eq!(history[0].max_weight, 70.0);
        assert_eq!(history[0].recorded_at, fixed_now() - Duration::days(1));

        let err = svc.amend_session(saved.id, &corrected, "").await.unwrap_err();
        assert!(matches!(err, WorkoutServiceError::SessionNotFound));
    }

    #[tokio::test]
    async fn amend_with_no_sets_is_rejected() {
        let repo = InMemoryRepository::with_builtin_catalog();
        let svc = service(&repo);
        let saved = svc
            .save_session(&session("squat", 1, &[(5, 100.0)]))
            .await
            .unwrap();
        let err = svc.amend_session(saved.id, &[], "").await.unwrap_err();
        assert!(matches!(err, WorkoutServiceError::Session(_)));
    }

    #[tokio::test]
    async fn delete_removes_from_history() {
        let repo = InMemoryRepository::with_builtin_catalog();
        let svc = service(&repo);
        let saved = svc.save_session(&session("squat", 1, &[(5, 100.0)])).await.unwrap();

        svc.delete_session(saved.id).await.unwrap();
        assert!(svc.history(&id("squat")).await.unwrap().is_empty());
        assert!(matches!(
            svc.delete_session(saved.id).await,
            Err(WorkoutServiceError::SessionNotFound)
        ));
    }

    #[tokio::test]
    async fn dashboard_aggregates_across_exercises() {
        let repo = InMemoryRepository::with_builtin_catalog();
        let svc = service(&repo);
        svc.save_session(&session("squat", 9, &[(5, 100.0)])).await.unwrap();
        svc.save_session(&session("bench-press", 6, &[(10, 50.0)])).await.unwrap();
        svc.save_session(&session("squat", 4, &[(5, 100.0)])).await.unwrap();
        svc.save_session(&session("bench-press", 2, &[(10, 50.0)])).await.unwrap();
        svc.save_session(&session("deadlift", 1, &[(3, 140.0)])).await.unwrap();

        let stats = svc.dashboard().await.unwrap();
        assert_eq!(stats.total_workouts, 5);
        assert_eq!(stats.total_volume_lifted, 2420.0);
        assert_eq!(stats.weight_unit, WeightUnit::Kg);

        let recent = stats.recent_workout.unwrap();
        assert_eq!(recent.name, "Deadlift");

        // Two sessions each; bench press was trained more recently.
        let favorite = stats.favorite_exercise.unwrap();
        assert_eq!(favorite.exercise_id, id("bench-press"));
        assert_eq!(favorite.count, 2);
    }

    #[tokio::test]
    async fn empty_dashboard() {
        let svc = service(&InMemoryRepository::with_builtin_catalog());
        let stats = svc.dashboard().await.unwrap();
        assert_eq!(stats.total_workouts, 0);
        assert!(stats.recent_workout.is_none());
        assert!(stats.favorite_exercise.is_none());
    }
}
