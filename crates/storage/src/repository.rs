use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

use workout_core::model::{Exercise, ExerciseCategory, ExerciseId, SessionId, WorkoutSession};

use crate::catalog::builtin_exercises;

/// Errors surfaced by the persistence collaborator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),
}

/// A persisted session together with the id the collaborator assigned it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRow {
    pub id: SessionId,
    pub session: WorkoutSession,
}

impl SessionRow {
    #[must_use]
    pub fn new(id: SessionId, session: WorkoutSession) -> Self {
        Self { id, session }
    }
}

/// Acknowledgement for a saved session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SavedSession {
    pub id: SessionId,
    /// The session duration was credited to the daily-activity aggregate.
    pub auto_tracked: bool,
}

/// Read-only exercise reference data.
#[async_trait]
pub trait ExerciseCatalog: Send + Sync {
    /// List exercises, optionally restricted to one category.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    async fn list_exercises(
        &self,
        category: Option<ExerciseCategory>,
    ) -> Result<Vec<Exercise>, StorageError>;

    /// Fetch one exercise by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    async fn get_exercise(&self, id: &ExerciseId) -> Result<Option<Exercise>, StorageError>;
}

/// Session history store.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be stored.
    async fn save_session(&self, session: &WorkoutSession) -> Result<SavedSession, StorageError>;

    /// Fetch a live session by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing or retired.
    async fn get_session(&self, id: SessionId) -> Result<SessionRow, StorageError>;

    /// Full history for one exercise. No ordering is guaranteed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn list_sessions(&self, exercise_id: &ExerciseId)
    -> Result<Vec<SessionRow>, StorageError>;

    /// Most recently recorded session for one exercise.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn latest_session(
        &self,
        exercise_id: &ExerciseId,
    ) -> Result<Option<SessionRow>, StorageError>;

    /// Every live session across all exercises. No ordering is guaranteed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn list_all_sessions(&self) -> Result<Vec<SessionRow>, StorageError>;

    /// Retire session `id` and store `amended` in its place under a new id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if `id` is missing or already retired.
    async fn replace_session(
        &self,
        id: SessionId,
        amended: &WorkoutSession,
    ) -> Result<SessionId, StorageError>;

    /// Remove a session from history.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if `id` is missing or already retired.
    async fn delete_session(&self, id: SessionId) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
struct StoredSession {
    row: SessionRow,
    retired: bool,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    exercises: Arc<Mutex<BTreeMap<ExerciseId, Exercise>>>,
    sessions: Arc<Mutex<Vec<StoredSession>>>,
    active_minutes: Arc<Mutex<HashMap<NaiveDate, u32>>>,
}

fn lock_err<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository pre-loaded with the built-in exercise catalog.
    #[must_use]
    pub fn with_builtin_catalog() -> Self {
        let map = builtin_exercises()
            .into_iter()
            .map(|exercise| (exercise.id().clone(), exercise))
            .collect();
        Self {
            exercises: Arc::new(Mutex::new(map)),
            ..Self::default()
        }
    }

    /// Add or replace a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store is poisoned.
    pub fn insert_exercise(&self, exercise: Exercise) -> Result<(), StorageError> {
        let mut guard = self.exercises.lock().map_err(lock_err)?;
        guard.insert(exercise.id().clone(), exercise);
        Ok(())
    }

    /// Minutes credited to the daily-activity aggregate for `day`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store is poisoned.
    pub fn active_minutes(&self, day: NaiveDate) -> Result<u32, StorageError> {
        let guard = self.active_minutes.lock().map_err(lock_err)?;
        Ok(guard.get(&day).copied().unwrap_or(0))
    }

    fn live_rows<F>(&self, keep: F) -> Result<Vec<SessionRow>, StorageError>
    where
        F: Fn(&SessionRow) -> bool,
    {
        let guard = self.sessions.lock().map_err(lock_err)?;
        let mut rows: Vec<SessionRow> = guard
            .iter()
            .filter(|stored| !stored.retired && keep(&stored.row))
            .map(|stored| stored.row.clone())
            .collect();
        rows.sort_by(|a, b| b.session.recorded_at().cmp(&a.session.recorded_at()));
        Ok(rows)
    }

    fn retire(&self, id: SessionId) -> Result<SessionRow, StorageError> {
        let mut guard = self.sessions.lock().map_err(lock_err)?;
        let stored = guard
            .iter_mut()
            .find(|stored| stored.row.id == id && !stored.retired)
            .ok_or(StorageError::NotFound)?;
        stored.retired = true;
        Ok(stored.row.clone())
    }

    fn push(&self, session: &WorkoutSession) -> Result<SessionId, StorageError> {
        let id = SessionId::generate();
        let mut guard = self.sessions.lock().map_err(lock_err)?;
        guard.push(StoredSession {
            row: SessionRow::new(id, session.clone()),
            retired: false,
        });
        Ok(id)
    }
}

#[async_trait]
impl ExerciseCatalog for InMemoryRepository {
    async fn list_exercises(
        &self,
        category: Option<ExerciseCategory>,
    ) -> Result<Vec<Exercise>, StorageError> {
        let guard = self.exercises.lock().map_err(lock_err)?;
        Ok(guard
            .values()
            .filter(|exercise| category.is_none_or(|c| exercise.category() == c))
            .cloned()
            .collect())
    }

    async fn get_exercise(&self, id: &ExerciseId) -> Result<Option<Exercise>, StorageError> {
        let guard = self.exercises.lock().map_err(lock_err)?;
        Ok(guard.get(id).cloned())
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn save_session(&self, session: &WorkoutSession) -> Result<SavedSession, StorageError> {
        let id = self.push(session)?;

        let minutes = session.duration_minutes();
        let auto_tracked = minutes > 0;
        if auto_tracked {
            let day = session.recorded_at().date_naive();
            let mut guard = self.active_minutes.lock().map_err(lock_err)?;
            let total = guard.entry(day).or_insert(0);
            *total = total.saturating_add(minutes);
        }
        debug!(session_id = %id, exercise_id = %session.exercise_id(), auto_tracked, "session stored");

        Ok(SavedSession { id, auto_tracked })
    }

    async fn get_session(&self, id: SessionId) -> Result<SessionRow, StorageError> {
        let guard = self.sessions.lock().map_err(lock_err)?;
        guard
            .iter()
            .find(|stored| stored.row.id == id && !stored.retired)
            .map(|stored| stored.row.clone())
            .ok_or(StorageError::NotFound)
    }

    async fn list_sessions(
        &self,
        exercise_id: &ExerciseId,
    ) -> Result<Vec<SessionRow>, StorageError> {
        self.live_rows(|row| row.session.exercise_id() == exercise_id)
    }

    async fn latest_session(
        &self,
        exercise_id: &ExerciseId,
    ) -> Result<Option<SessionRow>, StorageError> {
        Ok(self
            .live_rows(|row| row.session.exercise_id() == exercise_id)?
            .into_iter()
            .next())
    }

    async fn list_all_sessions(&self) -> Result<Vec<SessionRow>, StorageError> {
        self.live_rows(|_| true)
    }

    async fn replace_session(
        &self,
        id: SessionId,
        amended: &WorkoutSession,
    ) -> Result<SessionId, StorageError> {
        let old = self.retire(id)?;
        if old.session.exercise_id() != amended.exercise_id() {
            // Undo the retirement; an amendment cannot move history between exercises.
            let mut guard = self.sessions.lock().map_err(lock_err)?;
            if let Some(stored) = guard.iter_mut().find(|stored| stored.row.id == id) {
                stored.retired = false;
            }
            return Err(StorageError::Conflict);
        }
        let new_id = self.push(amended)?;
        debug!(old_id = %id, new_id = %new_id, "session amended");
        Ok(new_id)
    }

    async fn delete_session(&self, id: SessionId) -> Result<(), StorageError> {
        self.retire(id)?;
        debug!(session_id = %id, "session deleted");
        Ok(())
    }
}

/// Aggregates the collaborator contracts behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub exercises: Arc<dyn ExerciseCatalog>,
    pub sessions: Arc<dyn SessionRepository>,
}

impl Storage {
    /// In-memory storage seeded with the built-in catalog.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::with_builtin_catalog())
    }

    #[must_use]
    pub fn from_repository(repo: InMemoryRepository) -> Self {
        let exercises: Arc<dyn ExerciseCatalog> = Arc::new(repo.clone());
        let sessions: Arc<dyn SessionRepository> = Arc::new(repo);
        Self {
            exercises,
            sessions,
        }
    }
}
