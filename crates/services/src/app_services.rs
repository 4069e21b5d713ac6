use std::sync::Arc;

use storage::repository::{ExerciseCatalog, Storage};
use workout_core::model::{ExerciseId, TrackerSettings};

use crate::error::{AppServicesError, TrackingError};
use crate::platform::{Haptics, NoopHaptics, TranscriptSource, UnsupportedTranscripts};
use crate::tracking::{SaveWorkflow, TrackingScreen, WorkoutTracker};
use crate::workouts::WorkoutService;
use crate::Clock;

/// Assembles app-facing services and resolves a usable exercise id.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    settings: TrackerSettings,
    exercise_id: ExerciseId,
    workouts: Arc<WorkoutService>,
    transcripts: Arc<dyn TranscriptSource>,
    haptics: Arc<dyn Haptics>,
}

impl AppServices {
    /// Build services over `storage` with fallback platform capabilities.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::EmptyCatalog` when no exercise exists, or
    /// `AppServicesError::Storage` if the catalog cannot be read.
    pub async fn new(
        storage: Storage,
        clock: Clock,
        settings: TrackerSettings,
        preferred_exercise: ExerciseId,
    ) -> Result<Self, AppServicesError> {
        let exercise_id = resolve_exercise(storage.exercises.as_ref(), preferred_exercise).await?;
        let workouts = Arc::new(WorkoutService::new(
            clock,
            settings,
            Arc::clone(&storage.exercises),
            Arc::clone(&storage.sessions),
        ));

        Ok(Self {
            clock,
            settings,
            exercise_id,
            workouts,
            transcripts: Arc::new(UnsupportedTranscripts),
            haptics: Arc::new(NoopHaptics),
        })
    }

    /// Build services over the seeded in-memory store.
    ///
    /// # Errors
    ///
    /// Same as [`AppServices::new`].
    pub async fn in_memory(
        clock: Clock,
        settings: TrackerSettings,
        preferred_exercise: ExerciseId,
    ) -> Result<Self, AppServicesError> {
        Self::new(Storage::in_memory(), clock, settings, preferred_exercise).await
    }

    #[must_use]
    pub fn with_transcripts(mut self, transcripts: Arc<dyn TranscriptSource>) -> Self {
        self.transcripts = transcripts;
        self
    }

    #[must_use]
    pub fn with_haptics(mut self, haptics: Arc<dyn Haptics>) -> Self {
        self.haptics = haptics;
        self
    }

    #[must_use]
    pub fn exercise_id(&self) -> &ExerciseId {
        &self.exercise_id
    }

    #[must_use]
    pub fn settings(&self) -> TrackerSettings {
        self.settings
    }

    #[must_use]
    pub fn workouts(&self) -> Arc<WorkoutService> {
        Arc::clone(&self.workouts)
    }

    /// Open a tracking screen for the resolved exercise.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError` if the last session cannot be read.
    pub async fn open_tracking(&self) -> Result<TrackingScreen, TrackingError> {
        let tracker = WorkoutTracker::new(self.exercise_id.clone(), self.clock, self.settings);
        TrackingScreen::open(
            tracker,
            SaveWorkflow::new(self.workouts()),
            Arc::clone(&self.transcripts),
            Arc::clone(&self.haptics),
        )
        .await
    }
}

async fn resolve_exercise(
    catalog: &dyn ExerciseCatalog,
    preferred: ExerciseId,
) -> Result<ExerciseId, AppServicesError> {
    if catalog.get_exercise(&preferred).await?.is_some() {
        return Ok(preferred);
    }

    let existing = catalog.list_exercises(None).await?;
    existing
        .first()
        .map(|exercise| exercise.id().clone())
        .ok_or(AppServicesError::EmptyCatalog)
}
