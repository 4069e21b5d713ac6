//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use workout_core::model::{ParseIdError, WorkoutSessionError};
use workout_core::voice::VoiceError;

/// Errors emitted while tracking a live session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TrackingError {
    #[error("add at least one set before saving")]
    EmptySession,
    #[error("rest duration must be greater than zero")]
    ZeroRest,
    #[error("tracking screen is not active")]
    Inactive,
    #[error("no set at position {0}")]
    NoSuchSet(usize),
    #[error("a session keeps at least one set")]
    LastSet,
    #[error(transparent)]
    Voice(#[from] VoiceError),
    #[error(transparent)]
    Session(#[from] WorkoutSessionError),
    #[error(transparent)]
    Workouts(#[from] WorkoutServiceError),
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

impl TrackingError {
    /// Whether the user can simply try the same action again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TrackingError::Workouts(_)
                | TrackingError::Voice(VoiceError::NotUnderstood { .. })
                | TrackingError::Platform(PlatformError::NoTranscript)
        )
    }
}

/// Errors emitted by `WorkoutService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WorkoutServiceError {
    #[error("exercise not found: {0}")]
    ExerciseNotFound(String),
    #[error("session not found")]
    SessionNotFound,
    #[error(transparent)]
    Id(#[from] ParseIdError),
    #[error(transparent)]
    Session(#[from] WorkoutSessionError),
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for WorkoutServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => WorkoutServiceError::SessionNotFound,
            other => WorkoutServiceError::Storage(other),
        }
    }
}

/// Errors reported by optional platform capabilities.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlatformError {
    #[error("capability unavailable")]
    Unavailable,
    #[error("no transcript captured")]
    NoTranscript,
    #[error("platform failure: {0}")]
    Failed(String),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error("exercise catalog is empty")]
    EmptyCatalog,
    #[error(transparent)]
    Storage(#[from] StorageError),
}
