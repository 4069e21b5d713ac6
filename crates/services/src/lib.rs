#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod editor;
pub mod error;
pub mod platform;
pub mod progress;
pub mod timers;
pub mod tracking;
pub mod workouts;

pub use workout_core::Clock;

pub use app_services::AppServices;
pub use editor::SetEditor;
pub use error::{AppServicesError, PlatformError, TrackingError, WorkoutServiceError};
pub use platform::{Haptics, NoopHaptics, ScriptedTranscripts, TranscriptSource, UnsupportedTranscripts};
pub use progress::{ProgressDelta, ProgressReport, SeriesPoint};
pub use timers::{RestExpired, RestTimer, SessionTimer};
pub use tracking::{
    ExerciseAnalytics, SaveOutcome, SaveWorkflow, ScreenEvent, TrackingScreen, WorkoutTracker,
};
pub use workouts::{DashboardStats, ExerciseDetail, HistoryEntry, WorkoutService};
