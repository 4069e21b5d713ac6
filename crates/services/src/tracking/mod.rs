mod controller;
mod screen;
mod workflow;

// Public API of the tracking subsystem.
pub use crate::error::TrackingError;
pub use controller::{VOICE_UNSUPPORTED_NOTICE, WorkoutTracker};
pub use screen::{ScreenEvent, TrackingScreen};
pub use workflow::{ExerciseAnalytics, SaveOutcome, SaveWorkflow};
