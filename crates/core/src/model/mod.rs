mod exercise;
mod ids;
mod session;
mod set;
mod settings;
mod stats;
mod window;

pub use ids::{ExerciseId, ParseIdError, SessionId};

pub use exercise::{Exercise, ExerciseCategory, ExerciseDraft, ExerciseError};
pub use session::{WorkoutSession, WorkoutSessionError};
pub use set::{
    DEFAULT_EFFORT, DEFAULT_REPS, DEFAULT_WEIGHT, MAX_EFFORT, MIN_EFFORT, SetError, SetField,
    WorkoutSet, coerce_count, coerce_weight,
};
pub use settings::{REST_PRESETS_SECS, SettingsError, TrackerSettings, WeightUnit};
pub use stats::{ExerciseStats, ProgressPoint};
pub use window::{TimeWindow, TimeWindowError};
