use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-exercise performance figures, recomputed from full history on demand.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExerciseStats {
    pub personal_best: f64,
    /// Epley estimate from the heaviest recorded set.
    pub estimated_one_rep_max: f64,
    pub max_reps: u32,
    pub total_volume: f64,
    pub total_sessions: u32,
}

/// Read-only projection of one session for charting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressPoint {
    pub recorded_at: DateTime<Utc>,
    pub max_weight: f64,
    pub total_volume: f64,
}
