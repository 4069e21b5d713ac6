//! Windowed progress series for charting one exercise.

use chrono::{DateTime, Utc};
use serde::Serialize;

use workout_core::metrics::progress_point;
use workout_core::model::{ProgressPoint, TimeWindow, WorkoutSession};

/// One chart sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub recorded_at: DateTime<Utc>,
    pub value: f64,
}

/// Change between the two most recent sessions in a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProgressDelta {
    InsufficientData {
        sessions: usize,
    },
    Change {
        weight_change: f64,
        volume_change: f64,
        sessions: usize,
    },
}

impl ProgressDelta {
    #[must_use]
    pub fn sessions(&self) -> usize {
        match *self {
            ProgressDelta::InsufficientData { sessions }
            | ProgressDelta::Change { sessions, .. } => sessions,
        }
    }
}

/// Chronological max-weight and volume series plus the latest delta.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub window: TimeWindow,
    pub points: Vec<ProgressPoint>,
    pub delta: ProgressDelta,
}

impl ProgressReport {
    #[must_use]
    pub fn weight_series(&self) -> Vec<SeriesPoint> {
        self.series(|p| p.max_weight)
    }

    #[must_use]
    pub fn volume_series(&self) -> Vec<SeriesPoint> {
        self.series(|p| p.total_volume)
    }

    /// Weight values scaled into `0.0..=1.0` against this window's maximum.
    #[must_use]
    pub fn normalized_weights(&self) -> Vec<f64> {
        normalize(&self.points.iter().map(|p| p.max_weight).collect::<Vec<_>>())
    }

    /// Volume values scaled into `0.0..=1.0` against this window's maximum.
    #[must_use]
    pub fn normalized_volumes(&self) -> Vec<f64> {
        normalize(&self.points.iter().map(|p| p.total_volume).collect::<Vec<_>>())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn series(&self, value: impl Fn(&ProgressPoint) -> f64) -> Vec<SeriesPoint> {
        self.points
            .iter()
            .map(|p| SeriesPoint {
                recorded_at: p.recorded_at,
                value: value(p),
            })
            .collect()
    }
}

/// Filter `sessions` to `window` (relative to `now`), sort ascending and
/// project into chart points.
#[must_use]
pub fn aggregate(sessions: &[WorkoutSession], window: TimeWindow, now: DateTime<Utc>) -> ProgressReport {
    let mut in_window: Vec<&WorkoutSession> = sessions
        .iter()
        .filter(|s| window.contains(s.recorded_at(), now))
        .collect();
    in_window.sort_by_key(|s| s.recorded_at());

    let points: Vec<ProgressPoint> = in_window.into_iter().map(progress_point).collect();
    let delta = match points.as_slice() {
        [.., previous, last] => ProgressDelta::Change {
            weight_change: last.max_weight - previous.max_weight,
            volume_change: last.total_volume - previous.total_volume,
            sessions: points.len(),
        },
        _ => ProgressDelta::InsufficientData {
            sessions: points.len(),
        },
    };

    ProgressReport {
        window,
        points,
        delta,
    }
}

/// Scale against the local maximum. An all-zero series stays all zero.
#[must_use]
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(0.0, f64::max);
    if max <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v / max).max(0.0)).collect()
}
