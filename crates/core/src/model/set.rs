use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_REPS: u32 = 10;
pub const DEFAULT_WEIGHT: f64 = 0.0;
pub const DEFAULT_EFFORT: u8 = 5;

pub const MIN_EFFORT: u8 = 1;
pub const MAX_EFFORT: u8 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SetError {
    #[error("unknown set field: {0}")]
    UnknownField(String),
}

/// One performed set: reps at a weight, with a perceived-effort rating.
///
/// Volume is derived on demand from `weight` and `reps` and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    /// 1-based position within the owning list.
    pub ordinal: u32,
    pub reps: u32,
    pub weight: f64,
    /// Rate of perceived effort, 1-10.
    pub effort: u8,
}

impl WorkoutSet {
    #[must_use]
    pub fn new(ordinal: u32, reps: u32, weight: f64, effort: u8) -> Self {
        Self {
            ordinal,
            reps,
            weight,
            effort,
        }
    }

    /// A set carrying the starting values offered for a fresh exercise.
    #[must_use]
    pub fn with_defaults(ordinal: u32) -> Self {
        Self::new(ordinal, DEFAULT_REPS, DEFAULT_WEIGHT, DEFAULT_EFFORT)
    }

    /// Copies reps, weight and effort into a new position.
    #[must_use]
    pub fn renumbered(&self, ordinal: u32) -> Self {
        Self { ordinal, ..*self }
    }

    /// `weight × reps`.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }

    /// Normalizes values for persistence: non-finite or negative weight becomes
    /// zero and effort is clamped into `MIN_EFFORT..=MAX_EFFORT`.
    #[must_use]
    pub fn sanitized(&self, ordinal: u32) -> Self {
        let weight = if self.weight.is_finite() && self.weight > 0.0 {
            self.weight
        } else {
            0.0
        };
        Self {
            ordinal,
            reps: self.reps,
            weight,
            effort: self.effort.clamp(MIN_EFFORT, MAX_EFFORT),
        }
    }
}

/// Editable field of a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetField {
    Reps,
    Weight,
    Effort,
}

impl SetField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SetField::Reps => "reps",
            SetField::Weight => "weight",
            SetField::Effort => "effort",
        }
    }
}

impl fmt::Display for SetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetField {
    type Err = SetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reps" => Ok(SetField::Reps),
            "weight" => Ok(SetField::Weight),
            "effort" | "rpe" => Ok(SetField::Effort),
            other => Err(SetError::UnknownField(other.to_string())),
        }
    }
}

/// Parses free-form user input as a non-negative whole count.
///
/// Fractions are truncated; anything unparsable, negative or non-finite is 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn coerce_count(raw: &str) -> u32 {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<u32>() {
        return v;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 1.0 => {
            if v >= f64::from(u32::MAX) {
                u32::MAX
            } else {
                v.trunc() as u32
            }
        }
        _ => 0,
    }
}

/// Parses free-form user input as a non-negative weight.
///
/// Anything unparsable, negative or non-finite is 0.
#[must_use]
pub fn coerce_weight(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}
