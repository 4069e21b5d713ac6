use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::TimeWindow;

/// Rest countdown presets offered to the user, in seconds.
pub const REST_PRESETS_SECS: [u32; 4] = [60, 90, 120, 180];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("unknown weight unit: {0} (expected kg or lbs)")]
    UnknownWeightUnit(String),

    #[error("rest preset must be one of 60, 90, 120 or 180 seconds, got {0}")]
    InvalidRestPreset(u32),
}

/// Display unit for weights. Values are stored unit-less.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightUnit {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kg" | "kgs" | "kilo" | "kilos" => Ok(WeightUnit::Kg),
            "lb" | "lbs" | "pound" | "pounds" => Ok(WeightUnit::Lbs),
            other => Err(SettingsError::UnknownWeightUnit(other.to_string())),
        }
    }
}

/// User-tunable knobs for the tracking screen.
///
/// Deserialization goes through [`TrackerSettings::new`], so stored settings
/// with an unknown rest preset are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTrackerSettings")]
pub struct TrackerSettings {
    weight_unit: WeightUnit,
    rest_preset_secs: u32,
    progress_window: TimeWindow,
}

#[derive(Deserialize)]
struct RawTrackerSettings {
    #[serde(default)]
    weight_unit: WeightUnit,
    rest_preset_secs: u32,
    #[serde(default)]
    progress_window: TimeWindow,
}

impl TryFrom<RawTrackerSettings> for TrackerSettings {
    type Error = SettingsError;

    fn try_from(raw: RawTrackerSettings) -> Result<Self, Self::Error> {
        Self::new(raw.weight_unit, raw.rest_preset_secs, raw.progress_window)
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            weight_unit: WeightUnit::Kg,
            rest_preset_secs: 90,
            progress_window: TimeWindow::AllTime,
        }
    }
}

impl TrackerSettings {
    /// Creates validated settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidRestPreset` if `rest_preset_secs` is not
    /// one of [`REST_PRESETS_SECS`].
    pub fn new(
        weight_unit: WeightUnit,
        rest_preset_secs: u32,
        progress_window: TimeWindow,
    ) -> Result<Self, SettingsError> {
        if !REST_PRESETS_SECS.contains(&rest_preset_secs) {
            return Err(SettingsError::InvalidRestPreset(rest_preset_secs));
        }
        Ok(Self {
            weight_unit,
            rest_preset_secs,
            progress_window,
        })
    }

    #[must_use]
    pub fn weight_unit(&self) -> WeightUnit {
        self.weight_unit
    }

    #[must_use]
    pub fn rest_preset_secs(&self) -> u32 {
        self.rest_preset_secs
    }

    #[must_use]
    pub fn progress_window(&self) -> TimeWindow {
        self.progress_window
    }
}
