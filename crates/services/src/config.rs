//! Tracker settings from the environment.

use std::env;
use tracing::warn;

use workout_core::model::{TimeWindow, TrackerSettings, WeightUnit};

pub const WEIGHT_UNIT_VAR: &str = "WORKOUT_WEIGHT_UNIT";
pub const REST_SECS_VAR: &str = "WORKOUT_REST_SECS";
pub const PROGRESS_WINDOW_VAR: &str = "WORKOUT_PROGRESS_WINDOW";

/// Read `WORKOUT_WEIGHT_UNIT`, `WORKOUT_REST_SECS` and
/// `WORKOUT_PROGRESS_WINDOW`. Unset or invalid values keep their defaults.
#[must_use]
pub fn settings_from_env() -> TrackerSettings {
    settings_from_lookup(|key| env::var(key).ok())
}

/// Same as [`settings_from_env`] with an injectable variable source.
#[must_use]
pub fn settings_from_lookup<F>(lookup: F) -> TrackerSettings
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = TrackerSettings::default();

    let weight_unit = parse_var::<WeightUnit>(&lookup, WEIGHT_UNIT_VAR)
        .unwrap_or_else(|| defaults.weight_unit());
    let progress_window = parse_var::<TimeWindow>(&lookup, PROGRESS_WINDOW_VAR)
        .unwrap_or_else(|| defaults.progress_window());
    let rest_secs =
        parse_var::<u32>(&lookup, REST_SECS_VAR).unwrap_or_else(|| defaults.rest_preset_secs());

    match TrackerSettings::new(weight_unit, rest_secs, progress_window) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(error = %err, var = REST_SECS_VAR, "falling back to default rest preset");
            TrackerSettings::new(weight_unit, defaults.rest_preset_secs(), progress_window)
                .unwrap_or(defaults)
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(var = key, value = raw, error = %err, "ignoring invalid setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_values_use_defaults() {
        assert_eq!(settings_from_lookup(lookup(&[])), TrackerSettings::default());
    }

    #[test]
    fn reads_all_values() {
        let settings = settings_from_lookup(lookup(&[
            (WEIGHT_UNIT_VAR, "lbs"),
            (REST_SECS_VAR, "120"),
            (PROGRESS_WINDOW_VAR, "3m"),
        ]));
        assert_eq!(settings.weight_unit(), WeightUnit::Lbs);
        assert_eq!(settings.rest_preset_secs(), 120);
        assert_eq!(settings.progress_window(), TimeWindow::LastThreeMonths);
    }

    #[test]
    fn invalid_values_fall_back_individually() {
        let settings = settings_from_lookup(lookup(&[
            (WEIGHT_UNIT_VAR, "stone"),
            (REST_SECS_VAR, "45"),
            (PROGRESS_WINDOW_VAR, "1m"),
        ]));
        assert_eq!(settings.weight_unit(), WeightUnit::Kg);
        assert_eq!(settings.rest_preset_secs(), 90);
        assert_eq!(settings.progress_window(), TimeWindow::LastMonth);
    }
}
