use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TimeWindowError {
    #[error("unknown time window: {0} (expected 1m, 3m, 6m or all)")]
    Unknown(String),
}

/// Relative date-range filter over session timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeWindow {
    LastMonth,
    LastThreeMonths,
    LastSixMonths,
    #[default]
    AllTime,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 4] = [
        TimeWindow::LastMonth,
        TimeWindow::LastThreeMonths,
        TimeWindow::LastSixMonths,
        TimeWindow::AllTime,
    ];

    fn months(self) -> Option<u32> {
        match self {
            TimeWindow::LastMonth => Some(1),
            TimeWindow::LastThreeMonths => Some(3),
            TimeWindow::LastSixMonths => Some(6),
            TimeWindow::AllTime => None,
        }
    }

    /// Earliest instant inside the window, computed relative to `now`.
    ///
    /// `None` means unbounded. Calendar months are subtracted, clamping to the
    /// last valid day (e.g. 31 March minus one month is 29 February).
    #[must_use]
    pub fn start(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let months = self.months()?;
        Some(
            now.checked_sub_months(Months::new(months))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        )
    }

    /// Whether `at` falls inside the window as of `now`.
    #[must_use]
    pub fn contains(self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.start(now).is_none_or(|start| at >= start)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TimeWindow::LastMonth => "1m",
            TimeWindow::LastThreeMonths => "3m",
            TimeWindow::LastSixMonths => "6m",
            TimeWindow::AllTime => "all",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = TimeWindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1m" | "1month" | "month" => Ok(TimeWindow::LastMonth),
            "3m" | "3months" => Ok(TimeWindow::LastThreeMonths),
            "6m" | "6months" => Ok(TimeWindow::LastSixMonths),
            "all" | "alltime" | "all-time" => Ok(TimeWindow::AllTime),
            other => Err(TimeWindowError::Unknown(other.to_string())),
        }
    }
}
