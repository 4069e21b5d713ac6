use chrono::{DateTime, Utc};
use tracing::debug;

use workout_core::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Idle,
    Running {
        started_at: DateTime<Utc>,
        elapsed_secs: u64,
    },
}

/// Stopwatch for the active tracking screen.
///
/// Ticks only drive the `mm:ss` display. The recorded duration is always
/// derived from the captured start instant, so missed ticks never skew it.
#[derive(Debug, Clone, Default)]
pub struct SessionTimer {
    state: State,
}

impl SessionTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from `now`. Returns `false` if already running.
    pub fn start(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = State::Running {
            started_at: now,
            elapsed_secs: 0,
        };
        debug!(started_at = %now, "session timer started");
        true
    }

    /// Advance the display counter by one second. Returns the new elapsed
    /// count, or `None` while idle.
    pub fn tick(&mut self) -> Option<u64> {
        match &mut self.state {
            State::Running { elapsed_secs, .. } => {
                *elapsed_secs = elapsed_secs.saturating_add(1);
                Some(*elapsed_secs)
            }
            State::Idle => None,
        }
    }

    /// Return to idle, clearing both the counter and the start instant.
    pub fn stop(&mut self) {
        if self.is_running() {
            debug!("session timer stopped");
        }
        self.state = State::Idle;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running { .. })
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            State::Running { started_at, .. } => Some(started_at),
            State::Idle => None,
        }
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        match self.state {
            State::Running { elapsed_secs, .. } => elapsed_secs,
            State::Idle => 0,
        }
    }

    /// Tick counter formatted as `mm:ss`. Minutes keep growing past 59.
    #[must_use]
    pub fn display(&self) -> String {
        let secs = self.elapsed_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    /// Whole minutes since the start instant, rounded to nearest. Zero while idle.
    #[must_use]
    pub fn duration_minutes(&self, clock: &Clock) -> u32 {
        let Some(started_at) = self.started_at() else {
            return 0;
        };
        let millis = clock.since(started_at).num_milliseconds();
        let minutes = (millis + 30_000) / 60_000;
        u32::try_from(minutes).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use workout_core::time::{fixed_clock, fixed_now};

    #[test]
    fn start_is_idempotent_while_running() {
        let mut timer = SessionTimer::new();
        assert!(timer.start(fixed_now()));
        timer.tick();
        assert!(!timer.start(fixed_now() + Duration::seconds(30)));
        assert_eq!(timer.started_at(), Some(fixed_now()));
        assert_eq!(timer.elapsed_secs(), 1);
    }

    #[test]
    fn duration_comes_from_start_instant_not_ticks() {
        let mut clock = fixed_clock();
        let mut timer = SessionTimer::new();
        timer.start(clock.now());
        timer.tick();
        timer.tick();
        clock.advance(Duration::seconds(65));

        assert_eq!(timer.duration_minutes(&clock), 1);
        assert_eq!(timer.display(), "00:02");
    }

    #[test]
    fn duration_rounds_to_nearest_minute() {
        let mut clock = fixed_clock();
        let mut timer = SessionTimer::new();
        timer.start(clock.now());
        clock.advance(Duration::seconds(29));
        assert_eq!(timer.duration_minutes(&clock), 0);
        clock.advance(Duration::seconds(1));
        assert_eq!(timer.duration_minutes(&clock), 1);
        clock.advance(Duration::minutes(44));
        assert_eq!(timer.duration_minutes(&clock), 45);
    }

    #[test]
    fn stop_clears_state() {
        let mut timer = SessionTimer::new();
        timer.start(fixed_now());
        timer.tick();
        timer.stop();

        assert!(!timer.is_running());
        assert_eq!(timer.started_at(), None);
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.duration_minutes(&fixed_clock()), 0);
    }

    #[test]
    fn display_formats_minutes_and_seconds() {
        let mut timer = SessionTimer::new();
        timer.start(fixed_now());
        for _ in 0..125 {
            timer.tick();
        }
        assert_eq!(timer.display(), "02:05");
    }
}
