use tracing::{debug, info};

/// Emitted once when a countdown reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestExpired {
    pub duration_secs: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Idle,
    Counting {
        duration_secs: u32,
        remaining_secs: u32,
    },
}

/// Countdown between sets. Independent of the session stopwatch.
#[derive(Debug, Clone, Default)]
pub struct RestTimer {
    state: State,
}

impl RestTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a countdown, replacing any countdown already in progress.
    ///
    /// Returns `false` and leaves the timer idle for a zero duration.
    pub fn start(&mut self, seconds: u32) -> bool {
        if let State::Counting { remaining_secs, .. } = self.state {
            debug!(remaining_secs, "rest countdown replaced");
        }
        if seconds == 0 {
            self.state = State::Idle;
            return false;
        }
        self.state = State::Counting {
            duration_secs: seconds,
            remaining_secs: seconds,
        };
        debug!(seconds, "rest countdown started");
        true
    }

    /// Decrement by one second. Reaching zero returns to idle and yields
    /// `RestExpired`.
    pub fn tick(&mut self) -> Option<RestExpired> {
        let State::Counting {
            duration_secs,
            remaining_secs,
        } = self.state
        else {
            return None;
        };

        let remaining_secs = remaining_secs.saturating_sub(1);
        if remaining_secs == 0 {
            self.state = State::Idle;
            info!(duration_secs, "rest countdown finished");
            return Some(RestExpired { duration_secs });
        }
        self.state = State::Counting {
            duration_secs,
            remaining_secs,
        };
        None
    }

    /// Cancel without raising `RestExpired`.
    pub fn stop(&mut self) {
        if let State::Counting { remaining_secs, .. } = self.state {
            debug!(remaining_secs, "rest countdown cancelled");
        }
        self.state = State::Idle;
    }

    #[must_use]
    pub fn is_counting(&self) -> bool {
        matches!(self.state, State::Counting { .. })
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        match self.state {
            State::Counting { remaining_secs, .. } => remaining_secs,
            State::Idle => 0,
        }
    }
}
