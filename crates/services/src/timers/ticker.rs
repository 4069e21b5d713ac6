use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Session,
    Rest,
}

/// One interval callback. `generation` identifies the ticker that sent it so
/// ticks already queued by a cancelled ticker can be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    pub kind: TimerKind,
    pub generation: u64,
}

/// Background one-second interval feeding a channel.
///
/// The task is aborted when the ticker is cancelled or dropped.
#[derive(Debug)]
pub struct Ticker {
    kind: TimerKind,
    generation: u64,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawn on the current tokio runtime. The first tick fires one period
    /// after spawning.
    #[must_use]
    pub fn spawn(kind: TimerKind, generation: u64, events: UnboundedSender<TimerEvent>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if events.send(TimerEvent { kind, generation }).is_err() {
                    debug!(?kind, "tick receiver dropped");
                    break;
                }
            }
        });
        debug!(?kind, generation, "ticker spawned");
        Self {
            kind,
            generation,
            handle,
        }
    }

    #[must_use]
    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
        debug!(kind = ?self.kind, generation = self.generation, "ticker cancelled");
    }
}
