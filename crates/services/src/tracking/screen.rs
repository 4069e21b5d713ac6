use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use workout_core::voice::{SetPatch, VoiceError};

use super::controller::WorkoutTracker;
use super::workflow::{SaveOutcome, SaveWorkflow};
use crate::error::TrackingError;
use crate::platform::{Haptics, TranscriptSource};
use crate::timers::{RestExpired, Ticker, TimerEvent, TimerKind};

/// What the screen should redraw after a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    SessionTick { elapsed_secs: u64, display: String },
    RestTick { remaining_secs: u32 },
    RestExpired(RestExpired),
}

/// Async driver for an active tracking screen.
///
/// Owns the tracker and the two one-second tickers. Tickers are cancelled on
/// `close`, after a successful save (session ticker), and when the screen is
/// dropped. Ticks arriving while a save is in flight are applied as they come
/// and their events queued for `next_event`.
pub struct TrackingScreen {
    tracker: WorkoutTracker,
    workflow: SaveWorkflow,
    transcripts: Arc<dyn TranscriptSource>,
    haptics: Arc<dyn Haptics>,
    events_tx: UnboundedSender<TimerEvent>,
    events_rx: UnboundedReceiver<TimerEvent>,
    session_ticker: Option<Ticker>,
    rest_ticker: Option<Ticker>,
    generation: u64,
    pending: VecDeque<ScreenEvent>,
}

impl TrackingScreen {
    /// Activate the screen: seed sets from the last session and start the
    /// session stopwatch.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Workouts` if the last session cannot be read.
    pub async fn open(
        tracker: WorkoutTracker,
        workflow: SaveWorkflow,
        transcripts: Arc<dyn TranscriptSource>,
        haptics: Arc<dyn Haptics>,
    ) -> Result<Self, TrackingError> {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut screen = Self {
            tracker,
            workflow,
            transcripts,
            haptics,
            events_tx,
            events_rx,
            session_ticker: None,
            rest_ticker: None,
            generation: 0,
            pending: VecDeque::new(),
        };
        screen.enter().await?;
        Ok(screen)
    }

    /// Re-activate after `close`. Never starts a second stopwatch.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Workouts` if the last session cannot be read.
    pub async fn enter(&mut self) -> Result<(), TrackingError> {
        let last = self
            .workflow
            .workouts()
            .last_session(self.tracker.exercise_id())
            .await?;
        self.tracker.enter(last.as_ref());
        if !self.transcripts.is_supported() {
            self.tracker.disable_voice();
        }
        if self.session_ticker.is_none() && self.tracker.session_timer().is_running() {
            self.session_ticker = Some(self.spawn(TimerKind::Session));
        }
        Ok(())
    }

    /// Deactivate: stop both timers, cancel their tickers and drop undelivered
    /// events.
    pub fn close(&mut self) {
        self.tracker.leave();
        self.session_ticker = None;
        self.rest_ticker = None;
        self.pending.clear();
        debug!(exercise_id = %self.tracker.exercise_id(), "tracking screen closed");
    }

    // ─── REST ───────────────────────────────────────────────────────────────

    /// Start (or restart) the rest countdown.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Inactive` on a closed screen (no ticker is
    /// spawned) or `TrackingError::ZeroRest` for a zero duration.
    pub fn start_rest(&mut self, seconds: u32) -> Result<(), TrackingError> {
        self.rest_ticker = None;
        self.tracker.start_rest(seconds)?;
        self.rest_ticker = Some(self.spawn(TimerKind::Rest));
        Ok(())
    }

    /// Start the configured default rest preset.
    ///
    /// # Errors
    ///
    /// Same as [`TrackingScreen::start_rest`].
    pub fn start_default_rest(&mut self) -> Result<(), TrackingError> {
        self.start_rest(self.tracker.settings().rest_preset_secs())
    }

    pub fn stop_rest(&mut self) {
        self.tracker.stop_rest();
        self.rest_ticker = None;
    }

    // ─── EVENTS ─────────────────────────────────────────────────────────────

    /// Wait for the next tick that changes what is displayed.
    ///
    /// Events queued during a save come first. Ticks from cancelled tickers
    /// are skipped.
    pub async fn next_event(&mut self) -> Option<ScreenEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        loop {
            let event = self.events_rx.recv().await?;
            if let Some(screen_event) = self.apply_tick(event).await {
                return Some(screen_event);
            }
        }
    }

    async fn apply_tick(&mut self, event: TimerEvent) -> Option<ScreenEvent> {
        match event.kind {
            TimerKind::Session => {
                if !is_current(self.session_ticker.as_ref(), event) {
                    return None;
                }
                let elapsed_secs = self.tracker.on_session_tick()?;
                Some(ScreenEvent::SessionTick {
                    elapsed_secs,
                    display: self.tracker.session_timer().display(),
                })
            }
            TimerKind::Rest => {
                if !is_current(self.rest_ticker.as_ref(), event) {
                    return None;
                }
                if let Some(expired) = self.tracker.on_rest_tick() {
                    self.rest_ticker = None;
                    self.alert().await;
                    return Some(ScreenEvent::RestExpired(expired));
                }
                Some(ScreenEvent::RestTick {
                    remaining_secs: self.tracker.rest_timer().remaining_secs(),
                })
            }
        }
    }

    /// Await `work` while still applying ticks, queueing their events.
    async fn while_ticking<F: Future>(&mut self, work: F) -> F::Output {
        tokio::pin!(work);
        loop {
            tokio::select! {
                output = &mut work => return output,
                Some(event) = self.events_rx.recv() => {
                    if let Some(screen_event) = self.apply_tick(event).await {
                        self.pending.push_back(screen_event);
                    }
                }
            }
        }
    }

    // ─── VOICE ──────────────────────────────────────────────────────────────

    /// Capture one utterance and apply it to the last set.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Inactive` on a closed screen,
    /// `TrackingError::Voice` when voice is unavailable or the
    /// transcript is not understood, or `TrackingError::Platform` when capture
    /// fails. Sets are unchanged on error.
    pub async fn listen(&mut self) -> Result<SetPatch, TrackingError> {
        if !self.tracker.is_active() {
            return Err(TrackingError::Inactive);
        }
        if !self.transcripts.is_supported() {
            self.tracker.disable_voice();
            return Err(VoiceError::Unsupported.into());
        }
        if !self.tracker.voice_available() {
            return Err(VoiceError::NothingToUpdate.into());
        }
        let transcript = self.transcripts.capture().await?;
        self.tracker.apply_transcript(&transcript)
    }

    // ─── SAVE ───────────────────────────────────────────────────────────────

    /// Save the current sets using the configured progress window.
    ///
    /// Only the save waits on the collaborator: both countdowns keep ticking
    /// meanwhile, a rest expiry still pulses haptics, and the resulting
    /// events are delivered by later `next_event` calls. On success the
    /// stopwatch is reset and its ticker cancelled; it restarts on the next
    /// `enter`. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// Same as [`SaveWorkflow::save`].
    pub async fn save(&mut self) -> Result<SaveOutcome, TrackingError> {
        let session = self.tracker.snapshot()?;
        let workflow = self.workflow.clone();
        let saved = self.while_ticking(workflow.persist(&session)).await?;
        self.tracker.mark_saved();
        self.session_ticker = None;

        let window = self.tracker.settings().progress_window();
        let analytics = self
            .while_ticking(workflow.analytics_after_save(session.exercise_id(), window))
            .await;
        Ok(SaveOutcome {
            saved,
            session,
            analytics,
        })
    }

    // ─── ACCESSORS ──────────────────────────────────────────────────────────

    #[must_use]
    pub fn tracker(&self) -> &WorkoutTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut WorkoutTracker {
        &mut self.tracker
    }

    pub fn take_voice_notice(&mut self) -> Option<&'static str> {
        self.tracker.take_voice_notice()
    }

    #[must_use]
    pub fn has_session_ticker(&self) -> bool {
        self.session_ticker.is_some()
    }

    #[must_use]
    pub fn has_rest_ticker(&self) -> bool {
        self.rest_ticker.is_some()
    }

    fn spawn(&mut self, kind: TimerKind) -> Ticker {
        self.generation += 1;
        Ticker::spawn(kind, self.generation, self.events_tx.clone())
    }

    async fn alert(&self) {
        if let Err(err) = self.haptics.pulse().await {
            warn!(error = %err, "haptic pulse failed");
        }
    }
}

fn is_current(ticker: Option<&Ticker>, event: TimerEvent) -> bool {
    ticker.is_some_and(|t| t.kind() == event.kind && t.generation() == event.generation)
}
