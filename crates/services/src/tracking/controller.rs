use chrono::Duration;
use tracing::{debug, warn};

use workout_core::model::{ExerciseId, SetField, TrackerSettings, WorkoutSession, WorkoutSet};
use workout_core::voice::{SetPatch, VoiceError, parse_transcript};
use workout_core::Clock;

use crate::editor::SetEditor;
use crate::error::TrackingError;
use crate::timers::{RestExpired, RestTimer, SessionTimer};

/// Shown once when voice input cannot be offered.
pub const VOICE_UNSUPPORTED_NOTICE: &str =
    "Voice input isn't available on this device. Enter sets manually.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VoiceState {
    Available,
    Disabled { notice_pending: bool },
}

/// Thin controller for one exercise's tracking screen.
///
/// Composes the set editor, the two timers, notes and voice availability.
/// Everything here is synchronous; persistence lives in the save workflow.
#[derive(Debug, Clone)]
pub struct WorkoutTracker {
    exercise_id: ExerciseId,
    clock: Clock,
    settings: TrackerSettings,
    editor: SetEditor,
    session_timer: SessionTimer,
    rest_timer: RestTimer,
    notes: String,
    voice: VoiceState,
    active: bool,
}

impl WorkoutTracker {
    #[must_use]
    pub fn new(exercise_id: ExerciseId, clock: Clock, settings: TrackerSettings) -> Self {
        Self {
            exercise_id,
            clock,
            settings,
            editor: SetEditor::new(),
            session_timer: SessionTimer::new(),
            rest_timer: RestTimer::new(),
            notes: String::new(),
            voice: VoiceState::Available,
            active: false,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    /// Moves a fixed clock forward; no effect on the wall clock.
    pub fn advance_clock(&mut self, delta: Duration) {
        self.clock.advance(delta);
    }

    // ─── SCREEN LIFECYCLE ───────────────────────────────────────────────────

    /// The screen became active.
    ///
    /// Seeds the editor from `last_session` unless it already holds sets, and
    /// starts the session stopwatch if it is not running. Returns whether a
    /// new stopwatch run began.
    pub fn enter(&mut self, last_session: Option<&WorkoutSession>) -> bool {
        self.active = true;
        if self.editor.is_empty() {
            self.editor.initialize(last_session);
        }
        let started = self.session_timer.start(self.clock.now());
        debug!(exercise_id = %self.exercise_id, started, "tracking screen entered");
        started
    }

    /// The screen closed. Both timers stop; sets and notes stay.
    pub fn leave(&mut self) {
        self.active = false;
        self.session_timer.stop();
        self.rest_timer.stop();
        debug!(exercise_id = %self.exercise_id, "tracking screen left");
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    fn ensure_active(&self) -> Result<(), TrackingError> {
        if self.active {
            Ok(())
        } else {
            Err(TrackingError::Inactive)
        }
    }

    // ─── SETS ───────────────────────────────────────────────────────────────
    //
    // Sets change only while the screen is active.

    /// # Errors
    ///
    /// Returns `TrackingError::Inactive` when the screen is closed.
    pub fn add_set(&mut self) -> Result<WorkoutSet, TrackingError> {
        self.ensure_active()?;
        Ok(self.editor.add_set())
    }

    /// # Errors
    ///
    /// Returns `TrackingError::Inactive` when the screen is closed or
    /// `TrackingError::NoSuchSet` for an out-of-range index.
    pub fn update_set(
        &mut self,
        index: usize,
        field: SetField,
        raw: &str,
    ) -> Result<(), TrackingError> {
        self.ensure_active()?;
        if self.editor.update_set(index, field, raw) {
            Ok(())
        } else {
            Err(TrackingError::NoSuchSet(index))
        }
    }

    /// # Errors
    ///
    /// Returns `TrackingError::Inactive` when the screen is closed,
    /// `TrackingError::NoSuchSet` for an out-of-range index, or
    /// `TrackingError::LastSet` when only one set is left.
    pub fn remove_set(&mut self, index: usize) -> Result<WorkoutSet, TrackingError> {
        self.ensure_active()?;
        if index >= self.editor.len() {
            return Err(TrackingError::NoSuchSet(index));
        }
        self.editor.remove_set(index).ok_or(TrackingError::LastSet)
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    // ─── VOICE ──────────────────────────────────────────────────────────────

    /// Voice entry is offered only while enabled and a set exists.
    #[must_use]
    pub fn voice_available(&self) -> bool {
        self.voice == VoiceState::Available && !self.editor.is_empty()
    }

    /// Turn voice input off for the rest of this tracker's life.
    pub fn disable_voice(&mut self) {
        if self.voice == VoiceState::Available {
            warn!("speech recognition unsupported; voice input disabled");
            self.voice = VoiceState::Disabled {
                notice_pending: true,
            };
        }
    }

    /// The one-time unsupported notice, if not already shown.
    pub fn take_voice_notice(&mut self) -> Option<&'static str> {
        match self.voice {
            VoiceState::Disabled {
                notice_pending: true,
            } => {
                self.voice = VoiceState::Disabled {
                    notice_pending: false,
                };
                Some(VOICE_UNSUPPORTED_NOTICE)
            }
            _ => None,
        }
    }

    /// Parse a transcript and apply it to the last set.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Inactive` when the screen is closed, or
    /// `TrackingError::Voice` when the transcript is not understood,
    /// there is no set to update, or voice input is disabled. No set changes
    /// on failure.
    pub fn apply_transcript(&mut self, transcript: &str) -> Result<SetPatch, TrackingError> {
        self.ensure_active()?;
        if self.voice != VoiceState::Available {
            return Err(VoiceError::Unsupported.into());
        }
        if self.editor.is_empty() {
            return Err(VoiceError::NothingToUpdate.into());
        }
        let patch = parse_transcript(transcript).inspect_err(|err| {
            debug!(error = %err, "voice transcript rejected");
        })?;
        self.editor.apply_patch(patch)?;
        Ok(patch)
    }

    // ─── TIMERS ─────────────────────────────────────────────────────────────

    pub fn on_session_tick(&mut self) -> Option<u64> {
        self.session_timer.tick()
    }

    /// Start a rest countdown with the configured preset.
    ///
    /// # Errors
    ///
    /// Same as [`WorkoutTracker::start_rest`].
    pub fn start_default_rest(&mut self) -> Result<(), TrackingError> {
        self.start_rest(self.settings.rest_preset_secs())
    }

    /// # Errors
    ///
    /// Returns `TrackingError::Inactive` when the screen is closed or
    /// `TrackingError::ZeroRest` for a zero duration.
    pub fn start_rest(&mut self, seconds: u32) -> Result<(), TrackingError> {
        self.ensure_active()?;
        if self.rest_timer.start(seconds) {
            Ok(())
        } else {
            Err(TrackingError::ZeroRest)
        }
    }

    pub fn stop_rest(&mut self) {
        self.rest_timer.stop();
    }

    pub fn on_rest_tick(&mut self) -> Option<RestExpired> {
        self.rest_timer.tick()
    }

    // ─── SAVE ───────────────────────────────────────────────────────────────

    /// Immutable snapshot of the current sets, notes and elapsed duration.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Inactive` when the screen is closed or
    /// `TrackingError::EmptySession` when there are no sets.
    pub fn snapshot(&self) -> Result<WorkoutSession, TrackingError> {
        self.ensure_active()?;
        if self.editor.is_empty() {
            return Err(TrackingError::EmptySession);
        }
        let duration = self.session_timer.duration_minutes(&self.clock);
        Ok(WorkoutSession::new(
            self.exercise_id.clone(),
            self.editor.sets(),
            self.notes.clone(),
            duration,
            self.clock.now(),
        )?)
    }

    /// Reset after a successful save: editor and notes cleared, stopwatch idle.
    pub fn mark_saved(&mut self) {
        self.editor.clear();
        self.notes.clear();
        self.session_timer.stop();
    }

    // ─── ACCESSORS ──────────────────────────────────────────────────────────

    #[must_use]
    pub fn exercise_id(&self) -> &ExerciseId {
        &self.exercise_id
    }

    #[must_use]
    pub fn settings(&self) -> TrackerSettings {
        self.settings
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn sets(&self) -> &[WorkoutSet] {
        self.editor.sets()
    }

    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    #[must_use]
    pub fn session_timer(&self) -> &SessionTimer {
        &self.session_timer
    }

    #[must_use]
    pub fn rest_timer(&self) -> &RestTimer {
        &self.rest_timer
    }

    #[must_use]
    pub fn live_volume(&self) -> f64 {
        self.editor.total_volume()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workout_core::time::{fixed_clock, fixed_now};

    fn tracker() -> WorkoutTracker {
        WorkoutTracker::new(
            ExerciseId::new("bench-press").unwrap(),
            fixed_clock(),
            TrackerSettings::default(),
        )
    }

    #[test]
    fn enter_starts_one_stopwatch() {
        let mut tracker = tracker();
        assert!(tracker.enter(None));
        tracker.advance_clock(Duration::seconds(10));
        assert!(!tracker.enter(None));
        assert_eq!(tracker.session_timer().started_at(), Some(fixed_now()));
        assert_eq!(tracker.sets().len(), 1);
    }

    #[test]
    fn voice_updates_last_set() {
        let mut tracker = tracker();
        tracker.enter(None);
        tracker.update_set(0, SetField::Reps, "5").unwrap();
        tracker.update_set(0, SetField::Weight, "0").unwrap();

        tracker.apply_transcript("10 reps 50 kilos").unwrap();
        assert_eq!((tracker.sets()[0].reps, tracker.sets()[0].weight), (10, 50.0));
    }

    #[test]
    fn nonsense_transcript_changes_nothing() {
        let mut tracker = tracker();
        tracker.enter(None);
        let before = tracker.sets().to_vec();

        let err = tracker.apply_transcript("nonsense").unwrap_err();
        assert!(matches!(
            err,
            TrackingError::Voice(VoiceError::NotUnderstood { .. })
        ));
        assert_eq!(tracker.sets(), before.as_slice());
    }

    #[test]
    fn voice_needs_a_set() {
        let mut tracker = tracker();
        tracker.enter(None);
        tracker.mark_saved();
        assert!(!tracker.voice_available());
        let err = tracker.apply_transcript("10 reps").unwrap_err();
        assert!(matches!(err, TrackingError::Voice(VoiceError::NothingToUpdate)));
    }

    #[test]
    fn unsupported_notice_is_shown_once() {
        let mut tracker = tracker();
        tracker.enter(None);
        tracker.disable_voice();
        tracker.disable_voice();

        assert!(!tracker.voice_available());
        assert_eq!(tracker.take_voice_notice(), Some(VOICE_UNSUPPORTED_NOTICE));
        assert_eq!(tracker.take_voice_notice(), None);
        assert!(matches!(
            tracker.apply_transcript("10 reps"),
            Err(TrackingError::Voice(VoiceError::Unsupported))
        ));
    }

    #[test]
    fn snapshot_derives_duration_from_start() {
        let mut tracker = tracker();
        tracker.enter(None);
        tracker.on_session_tick();
        tracker.advance_clock(Duration::seconds(65));

        let session = tracker.snapshot().unwrap();
        assert_eq!(session.duration_minutes(), 1);
        assert_eq!(session.recorded_at(), fixed_now() + Duration::seconds(65));
    }

    #[test]
    fn empty_snapshot_is_rejected() {
        let mut tracker = tracker();
        tracker.enter(None);
        tracker.mark_saved();
        assert!(matches!(tracker.snapshot(), Err(TrackingError::EmptySession)));
    }

    #[test]
    fn last_set_cannot_be_removed() {
        let mut tracker = tracker();
        tracker.enter(None);
        tracker.add_set().unwrap();

        assert_eq!(tracker.remove_set(1).unwrap().ordinal, 2);
        assert!(matches!(tracker.remove_set(0), Err(TrackingError::LastSet)));
        assert!(matches!(tracker.remove_set(4), Err(TrackingError::NoSuchSet(4))));
        assert_eq!(tracker.sets().len(), 1);
    }

    #[test]
    fn closed_tracker_rejects_changes() {
        let mut tracker = tracker();
        tracker.enter(None);
        tracker.leave();

        assert!(matches!(tracker.add_set(), Err(TrackingError::Inactive)));
        assert!(matches!(
            tracker.update_set(0, SetField::Reps, "12"),
            Err(TrackingError::Inactive)
        ));
        assert!(matches!(tracker.remove_set(0), Err(TrackingError::Inactive)));
        assert!(matches!(
            tracker.apply_transcript("10 reps"),
            Err(TrackingError::Inactive)
        ));
        assert!(matches!(tracker.start_rest(60), Err(TrackingError::Inactive)));
        assert!(matches!(tracker.snapshot(), Err(TrackingError::Inactive)));
        assert_eq!(tracker.sets(), &[WorkoutSet::with_defaults(1)]);
        assert!(!tracker.rest_timer().is_counting());
    }

    #[test]
    fn never_entered_tracker_is_inactive() {
        let mut tracker = tracker();
        assert!(!tracker.is_active());
        assert!(matches!(tracker.add_set(), Err(TrackingError::Inactive)));
    }

    #[test]
    fn leave_stops_both_timers() {
        let mut tracker = tracker();
        tracker.enter(None);
        tracker.start_rest(60).unwrap();
        tracker.leave();

        assert!(!tracker.session_timer().is_running());
        assert!(!tracker.rest_timer().is_counting());
        assert_eq!(tracker.sets().len(), 1);
    }

    #[test]
    fn mark_saved_resets_editor_and_stopwatch() {
        let mut tracker = tracker();
        tracker.enter(None);
        tracker.set_notes("felt strong");
        tracker.start_default_rest().unwrap();
        tracker.mark_saved();

        assert!(tracker.sets().is_empty());
        assert!(tracker.notes().is_empty());
        assert!(!tracker.session_timer().is_running());
        assert_eq!(tracker.rest_timer().remaining_secs(), 90);
        assert_eq!(tracker.add_set().unwrap().ordinal, 1);
    }

    #[test]
    fn zero_rest_is_an_error() {
        let mut tracker = tracker();
        tracker.enter(None);
        assert!(matches!(tracker.start_rest(0), Err(TrackingError::ZeroRest)));
    }
}
