use async_trait::async_trait;
use chrono::Duration;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use services::platform::{Haptics, ScriptedTranscripts, TranscriptSource, UnsupportedTranscripts};
use services::tracking::VOICE_UNSUPPORTED_NOTICE;
use services::{
    Clock, PlatformError, SaveWorkflow, ScreenEvent, TrackingError, TrackingScreen,
    WorkoutService, WorkoutTracker,
};
use storage::repository::{
    InMemoryRepository, SavedSession, SessionRepository, SessionRow, StorageError,
};
use workout_core::model::{
    ExerciseId, SessionId, SetField, TrackerSettings, WorkoutSession, WorkoutSet,
};
use workout_core::time::fixed_now;
use workout_core::voice::VoiceError;

/// Session store that can be told to reject or stall saves.
#[derive(Clone, Default)]
struct FlakySessions {
    inner: InMemoryRepository,
    fail_saves: Arc<AtomicBool>,
    save_delay_secs: Arc<AtomicU64>,
    save_calls: Arc<AtomicUsize>,
}

#[async_trait]
impl SessionRepository for FlakySessions {
    async fn save_session(&self, session: &WorkoutSession) -> Result<SavedSession, StorageError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.save_delay_secs.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(std::time::Duration::from_secs(delay)).await;
        }
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("offline".into()));
        }
        self.inner.save_session(session).await
    }

    async fn get_session(&self, id: SessionId) -> Result<SessionRow, StorageError> {
        self.inner.get_session(id).await
    }

    async fn list_sessions(&self, id: &ExerciseId) -> Result<Vec<SessionRow>, StorageError> {
        self.inner.list_sessions(id).await
    }

    async fn latest_session(&self, id: &ExerciseId) -> Result<Option<SessionRow>, StorageError> {
        self.inner.latest_session(id).await
    }

    async fn list_all_sessions(&self) -> Result<Vec<SessionRow>, StorageError> {
        self.inner.list_all_sessions().await
    }

    async fn replace_session(
        &self,
        id: SessionId,
        amended: &WorkoutSession,
    ) -> Result<SessionId, StorageError> {
        self.inner.replace_session(id, amended).await
    }

    async fn delete_session(&self, id: SessionId) -> Result<(), StorageError> {
        self.inner.delete_session(id).await
    }
}

#[derive(Default)]
struct CountingHaptics {
    pulses: AtomicUsize,
}

#[async_trait]
impl Haptics for CountingHaptics {
    async fn pulse(&self) -> Result<(), PlatformError> {
        self.pulses.fetch_add(1, Ordering::SeqCst);
        Err(PlatformError::Failed("motor busy".into()))
    }
}

struct Harness {
    sessions: FlakySessions,
    workouts: Arc<WorkoutService>,
    haptics: Arc<CountingHaptics>,
}

fn bench() -> ExerciseId {
    ExerciseId::new("bench-press").unwrap()
}

fn harness() -> Harness {
    let catalog = InMemoryRepository::with_builtin_catalog();
    let sessions = FlakySessions {
        inner: catalog.clone(),
        ..FlakySessions::default()
    };
    let workouts = Arc::new(WorkoutService::new(
        Clock::fixed(fixed_now()),
        TrackerSettings::default(),
        Arc::new(catalog),
        Arc::new(sessions.clone()),
    ));
    Harness {
        sessions,
        workouts,
        haptics: Arc::new(CountingHaptics::default()),
    }
}

async fn open(h: &Harness, transcripts: Arc<dyn TranscriptSource>) -> TrackingScreen {
    let tracker = WorkoutTracker::new(bench(), Clock::fixed(fixed_now()), TrackerSettings::default());
    TrackingScreen::open(
        tracker,
        SaveWorkflow::new(Arc::clone(&h.workouts)),
        transcripts,
        h.haptics.clone(),
    )
    .await
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn session_ticks_drive_display() {
    let h = harness();
    let mut screen = open(&h, Arc::new(UnsupportedTranscripts)).await;

    assert!(screen.has_session_ticker());
    for expected in 1..=3_u64 {
        let event = screen.next_event().await.unwrap();
        assert_eq!(
            event,
            ScreenEvent::SessionTick {
                elapsed_secs: expected,
                display: format!("00:0{expected}"),
            }
        );
    }
}

#[tokio::test(start_paused = true)]
async fn stopping_rest_never_expires() {
    let h = harness();
    let mut screen = open(&h, Arc::new(UnsupportedTranscripts)).await;
    screen.start_rest(90).unwrap();

    let mut rest_ticks = 0;
    while rest_ticks < 5 {
        if let Some(ScreenEvent::RestTick { remaining_secs }) = screen.next_event().await {
            rest_ticks += 1;
            assert_eq!(remaining_secs, 90 - rest_ticks);
        }
    }
    screen.stop_rest();
    assert!(!screen.has_rest_ticker());
    assert!(!screen.tracker().rest_timer().is_counting());

    let waited = tokio::time::timeout(std::time::Duration::from_secs(120), async {
        loop {
            match screen.next_event().await {
                Some(ScreenEvent::SessionTick { .. }) => {}
                other => return other,
            }
        }
    })
    .await;
    assert!(waited.is_err(), "rest event after stop: {waited:?}");
    assert_eq!(h.haptics.pulses.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn rest_expiry_pulses_haptics_once() {
    let h = harness();
    let mut screen = open(&h, Arc::new(UnsupportedTranscripts)).await;
    screen.start_rest(3).unwrap();

    let expired = loop {
        if let Some(ScreenEvent::RestExpired(expired)) = screen.next_event().await {
            break expired;
        }
    };
    assert_eq!(expired.duration_secs, 3);
    assert!(!screen.has_rest_ticker());
    assert_eq!(h.haptics.pulses.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn restarting_rest_replaces_countdown() {
    let h = harness();
    let mut screen = open(&h, Arc::new(UnsupportedTranscripts)).await;
    screen.start_rest(60).unwrap();
    screen.start_rest(120).unwrap();

    let remaining = loop {
        if let Some(ScreenEvent::RestTick { remaining_secs }) = screen.next_event().await {
            break remaining_secs;
        }
    };
    assert_eq!(remaining, 119);
}

#[tokio::test(start_paused = true)]
async fn save_records_duration_and_resets() {
    let h = harness();
    let mut screen = open(&h, Arc::new(UnsupportedTranscripts)).await;
    screen.next_event().await.unwrap();

    let tracker = screen.tracker_mut();
    tracker.update_set(0, SetField::Weight, "60").unwrap();
    tracker.add_set().unwrap();
    tracker.set_notes("smooth");
    tracker.advance_clock(Duration::seconds(65));

    let outcome = screen.save().await.unwrap();

    assert_eq!(outcome.session.duration_minutes(), 1);
    assert_eq!(outcome.session.notes(), "smooth");
    assert!(outcome.saved.auto_tracked);
    let analytics = outcome.analytics.unwrap();
    assert_eq!(analytics.stats.total_sessions, 1);
    assert_eq!(analytics.stats.total_volume, 1200.0);
    assert_eq!(analytics.history.len(), 1);

    assert!(screen.tracker().sets().is_empty());
    assert!(!screen.tracker().session_timer().is_running());
    assert!(!screen.has_session_ticker());
}

#[tokio::test(start_paused = true)]
async fn failed_save_keeps_everything() {
    let h = harness();
    let mut screen = open(&h, Arc::new(UnsupportedTranscripts)).await;
    screen.tracker_mut().set_notes("retry me");
    h.sessions.fail_saves.store(true, Ordering::SeqCst);

    let err = screen.save().await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(screen.tracker().sets().len(), 1);
    assert_eq!(screen.tracker().notes(), "retry me");
    assert!(screen.tracker().session_timer().is_running());
    assert!(screen.has_session_ticker());

    h.sessions.fail_saves.store(false, Ordering::SeqCst);
    assert!(screen.save().await.is_ok());
    assert_eq!(h.sessions.save_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn empty_save_never_reaches_collaborator() {
    let h = harness();
    let mut screen = open(&h, Arc::new(UnsupportedTranscripts)).await;
    screen.save().await.unwrap();
    assert_eq!(h.sessions.save_calls.load(Ordering::SeqCst), 1);

    let err = screen.save().await.unwrap_err();
    assert!(matches!(err, TrackingError::EmptySession));
    assert_eq!(h.sessions.save_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn removing_the_only_set_is_refused() {
    let h = harness();
    let mut screen = open(&h, Arc::new(UnsupportedTranscripts)).await;

    let err = screen.tracker_mut().remove_set(0).unwrap_err();
    assert!(matches!(err, TrackingError::LastSet));
    assert!(screen.tracker().is_active());
    assert_eq!(screen.tracker().sets().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn rest_keeps_counting_while_save_is_pending() {
    let h = harness();
    h.sessions.save_delay_secs.store(10, Ordering::SeqCst);
    let mut screen = open(&h, Arc::new(UnsupportedTranscripts)).await;
    screen.start_rest(3).unwrap();

    let started = tokio::time::Instant::now();
    screen.save().await.unwrap();
    assert!(started.elapsed() >= std::time::Duration::from_secs(10));

    assert!(!screen.tracker().rest_timer().is_counting());
    assert!(!screen.has_rest_ticker());
    assert_eq!(h.haptics.pulses.load(Ordering::SeqCst), 1);

    let mut rest_events = Vec::new();
    while rest_events.len() < 3 {
        match screen.next_event().await.unwrap() {
            ScreenEvent::SessionTick { .. } => {}
            event => rest_events.push(event),
        }
    }
    assert_eq!(
        rest_events[..2],
        [
            ScreenEvent::RestTick { remaining_secs: 2 },
            ScreenEvent::RestTick { remaining_secs: 1 },
        ]
    );
    assert!(matches!(
        rest_events[2],
        ScreenEvent::RestExpired(expired) if expired.duration_secs == 3
    ));
}

#[tokio::test(start_paused = true)]
async fn closed_screen_starts_nothing() {
    let h = harness();
    let transcripts = Arc::new(ScriptedTranscripts::new(["10 reps"]));
    let mut screen = open(&h, transcripts).await;
    screen.close();

    assert!(matches!(screen.start_rest(3), Err(TrackingError::Inactive)));
    assert!(matches!(screen.start_default_rest(), Err(TrackingError::Inactive)));
    assert!(!screen.has_rest_ticker());
    assert!(matches!(screen.listen().await, Err(TrackingError::Inactive)));
    assert!(matches!(screen.save().await, Err(TrackingError::Inactive)));
    assert_eq!(h.sessions.save_calls.load(Ordering::SeqCst), 0);
    assert_eq!(screen.tracker().sets()[0].reps, WorkoutSet::with_defaults(1).reps);

    let waited =
        tokio::time::timeout(std::time::Duration::from_secs(10), screen.next_event()).await;
    assert!(waited.is_err());
    assert_eq!(h.haptics.pulses.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn reentry_after_save_seeds_from_saved_session() {
    let h = harness();
    let mut screen = open(&h, Arc::new(UnsupportedTranscripts)).await;
    screen.tracker_mut().update_set(0, SetField::Reps, "8").unwrap();
    screen.tracker_mut().update_set(0, SetField::Weight, "70").unwrap();
    screen.save().await.unwrap();

    screen.close();
    screen.enter().await.unwrap();
    screen.enter().await.unwrap();

    assert!(screen.has_session_ticker());
    assert_eq!(screen.tracker().sets(), &[WorkoutSet::new(1, 8, 70.0, 5)]);
}

#[tokio::test(start_paused = true)]
async fn close_cancels_both_tickers() {
    let h = harness();
    let mut screen = open(&h, Arc::new(UnsupportedTranscripts)).await;
    screen.start_rest(60).unwrap();
    screen.close();

    assert!(!screen.has_session_ticker());
    assert!(!screen.has_rest_ticker());
    let waited =
        tokio::time::timeout(std::time::Duration::from_secs(10), screen.next_event()).await;
    assert!(waited.is_err());
}

#[tokio::test(start_paused = true)]
async fn scripted_voice_updates_last_set() {
    let h = harness();
    let transcripts = Arc::new(ScriptedTranscripts::new(["10 reps 50 kilos", "nonsense"]));
    let mut screen = open(&h, transcripts).await;
    screen.tracker_mut().update_set(0, SetField::Reps, "5").unwrap();

    screen.listen().await.unwrap();
    assert_eq!(screen.tracker().sets()[0].reps, 10);
    assert_eq!(screen.tracker().sets()[0].weight, 50.0);

    let err = screen.listen().await.unwrap_err();
    assert!(matches!(
        err,
        TrackingError::Voice(VoiceError::NotUnderstood { .. })
    ));
    assert_eq!(screen.tracker().sets()[0].reps, 10);
}

#[tokio::test(start_paused = true)]
async fn unsupported_voice_reports_once() {
    let h = harness();
    let mut screen = open(&h, Arc::new(UnsupportedTranscripts)).await;

    assert_eq!(screen.take_voice_notice(), Some(VOICE_UNSUPPORTED_NOTICE));
    assert_eq!(screen.take_voice_notice(), None);
    assert!(matches!(
        screen.listen().await,
        Err(TrackingError::Voice(VoiceError::Unsupported))
    ));
    assert_eq!(screen.take_voice_notice(), None);
}
