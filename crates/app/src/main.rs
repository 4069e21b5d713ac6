use chrono::Duration;
use std::fmt;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use services::config::settings_from_env;
use services::{AppServices, Clock, ScreenEvent, ScriptedTranscripts, TrackingError};
use storage::repository::{SessionRepository, Storage};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use workout_core::model::{
    ExerciseId, SetField, TimeWindow, TrackerSettings, WorkoutSession, WorkoutSet,
};

const DEFAULT_EXERCISE: &str = "bench-press";
const DEMO_REST_SECS: u32 = 3;
const DEMO_TRANSCRIPTS: [&str; 3] = ["10 reps 50 kilos", "12 reps", "uh, what was that"];

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidExerciseId { raw: String },
    InvalidWindow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidExerciseId { raw } => write!(f, "invalid --exercise value: {raw}"),
            ArgsError::InvalidWindow { raw } => write!(f, "invalid --window value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- catalog [--category <name>]");
    eprintln!("  cargo run -p app -- demo    [--exercise <id>] [--window <1m|3m|6m|all>]");
    eprintln!();
    eprintln!("Defaults for demo:");
    eprintln!("  --exercise {DEFAULT_EXERCISE}");
    eprintln!("  --window from WORKOUT_PROGRESS_WINDOW, else all");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  WORKOUT_EXERCISE_ID, WORKOUT_WEIGHT_UNIT, WORKOUT_REST_SECS,");
    eprintln!("  WORKOUT_PROGRESS_WINDOW, RUST_LOG (falls back to WORKOUT_LOG)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Catalog,
    Demo,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "catalog" => Some(Self::Catalog),
            "demo" => Some(Self::Demo),
            _ => None,
        }
    }
}

struct CatalogArgs {
    category: Option<String>,
}

struct DemoArgs {
    exercise_id: ExerciseId,
    window: Option<TimeWindow>,
}

impl CatalogArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut category = None;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--category" => category = Some(require_value(args, "--category")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(Self { category })
    }
}

impl DemoArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let raw_id = std::env::var("WORKOUT_EXERCISE_ID")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EXERCISE.into());
        let mut exercise_id = parse_exercise_id(raw_id)?;
        let mut window = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--exercise" => {
                    exercise_id = parse_exercise_id(require_value(args, "--exercise")?)?;
                }
                "--window" => {
                    let value = require_value(args, "--window")?;
                    let parsed = value
                        .parse::<TimeWindow>()
                        .map_err(|_| ArgsError::InvalidWindow { raw: value.clone() })?;
                    window = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            exercise_id,
            window,
        })
    }
}

fn parse_exercise_id(raw: String) -> Result<ExerciseId, ArgsError> {
    ExerciseId::new(&raw).map_err(|_| ArgsError::InvalidExerciseId { raw })
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            let level = std::env::var("WORKOUT_LOG").unwrap_or_else(|_| "info".into());
            EnvFilter::try_new(level)
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: the demo when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Demo,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Demo,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let settings = settings_from_env();
    let mut iter = argv.into_iter();
    match cmd {
        Command::Catalog => {
            let parsed = CatalogArgs::parse(&mut iter).inspect_err(|e| {
                eprintln!("{e}");
                print_usage();
            })?;
            run_catalog(settings, parsed).await
        }
        Command::Demo => {
            let parsed = DemoArgs::parse(&mut iter).inspect_err(|e| {
                eprintln!("{e}");
                print_usage();
            })?;
            run_demo(settings, parsed).await
        }
    }
}

async fn run_catalog(
    settings: TrackerSettings,
    args: CatalogArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let services = AppServices::in_memory(
        Clock::default_clock(),
        settings,
        parse_exercise_id(DEFAULT_EXERCISE.into())?,
    )
    .await?;
    let exercises = services
        .workouts()
        .list_exercises(args.category.as_deref())
        .await?;

    if exercises.is_empty() {
        eprintln!("no exercises match");
    }
    for exercise in exercises {
        println!(
            "{:<10} {:<22} {}",
            exercise.category().as_str(),
            exercise.id().as_str(),
            exercise.name()
        );
    }
    Ok(())
}

async fn run_demo(
    settings: TrackerSettings,
    args: DemoArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let clock = Clock::default_clock();
    let window = args.window.unwrap_or_else(|| settings.progress_window());
    let settings = TrackerSettings::new(settings.weight_unit(), settings.rest_preset_secs(), window)?;

    let storage = Storage::in_memory();
    seed_history(storage.sessions.as_ref(), &args.exercise_id, clock).await?;

    let services = AppServices::new(storage, clock, settings, args.exercise_id)
        .await?
        .with_transcripts(Arc::new(ScriptedTranscripts::new(DEMO_TRANSCRIPTS)));
    info!(exercise_id = %services.exercise_id(), window = window.as_str(), "starting demo session");

    let mut screen = services.open_tracking().await?;
    if let Some(notice) = screen.take_voice_notice() {
        eprintln!("{notice}");
    }

    listen(&mut screen).await;
    screen.tracker_mut().add_set()?;
    listen(&mut screen).await;
    screen.tracker_mut().add_set()?;
    screen.tracker_mut().update_set(2, SetField::Effort, "9")?;
    listen(&mut screen).await;

    screen.start_rest(DEMO_REST_SECS)?;
    let rest = tokio::time::timeout(StdDuration::from_secs(u64::from(DEMO_REST_SECS) + 2), async {
        while let Some(event) = screen.next_event().await {
            match event {
                ScreenEvent::SessionTick { display: elapsed_display, .. } => info!(elapsed = %elapsed_display, "session"),
                ScreenEvent::RestTick { remaining_secs } => info!(remaining_secs, "rest"),
                ScreenEvent::RestExpired(_) => return true,
            }
        }
        false
    })
    .await;
    if !matches!(rest, Ok(true)) {
        warn!("rest countdown did not finish");
    }

    let outcome = screen.save().await?;
    screen.close();
    let dashboard = services.workouts().dashboard().await?;

    let report = serde_json::json!({
        "saved": outcome,
        "dashboard": dashboard,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn listen(screen: &mut services::TrackingScreen) {
    match screen.listen().await {
        Ok(patch) => info!(reps = ?patch.reps, weight = ?patch.weight, "voice update applied"),
        Err(TrackingError::Voice(err)) => eprintln!("{err}"),
        Err(err) => warn!(error = %err, "voice input failed"),
    }
}

async fn seed_history(
    sessions: &dyn SessionRepository,
    exercise_id: &ExerciseId,
    clock: Clock,
) -> Result<(), Box<dyn std::error::Error>> {
    let now = clock.now();
    for (days_ago, weight, reps) in [(150, 40.0, 10), (75, 42.5, 10), (30, 45.0, 8), (7, 47.5, 8)] {
        let sets = [
            WorkoutSet::new(1, reps, weight, 6),
            WorkoutSet::new(2, reps, weight, 7),
            WorkoutSet::new(3, reps - 2, weight, 9),
        ];
        let session = WorkoutSession::new(
            exercise_id.clone(),
            &sets,
            "",
            40,
            now - Duration::days(days_ago),
        )?;
        sessions.save_session(&session).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_logging();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
