// Coach Calendar
// Command-line entry point over the local event database

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use clap::{Parser, Subcommand};

use coach_calendar::models::event::{EventDraft, RepeatKind};
use coach_calendar::models::settings::CalendarSettings;
use coach_calendar::services::database::Database;
use coach_calendar::services::event::{EventStore, SqliteEventStore};
use coach_calendar::services::settings::{database_path, SettingsService};
use coach_calendar::ui_egui::{CalendarMount, WeekCalendar};
use coach_calendar::utils::date::resolve_local;

#[derive(Parser)]
#[command(name = "coach-calendar", about = "Coach dashboard week calendar")]
struct Cli {
    /// Settings file (default: settings.toml in the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// User recorded as the creator of new events
    #[arg(long, default_value_t = 1)]
    acting_user: i64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one user's week, recurring events expanded
    Week {
        user_id: i64,
        /// Any day of the week to show (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Print occurrences as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create an event
    Add {
        user_id: i64,
        title: String,
        /// Local start, e.g. 2025-03-10T09:00
        #[arg(long)]
        start: String,
        /// Duration in minutes
        #[arg(long, default_value_t = 30)]
        minutes: i64,
        /// none, daily, weekly, monthly or yearly
        #[arg(long, default_value = "none")]
        repeat: String,
        /// Last local day of the series
        #[arg(long)]
        until: Option<NaiveDate>,
    },
    /// Delete an event and its whole series
    Delete { event_id: i64 },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let settings_service = match &cli.config {
        Some(path) => SettingsService::new(path),
        None => SettingsService::from_project_dirs()?,
    };
    let settings = settings_service.load_or_create()?;
    let store = open_store(&settings, cli.acting_user)?;

    log::info!("Using settings from {:?}", settings_service.path());

    match cli.command {
        Commands::Week { user_id, date, json } => print_week(store, settings, user_id, date, json).await,
        Commands::Add {
            user_id,
            title,
            start,
            minutes,
            repeat,
            until,
        } => add_event(&store, &settings, user_id, title, &start, minutes, &repeat, until).await,
        Commands::Delete { event_id } => {
            store.delete(event_id).await?;
            println!("Deleted event {}", event_id);
            Ok(())
        }
    }
}

fn open_store(settings: &CalendarSettings, acting_user: i64) -> Result<SqliteEventStore> {
    let path = database_path(settings)?;
    let path = path
        .to_str()
        .ok_or_else(|| anyhow!("Database path {:?} is not valid UTF-8", path))?;

    let db = Database::new(path)?;
    db.initialize_schema()?;
    Ok(SqliteEventStore::new(db, acting_user))
}

async fn print_week(
    store: SqliteEventStore,
    settings: CalendarSettings,
    user_id: i64,
    date: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let tz = settings.tz()?;
    let today = date.unwrap_or_else(|| Utc::now().with_timezone(&tz).date_naive());
    let mount = CalendarMount {
        user_id,
        is_admin: false,
    };

    let mut calendar = WeekCalendar::new(store, mount, settings, today)?;
    if !calendar.reload().await {
        let message = calendar
            .toasts()
            .latest_error()
            .map(|toast| toast.message.clone())
            .unwrap_or_else(|| "Failed to load events".to_string());
        return Err(anyhow!(message));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(calendar.occurrences())?);
        return Ok(());
    }

    for (day, date) in calendar.window().dates().into_iter().enumerate() {
        println!("{}", date.format("%a %Y-%m-%d"));

        for occurrence in calendar.all_day_occurrences(day) {
            println!("  all day      {}", occurrence.title);
        }

        for block in calendar.blocks().iter().filter(|block| block.day == day) {
            let occurrence = &calendar.occurrences()[block.index];
            let start = occurrence.start.with_timezone(&tz);
            let end = occurrence.end.with_timezone(&tz);
            let repeat = if occurrence.repeat_kind.is_repeating() {
                format!("  ({})", occurrence.repeat_kind.label().to_lowercase())
            } else {
                String::new()
            };
            println!(
                "  {}-{}  {}{}",
                start.format("%H:%M"),
                end.format("%H:%M"),
                occurrence.title,
                repeat
            );
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn add_event(
    store: &SqliteEventStore,
    settings: &CalendarSettings,
    user_id: i64,
    title: String,
    start: &str,
    minutes: i64,
    repeat: &str,
    until: Option<NaiveDate>,
) -> Result<()> {
    let tz = settings.tz()?;
    let local_start = NaiveDateTime::parse_from_str(start, "%Y-%m-%dT%H:%M")
        .context(format!("Invalid start '{}', expected YYYY-MM-DDTHH:MM", start))?;
    let start = resolve_local(local_start, tz);

    let last_second = NaiveTime::from_hms_opt(23, 59, 59).context("Invalid end-of-day time")?;
    let repeat_until = until.map(|date| resolve_local(date.and_time(last_second), tz));

    let draft = EventDraft::builder()
        .user_id(user_id)
        .title(title)
        .start(start)
        .end(start + Duration::minutes(minutes))
        .repeat(RepeatKind::from_str_lossy(repeat), repeat_until)
        .build()
        .map_err(|e| anyhow!(e))?;

    let event = store.create(draft).await?;
    println!("Created event {} '{}'", event.id, event.title);
    Ok(())
}
