//! liftbook - Personal workout log

use anyhow::{Context, Result, bail};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use tracing::{Level, info};

use liftbook::config::{DEFAULT_DB_PATH, Settings};
use liftbook::db::Database;
use liftbook::exercises::{Exercise, MetricType};
use liftbook::input::{self, EntryForm};
use liftbook::progress::metrics;
use liftbook::tracker::{DEFAULT_RECENT_LIMIT, Tracker};
use liftbook::tui::App;
use liftbook::workout::{RecordId, format_number, format_value};

#[derive(Parser)]
#[command(name = "liftbook")]
#[command(author, version, about = "Personal workout log with personal records")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "LIFTBOOK_DB", default_value = DEFAULT_DB_PATH)]
    db: String,

    /// Entries in the recent activity view
    #[arg(
        long,
        global = true,
        env = "LIFTBOOK_RECENT_LIMIT",
        default_value_t = DEFAULT_RECENT_LIMIT
    )]
    recent: usize,

    /// Days without a session before suggesting an increase
    #[arg(
        long,
        global = true,
        env = "LIFTBOOK_STALE_DAYS",
        default_value_t = metrics::DEFAULT_STALE_DAYS
    )]
    stale_days: i64,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI dashboard
    Tui,

    /// Log a workout entry
    Log {
        /// Exercise name (e.g., "squat", "plank")
        exercise: String,

        /// Weight in kg (weighted exercises)
        #[arg(short, long)]
        weight: Option<String>,

        /// Reps per set
        #[arg(short, long, default_value = "")]
        reps: String,

        /// Number of sets
        #[arg(short, long, default_value = "1")]
        sets: String,

        /// Assistance band: none, light, medium, heavy
        #[arg(short, long, default_value = "none")]
        band: String,

        /// Duration in seconds or m:ss (timed exercises)
        #[arg(short = 't', long, allow_hyphen_values = true)]
        duration: Option<String>,
    },

    /// Show history and progress of one exercise
    History {
        exercise: String,
    },

    /// Show the most recent entries across all exercises
    Recent,

    /// Show logbook statistics
    Stats,

    /// List exercises by category
    Exercises,

    /// Add a custom exercise
    AddExercise {
        name: String,

        /// weighted, bodyweight or timed
        #[arg(short = 'T', long = "type", default_value = "weighted")]
        kind: String,

        #[arg(short, long, default_value = "Other")]
        category: String,
    },

    /// Delete an exercise and its whole history
    RemoveExercise {
        exercise: String,
    },

    /// Delete a single entry by id
    RemoveRecord {
        id: u64,
    },
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // stderr shares the terminal with the dashboard
    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    let level = match (cli.verbose, interactive) {
        (true, _) => Level::DEBUG,
        (false, true) => Level::WARN,
        (false, false) => Level::INFO,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings {
        db_path: cli.db,
        recent_limit: cli.recent,
        stale_days: cli.stale_days,
    };
    let db = Database::open(&settings.db_path)
        .with_context(|| format!("opening {}", settings.db_path))?;

    match cli.command {
        Some(Commands::Tui) | None => {
            let mut app = App::new(db, settings)?;
            app.run()?;
        }

        Some(Commands::Log { exercise, weight, reps, sets, band, duration }) => {
            let mut tracker = db.load_tracker()?;
            let target = find(&tracker, &exercise)?.clone();
            let form = EntryForm {
                weight: weight.unwrap_or_default(),
                reps,
                sets,
                band,
                seconds: duration.unwrap_or_default(),
            };

            let Some(payload) = input::parse_payload(target.kind, &form) else {
                println!("Negative duration, nothing logged");
                return Ok(());
            };

            let id = tracker.append(target.id, Utc::now(), payload)?;
            db.save_tracker(&tracker)?;
            info!(exercise = target.name.as_str(), record = %id, "Logged");

            let history = tracker.all_for(target.id);
            let is_pr = history
                .iter()
                .find(|r| r.id == id)
                .is_some_and(|r| metrics::is_new_record(r, history, target.kind));
            println!(
                "Logged: {} - {} (id: {}){}",
                target.name,
                payload.describe(),
                id,
                if is_pr { " - new personal record!" } else { "" }
            );
        }

        Some(Commands::History { exercise }) => {
            let tracker = db.load_tracker()?;
            let target = find(&tracker, &exercise)?;
            print_history(&tracker, target, &settings);
        }

        Some(Commands::Recent) => {
            let tracker = db.load_tracker()?;
            println!("Recent entries:");
            println!("{:-<60}", "");
            for entry in tracker.all_records(settings.recent_limit) {
                println!(
                    "{:>4} | {} | {:20} | {}",
                    entry.record.id.0,
                    entry.record.logged_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                    entry.exercise.name,
                    entry.record.payload.describe()
                );
            }
        }

        Some(Commands::Stats) => {
            let tracker = db.load_tracker()?;
            let summary = tracker.summary();

            println!("Logbook Statistics");
            println!("{:-<40}", "");
            println!("Sessions logged:  {}", summary.total_sessions);
            println!("Exercises used:   {}", summary.exercises_used);
            println!("Total volume:     {}kg", format_number(summary.total_volume));
            println!("Weekly frequency: {:.1} sessions/week", summary.weekly_frequency);
        }

        Some(Commands::Exercises) => {
            let tracker = db.load_tracker()?;
            for (category, exercises) in tracker.catalog().by_category() {
                println!("{}", category);
                for e in exercises {
                    println!("  {} {:20} {}", e.icon, e.name, e.kind);
                }
            }
        }

        Some(Commands::AddExercise { name, kind, category }) => {
            let Some(kind) = MetricType::parse(&kind) else {
                bail!("unknown exercise type '{}', expected weighted, bodyweight or timed", kind);
            };
            let mut tracker = db.load_tracker()?;
            let id = tracker.add_exercise(&name, kind, &category)?;
            db.save_tracker(&tracker)?;
            info!(%id, name = name.as_str(), "Exercise added");
            println!("Added: {} ({}, {}) id: {}", name, kind, category, id);
        }

        Some(Commands::RemoveExercise { exercise }) => {
            let mut tracker = db.load_tracker()?;
            let id = find(&tracker, &exercise)?.id;
            let entries = tracker.all_for(id).len();
            if let Some(removed) = tracker.remove_exercise(id) {
                db.save_tracker(&tracker)?;
                println!("Deleted {} and {} entries", removed.name, entries);
            }
        }

        Some(Commands::RemoveRecord { id }) => {
            let mut tracker = db.load_tracker()?;
            let record_id = RecordId(id);
            let Some(owner) = tracker.owner_of(record_id) else {
                bail!("no entry with id {}", id);
            };
            if let Some(record) = tracker.remove(owner, record_id) {
                db.save_tracker(&tracker)?;
                println!("Deleted entry {}: {}", id, record.payload.describe());
            }
        }
    }

    Ok(())
}

fn find<'a>(tracker: &'a Tracker, name: &str) -> Result<&'a Exercise> {
    tracker
        .catalog()
        .find_by_name(name)
        .with_context(|| format!("unknown exercise '{}'", name))
}

fn print_history(tracker: &Tracker, exercise: &Exercise, settings: &Settings) {
    let Some(progress) = tracker.progress(exercise.id, Utc::now(), settings.stale_days) else {
        return;
    };
    let kind = exercise.kind;

    println!("{} {} ({}, {})", exercise.icon, exercise.name, exercise.category, kind);
    println!("{:-<60}", "");
    println!(
        "Personal record: {}",
        progress.personal_record.map_or("-".to_string(), |v| format_value(kind, v))
    );
    if let Some(cmp) = progress.comparison {
        println!(
            "Since start:     {} -> {} ({:+.1}%)",
            format_value(kind, cmp.previous),
            format_value(kind, cmp.current),
            cmp.percent_change()
        );
    }
    match progress.days_since {
        Some(days) => println!("Last session:    {} days ago", days),
        None => println!("Last session:    never"),
    }
    if progress.needs_increase {
        println!("It has been {}+ days: time to increase difficulty", settings.stale_days);
    }
    println!("{:-<60}", "");

    let history = tracker.all_for(exercise.id);
    for record in metrics::chronological(history).into_iter().rev() {
        let preceding = metrics::preceding(history, record);
        let direction = metrics::direction_vs_previous(record, preceding, kind);
        println!(
            "{:>4} | {} | {:24} | {} {}",
            record.id.0,
            record.logged_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            record.payload.describe(),
            direction.arrow(),
            if metrics::is_new_record(record, history, kind) { "PR" } else { "" }
        );
    }
}
