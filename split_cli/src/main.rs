use clap::{Parser, Subcommand, ValueEnum};
use split_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "splitsched")]
#[command(about = "Gym split month-schedule generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the workout schedule for a month
    Generate {
        /// Target month in YYYY-MM format (e.g. 2026-09)
        #[arg(long)]
        month: String,

        /// Existing-events snapshot (JSON) for the month; defaults to
        /// <data-dir>/events/<month>.json
        #[arg(long)]
        events: Option<PathBuf>,

        /// Preview only - do not record the run or write suggested state
        #[arg(long)]
        dry_run: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Write output to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// List past generation runs
    Runs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
    Csv,
}

fn main() -> Result<()> {
    // Initialize logging
    split_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Commands::Generate {
            month,
            events,
            dry_run,
            format,
            out,
        } => cmd_generate(data_dir, &config, &month, events, dry_run, format, out),
        Commands::Runs => cmd_runs(data_dir),
    }
}

fn cmd_generate(
    data_dir: PathBuf,
    config: &Config,
    month: &str,
    events_path: Option<PathBuf>,
    dry_run: bool,
    format: Format,
    out: Option<PathBuf>,
) -> Result<()> {
    // Fail fast on a malformed month, before touching anything
    let month: Month = month.parse()?;

    let plan = default_plan();
    let matcher = ClassMatcher::new(
        config.calendar.class_markers.clone(),
        plan.generated_title_markers(),
    );
    let slots = SlotTable::from_config(&config.slots)?;

    let events_path =
        events_path.unwrap_or_else(|| data_dir.join("events").join(format!("{}.json", month)));
    let existing_events = load_existing_events(&events_path)?;

    let snapshot = ProgressionSnapshot::load(&data_dir.join("progression_state.json"))?;

    let ctx = ScheduleContext {
        month,
        existing_events: &existing_events,
        snapshot: &snapshot,
        matcher: &matcher,
        slots: &slots,
        progression: &config.progression,
    };

    let schedule = generate_month(plan, &ctx)?;

    let rendered = match format {
        Format::Text => render_text(&schedule, plan),
        Format::Json => render_json(&schedule, plan, config)?,
        Format::Csv => {
            let mut buffer = Vec::new();
            export::write_schedule_csv(&schedule, &mut buffer)?;
            String::from_utf8(buffer)
                .map_err(|e| Error::Other(format!("CSV output was not UTF-8: {}", e)))?
        }
    };

    match out {
        Some(path) => {
            write_output(&path, &rendered)?;
            eprintln!("Wrote schedule to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    // Status notes go to stderr so json/csv stdout stays machine-parseable
    if dry_run {
        eprintln!("[Dry run - run not recorded, suggested state not written]");
        return Ok(());
    }

    // Record the run and write the suggested snapshot update. The
    // authoritative progression state is never touched.
    let log = RunLog::new(data_dir.join("runs.jsonl"));
    log.append(&RunRecord::from_schedule(&schedule))?;

    schedule
        .suggested
        .write(&data_dir.join("suggested_state.json"))?;

    eprintln!("Run recorded. Suggested state written to suggested_state.json;");
    eprintln!("apply it to progression_state.json as you complete workouts.");

    Ok(())
}

fn cmd_runs(data_dir: PathBuf) -> Result<()> {
    let log = RunLog::new(data_dir.join("runs.jsonl"));
    let records = log.read()?;

    if records.is_empty() {
        println!("No runs recorded yet.");
        return Ok(());
    }

    for record in records {
        println!(
            "{}  {}  {} events ({} full, {} cardio, {} classes)",
            record.generated_at.format("%Y-%m-%d %H:%M"),
            record.month,
            record.total,
            record.full_workouts,
            record.cardio_sessions,
            record.classes_detected,
        );
    }

    Ok(())
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, contents)?;
    Ok(())
}

fn render_text(schedule: &MonthSchedule, plan: &WorkoutPlan) -> String {
    let mut out = String::new();

    out.push_str("╭─────────────────────────────────────────╮\n");
    out.push_str(&format!(
        "│  WORKOUT SCHEDULE {:<22}│\n",
        schedule.month.to_string()
    ));
    out.push_str("╰─────────────────────────────────────────╯\n\n");

    for event in &schedule.events {
        let marker = match event.kind {
            EventKind::FullWorkout => " ",
            EventKind::CardioOnly => "~",
        };
        out.push_str(&format!(
            "  {} {}  {}  {} ({} min)\n",
            marker,
            event.date,
            event.start.format("%H:%M"),
            event.title,
            event.duration_minutes,
        ));
    }

    out.push('\n');
    out.push_str(&format!("  Full workouts: {}\n", schedule.summary.full_workouts));
    out.push_str(&format!("  Cardio sessions: {}\n", schedule.summary.cardio_sessions));
    out.push_str(&format!("  Total events: {}\n", schedule.summary.total));
    out.push_str(&format!("  Classes detected: {}\n", schedule.summary.classes_detected));

    if !schedule.summary.warnings.is_empty() {
        out.push_str("\n  Warnings:\n");
        for warning in &schedule.summary.warnings {
            out.push_str(&format!("  - {}\n", warning));
        }
    }

    out.push_str("\n  Suggested state after completing the month:\n");
    out.push_str(&format!(
        "    total_full_workouts: {}\n",
        schedule.suggested.total_full_workouts
    ));
    out.push_str(&format!(
        "    next_deload_at: {}\n",
        schedule.suggested.next_deload_at
    ));

    out.push_str("\n  Sink should first delete events titled with any of:\n");
    for marker in plan.generated_title_markers() {
        out.push_str(&format!("  - {}\n", marker));
    }

    out
}

fn render_json(schedule: &MonthSchedule, plan: &WorkoutPlan, config: &Config) -> Result<String> {
    let value = serde_json::json!({
        "month": schedule.month,
        "timezone": config.calendar.timezone,
        "delete_markers": plan.generated_title_markers(),
        "events": schedule.events,
        "summary": schedule.summary,
        "suggested": schedule.suggested,
    });

    let mut rendered = serde_json::to_string_pretty(&value)?;
    rendered.push('\n');
    Ok(rendered)
}
