//! `rooms` CLI - classroom occupancy lookups over a tab-separated term schedule.
//!
//! ## Usage
//!
//! ```sh
//! # Which rooms are in use right now (Pacific time), and what starts soon
//! rooms status -i schedule.tsv
//!
//! # Same view at a fixed instant with a 45 minute lookahead
//! rooms status -i schedule.tsv --at 2026-10-19T09:30 --lookahead 45
//!
//! # Rooms in CENTR that stay free for the next hour
//! rooms free -i schedule.tsv --minutes 60 --building CENTR
//!
//! # The week of CENTR 115 containing a date, as JSON
//! rooms schedule -i schedule.tsv --room "CENTR 115" --date 2026-12-09 --json
//!
//! # List every known room (reads the schedule from stdin)
//! cat schedule.tsv | rooms rooms
//! ```

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use classroom_engine::occupancy::DEFAULT_LOOKAHEAD_MINUTES;
use classroom_engine::{
    classify_with, find_free_with, project_week, ClassificationResult, ClassifyOptions,
    DaySchedule, FreeRoomQuery, Location, MeetingRecord, RawRow, ScanPolicy, ScheduleIndex,
};
use serde::Serialize;
use tracing::{warn, Level};

#[derive(Parser)]
#[command(
    name = "rooms",
    version,
    about = "Classroom occupancy, free-room and room-schedule lookups"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Tab-separated schedule file (reads from stdin if omitted)
    #[arg(short, long, global = true)]
    input: Option<String>,

    /// Query instant in local wall-clock time, YYYY-MM-DDTHH:MM[:SS] (defaults to now)
    #[arg(long, global = true)]
    at: Option<String>,

    /// IANA timezone used to resolve "now"
    #[arg(long, global = true, default_value = "America/Los_Angeles")]
    tz: String,

    /// Check every session of a room instead of stopping at the first gap
    #[arg(long, global = true)]
    full_scan: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every room as in use, starting soon, or free
    Status {
        /// Minutes ahead in which a session counts as upcoming
        #[arg(long, default_value_t = DEFAULT_LOOKAHEAD_MINUTES as u32)]
        lookahead: u32,
        /// Only show rooms in this building
        #[arg(long)]
        building: Option<String>,
    },
    /// List rooms that stay free for a number of minutes
    Free {
        /// How long the room must stay free
        #[arg(short, long)]
        minutes: u32,
        /// Only search this building
        #[arg(long)]
        building: Option<String>,
    },
    /// Show the weekly schedule of one room
    Schedule {
        /// Room as "BUILDING ROOM", e.g. "CENTR 115"
        #[arg(long)]
        room: String,
        /// Any date in the week to show, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List every room in the schedule
    Rooms {
        /// Only list rooms in this building
        #[arg(long)]
        building: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// JSON output DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct RoomStatusDto<'a> {
    room: String,
    current: &'a [MeetingRecord],
    upcoming: &'a [MeetingRecord],
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let now = resolve_now(cli.at.as_deref(), &cli.tz)?;
    let scan_policy = if cli.full_scan {
        ScanPolicy::FullScan
    } else {
        ScanPolicy::EarlyStop
    };
    let index = load_index(cli.input.as_deref())?;

    match cli.command {
        Commands::Status {
            lookahead,
            building,
        } => {
            let options = ClassifyOptions {
                lookahead: Duration::minutes(i64::from(lookahead)),
                scan_policy,
            };
            let statuses: Vec<(Location, ClassificationResult)> =
                classify_with(&index, now, &options)
                    .into_iter()
                    .filter(|(room, _)| in_building(room, building.as_deref()))
                    .collect();

            if cli.json {
                let dtos: Vec<RoomStatusDto> = statuses
                    .iter()
                    .map(|(room, result)| RoomStatusDto {
                        room: room.to_string(),
                        current: &result.current,
                        upcoming: &result.upcoming,
                    })
                    .collect();
                print_json(&dtos)?;
            } else {
                for (room, result) in &statuses {
                    println!("{}", describe_status(room, result));
                }
            }
        }
        Commands::Free { minutes, building } => {
            let mut query =
                FreeRoomQuery::new(Duration::minutes(i64::from(minutes))).with_scan_policy(scan_policy);
            if let Some(building) = building {
                query = query.in_building(building);
            }
            let free: Vec<String> = find_free_with(&index, now, &query)
                .iter()
                .map(Location::to_string)
                .collect();

            if cli.json {
                print_json(&free)?;
            } else if free.is_empty() {
                println!("No rooms are free for the next {} minutes", minutes);
            } else {
                for room in &free {
                    println!("{}", room);
                }
            }
        }
        Commands::Schedule { room, date } => {
            let location = index
                .find_room(&room)
                .with_context(|| format!("Unknown room: '{}'", room))?;
            let reference = match date.as_deref() {
                Some(raw) => parse_date(raw)?,
                None => now.date(),
            };
            let week = project_week(&index, location, reference);

            if cli.json {
                print_json(&week)?;
            } else {
                println!("{}", location);
                for day in &week {
                    print!("{}", describe_day(day));
                }
            }
        }
        Commands::Rooms { building } => {
            let rooms: Vec<String> = index
                .rooms()
                .iter()
                .filter(|room| in_building(room, building.as_deref()))
                .map(Location::to_string)
                .collect();

            if cli.json {
                print_json(&rooms)?;
            } else {
                for room in &rooms {
                    println!("{}", room);
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Build the index from the schedule file.
///
/// Blank lines and `#` comments are ignored. Lines with the wrong number of
/// columns are logged and skipped; row validation happens in the index.
fn load_index(path: Option<&str>) -> Result<ScheduleIndex> {
    let text = read_input(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .comment(Some(b'#'))
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "Skipping unreadable line");
                continue;
            }
        };
        let line = record.position().map_or(0, |p| p.line());
        match RawRow::from_fields(record.iter()) {
            Ok(row) => rows.push(row),
            Err(err) => warn!(line, error = %err, "Skipping malformed line"),
        }
    }

    Ok(ScheduleIndex::build(rows))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

/// The query instant: `--at` as given, otherwise the current wall-clock time in `tz`.
fn resolve_now(at: Option<&str>, tz: &str) -> Result<NaiveDateTime> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid timezone: '{}'", tz))?;
    match at {
        Some(raw) => parse_instant(raw),
        None => Ok(Utc::now().with_timezone(&tz).naive_local()),
    }
}

fn parse_instant(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .with_context(|| format!("Invalid --at '{}': expected YYYY-MM-DDTHH:MM[:SS]", raw))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid --date '{}': expected YYYY-MM-DD", raw))
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn in_building(room: &Location, building: Option<&str>) -> bool {
    building.map_or(true, |b| room.building.eq_ignore_ascii_case(b))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn describe_session(record: &MeetingRecord) -> String {
    format!(
        "{} {} {}",
        record.course_id,
        record.meeting_type,
        record.time_label()
    )
}

fn describe_sessions(records: &[MeetingRecord]) -> String {
    records
        .iter()
        .map(describe_session)
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_status(room: &Location, result: &ClassificationResult) -> String {
    match (result.current.is_empty(), result.upcoming.is_empty()) {
        (true, true) => format!("{}: free", room),
        (false, true) => format!("{}: in use ({})", room, describe_sessions(&result.current)),
        (true, false) => format!(
            "{}: starting soon ({})",
            room,
            describe_sessions(&result.upcoming)
        ),
        (false, false) => format!(
            "{}: in use ({}); next {}",
            room,
            describe_sessions(&result.current),
            describe_sessions(&result.upcoming)
        ),
    }
}

fn describe_day(day: &DaySchedule) -> String {
    let mut out = format!("{} {}", day.weekday, day.date);
    if day.finals_day {
        out.push_str(" (finals)");
    }
    out.push('\n');
    if day.slots.is_empty() {
        out.push_str("  -\n");
    }
    for slot in &day.slots {
        let courses: Vec<String> = slot
            .records
            .iter()
            .map(|r| format!("{} {} ({})", r.course_id, r.meeting_type, r.section_family))
            .collect();
        out.push_str(&format!("  {}  {}\n", slot.label, courses.join(", ")));
    }
    out
}
