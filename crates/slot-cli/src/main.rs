//! `slotctl` CLI — inspect a provider's bookable time from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Open windows for a date (schedule from file)
//! slotctl windows -s schedule.json --date 2026-03-16
//!
//! # Available slots after subtracting bookings (schedule from stdin)
//! cat schedule.json | slotctl slots --date 2026-03-16 --min-duration 30
//!
//! # Classify a requested interval
//! slotctl status -s schedule.json --date 2026-03-16 --from 14:00 --to 15:00
//! ```

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::io::{self, Read};

use slot_engine::{
    AvailabilityEngine, AvailabilityStatus, BookedInterval, DateException, MemorySlotStore,
    RecurringRule, TimeInterval,
};

#[derive(Parser)]
#[command(
    name = "slotctl",
    version,
    about = "Availability and slot inspection for provider schedules"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the open windows for a date (rules + exceptions, no bookings)
    Windows {
        /// Schedule file (reads from stdin if omitted)
        #[arg(short, long)]
        schedule: Option<String>,
        /// Date to resolve, e.g. 2026-03-16
        #[arg(long)]
        date: NaiveDate,
        /// Restrict to a single service
        #[arg(long)]
        service: Option<String>,
    },
    /// Compute bookable slots for a date after subtracting bookings
    Slots {
        /// Schedule file (reads from stdin if omitted)
        #[arg(short, long)]
        schedule: Option<String>,
        /// Date to compute, e.g. 2026-03-16
        #[arg(long)]
        date: NaiveDate,
        /// Restrict to a single service
        #[arg(long)]
        service: Option<String>,
        /// Minimum slot length in minutes (default 10)
        #[arg(long)]
        min_duration: Option<i64>,
    },
    /// Classify a requested interval against the schedule
    Status {
        /// Schedule file (reads from stdin if omitted)
        #[arg(short, long)]
        schedule: Option<String>,
        /// Date of the request, e.g. 2026-03-16
        #[arg(long)]
        date: NaiveDate,
        /// Restrict to a single service
        #[arg(long)]
        service: Option<String>,
        /// Requested start time, e.g. 14:00
        #[arg(long)]
        from: String,
        /// Requested end time, e.g. 15:00
        #[arg(long)]
        to: String,
    },
}

/// A provider's complete schedule document.
#[derive(Deserialize)]
struct ScheduleFile {
    provider_id: String,
    #[serde(default)]
    rules: Vec<RecurringRule>,
    #[serde(default)]
    exceptions: Vec<DateException>,
    #[serde(default)]
    bookings: Vec<BookedInterval>,
}

type ScheduleEngine =
    AvailabilityEngine<Vec<RecurringRule>, Vec<DateException>, Vec<BookedInterval>, MemorySlotStore>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Windows {
            schedule,
            date,
            service,
        } => {
            let (provider_id, engine) = load_engine(schedule.as_deref())?;
            let windows = engine.resolve_open_windows(&provider_id, service.as_deref(), date)?;
            println!("{}", serde_json::to_string_pretty(&windows)?);
        }
        Commands::Slots {
            schedule,
            date,
            service,
            min_duration,
        } => {
            let (provider_id, engine) = load_engine(schedule.as_deref())?;
            let result = engine.compute_available_slots(
                &provider_id,
                service.as_deref(),
                date,
                min_duration.map(Duration::minutes),
            )?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Status {
            schedule,
            date,
            service,
            from,
            to,
        } => {
            let (provider_id, engine) = load_engine(schedule.as_deref())?;
            let requested = TimeInterval::new(parse_time(&from)?, parse_time(&to)?)?;
            let status = engine.classify_status(&provider_id, service.as_deref(), requested, date)?;
            let label = match status {
                AvailabilityStatus::Available => "AVAILABLE",
                AvailabilityStatus::Blocked => "BLOCKED",
                AvailabilityStatus::OutsideWorkingHours => "OUTSIDE_WORKING_HOURS",
            };
            println!("{label}");
        }
    }

    Ok(())
}

/// Parse the schedule document and wire it into an in-memory engine.
fn load_engine(path: Option<&str>) -> Result<(String, ScheduleEngine)> {
    let raw = read_input(path)?;
    let file: ScheduleFile =
        serde_json::from_str(&raw).context("Failed to parse schedule document")?;
    let engine = AvailabilityEngine::new(
        file.rules,
        file.exceptions,
        file.bookings,
        MemorySlotStore::new(),
    );
    Ok((file.provider_id, engine))
}

/// Accept both `14:00` and `14:00:00`.
fn parse_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .with_context(|| format!("Invalid time of day: {}", raw))
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
