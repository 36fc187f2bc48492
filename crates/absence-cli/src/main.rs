//! `absence` CLI — turn a leave calendar export into absence-hour tables.
//!
//! ## Usage
//!
//! ```sh
//! # Full pipeline: event table, wide matrix, and long list into a directory
//! absence run -i cld_data.ics -o data/exam_absence
//!
//! # Event table only (stdin → stdout)
//! cat cld_data.ics | absence events
//!
//! # Completeness report, human-readable or JSON
//! absence validate -i cld_data.ics
//! absence validate -i cld_data.ics --json
//!
//! # Wide matrix, or the long list, with a 7.5 hour workday
//! absence matrix -i cld_data.ics --default-hours 7.5
//! absence matrix -i cld_data.ics --long -o absence_list.csv
//! ```
//!
//! Settings can also come from the environment or a `.env` file:
//! `ABSENCE_ICS_PATH`, `ABSENCE_DEFAULT_HOURS`, `ABSENCE_SKIP_UNNAMED`.
//! Log verbosity follows `RUST_LOG` (default `warn`); logs go to stderr.

use absence_engine::source::normalize_newlines;
use absence_engine::{
    aggregate, parse_calendar, validate, write_events, write_list, write_matrix, write_tables,
    AggregateOptions, CalendarEvent, ValidationReport, DEFAULT_HOURS,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "absence",
    version,
    about = "Absence-hour tables from a leave calendar export"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Calendar file (reads from stdin if omitted)
    #[arg(short, long, env = "ABSENCE_ICS_PATH")]
    input: Option<PathBuf>,
}

#[derive(Args)]
struct AggregateArgs {
    /// Hours charged for all-day events and unreadable time spans
    #[arg(long, env = "ABSENCE_DEFAULT_HOURS", default_value_t = DEFAULT_HOURS)]
    default_hours: f64,
    /// Leave out attendees whose name is empty
    #[arg(long, env = "ABSENCE_SKIP_UNNAMED")]
    skip_unnamed: bool,
}

impl AggregateArgs {
    fn options(&self) -> Result<AggregateOptions> {
        let options = AggregateOptions {
            default_hours: self.default_hours,
            skip_unnamed: self.skip_unnamed,
        };
        options.validate()?;
        Ok(options)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, validate, and write all three tables into a directory
    Run {
        #[command(flatten)]
        input: InputArgs,
        /// Output directory (created if missing)
        #[arg(short, long, default_value = "data/exam_absence")]
        output: PathBuf,
        #[command(flatten)]
        aggregate: AggregateArgs,
    },
    /// Write the event table as CSV
    Events {
        #[command(flatten)]
        input: InputArgs,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Report events with missing times, title, category, or participants
    Validate {
        #[command(flatten)]
        input: InputArgs,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the person × date absence matrix as CSV
    Matrix {
        #[command(flatten)]
        input: InputArgs,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the long person/date/hours list instead of the wide matrix
        #[arg(long)]
        long: bool,
        #[command(flatten)]
        aggregate: AggregateArgs,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            output,
            aggregate: args,
        } => {
            let options = args.options()?;
            let text = read_input(input.input.as_deref())?;
            let parsed = parse_calendar(&text);
            if parsed.events.is_empty() {
                println!("No events found in the calendar.");
            }

            let report = validate(&parsed.events);
            let result = aggregate(&parsed.events, &options)?;
            let paths = write_tables(&output, &parsed.events, &result.matrix, &result.list)
                .with_context(|| format!("Failed to write tables to {}", output.display()))?;

            println!("Events:      {}", parsed.events.len());
            println!("Incomplete:  {}", report.findings.len());
            println!(
                "Anomalies:   {}",
                parsed.anomalies.len() + result.anomalies.len()
            );
            println!("Persons:     {}", result.matrix.persons().len());
            println!("Dates:       {}", result.matrix.dates().len());
            println!("Wrote {}", paths.events.display());
            println!("Wrote {}", paths.matrix.display());
            println!("Wrote {}", paths.list.display());
        }
        Commands::Events { input, output } => {
            let text = read_input(input.input.as_deref())?;
            let parsed = parse_calendar(&text);
            let mut buf = Vec::new();
            write_events(&parsed.events, &mut buf).context("Failed to render event table")?;
            write_output(output.as_deref(), &buf)?;
        }
        Commands::Validate { input, json } => {
            let text = read_input(input.input.as_deref())?;
            let parsed = parse_calendar(&text);
            let report = validate(&parsed.events);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&parsed.events, &report);
            }
        }
        Commands::Matrix {
            input,
            output,
            long,
            aggregate: args,
        } => {
            let options = args.options()?;
            let text = read_input(input.input.as_deref())?;
            let parsed = parse_calendar(&text);
            let result = aggregate(&parsed.events, &options)?;
            let mut buf = Vec::new();
            if long {
                write_list(&result.list, &mut buf).context("Failed to render absence list")?;
            } else {
                write_matrix(&result.matrix, &mut buf)
                    .context("Failed to render absence matrix")?;
            }
            write_output(output.as_deref(), &buf)?;
        }
    }

    Ok(())
}

/// Print each incomplete event once per failed check, or a success line
/// followed by every event.
fn print_report(events: &[CalendarEvent], report: &ValidationReport<'_>) {
    if report.checked == 0 {
        println!("No events found in the calendar.");
        return;
    }
    if report.is_clean() {
        println!(
            "All {} events parsed successfully and with no missing data!",
            report.checked
        );
        for event in events {
            println!("{}", event);
        }
        return;
    }
    for finding in &report.findings {
        for issue in &finding.issues {
            println!("{}", issue);
            println!("{}", finding.event);
        }
    }
    println!(
        "{} of {} events are incomplete.",
        report.findings.len(),
        report.checked
    );
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => absence_engine::read_calendar(path)
            .with_context(|| format!("Failed to read calendar: {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(normalize_newlines(&buf).into_owned())
        }
    }
}

fn write_output(path: Option<&Path>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
        }
        None => {
            io::stdout()
                .write_all(content)
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
