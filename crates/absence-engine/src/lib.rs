//! # absence-engine
//!
//! Parse a leave calendar export and derive per-person, per-day absence hours.
//!
//! The exporter produces iCalendar text that folds lines at arbitrary offsets
//! and lists participants with loosely ordered parameters. This crate unfolds
//! and extracts the events, reports incomplete ones, and aggregates attendees
//! into a dense person × date matrix of absence hours plus its long form.
//!
//! ## Quick start
//!
//! ```rust
//! use absence_engine::{aggregate, parse_calendar, AggregateOptions};
//! use chrono::NaiveDate;
//!
//! let ics = "BEGIN:VEVENT\n\
//!            DTSTART:20240110T090000\n\
//!            DTEND:20240110T170000\n\
//!            SUMMARY:Leave\n\
//!            ATTENDEE;CUTYPE=INDIVIDUAL;CN=Alice;PARTSTAT=ACCEPTED:mailto:alice@example.com\n\
//!            END:VEVENT\n";
//!
//! let parsed = parse_calendar(ics);
//! let result = aggregate(&parsed.events, &AggregateOptions::default()).unwrap();
//! let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
//! assert_eq!(result.matrix.get("Alice", day), Some(8.0));
//! ```
//!
//! ## Modules
//!
//! - [`source`] — read a calendar file, normalize line endings
//! - [`unfold`] — remove exporter line folds
//! - [`chunker`] — split text into `VEVENT` bodies
//! - [`extractor`] — body → [`CalendarEvent`], with per-line anomalies
//! - [`validate`] — completeness report
//! - [`absence`] — dates, hours, and per-attendee rows
//! - [`matrix`] — dense pivot and melt
//! - [`export`] — CSV output
//! - [`error`] — Error types

pub mod absence;
pub mod chunker;
pub mod error;
pub mod event;
pub mod export;
pub mod extractor;
pub mod matrix;
pub mod source;
pub mod unfold;
pub mod validate;

pub use absence::{
    absent_hours, event_date, explode, AbsenceRow, AggregateAnomaly, AggregateOptions,
    DEFAULT_HOURS,
};
pub use chunker::chunk_events;
pub use error::AbsenceError;
pub use event::{CalendarEvent, Participant};
pub use export::{write_events, write_list, write_matrix, write_tables, TablePaths};
pub use extractor::{extract_event, parse_calendar, ParseAnomaly, ParsedCalendar};
pub use matrix::{aggregate, AbsenceMatrix, Aggregation};
pub use source::read_calendar;
pub use unfold::unfold;
pub use validate::{validate, Issue, ValidationReport};
