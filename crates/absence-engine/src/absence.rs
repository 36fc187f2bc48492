//! Turn events into per-person absence rows.
//!
//! Each event with attendees is dated by its start, costed in hours, and
//! exploded into one row per attendee name. Every attendee receives the full
//! duration; hours are never split between them.

use crate::error::{AbsenceError, Result};
use crate::event::CalendarEvent;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

/// Hours charged when an event's duration cannot be computed: one workday.
pub const DEFAULT_HOURS: f64 = 8.0;

/// Timestamp layout used by the exporter for timed events.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Date layout used by the exporter for all-day events.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Separator between names in an event's participant list.
pub const NAME_SEPARATOR: &str = ", ";

/// Knobs for the aggregation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateOptions {
    /// Hours charged for all-day events and unparseable time spans.
    pub default_hours: f64,
    /// Drop rows whose attendee name is empty instead of keeping an
    /// empty-string person.
    pub skip_unnamed: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            default_hours: DEFAULT_HOURS,
            skip_unnamed: false,
        }
    }
}

impl AggregateOptions {
    /// Reject settings that would poison the matrix.
    pub fn validate(&self) -> Result<()> {
        if !self.default_hours.is_finite() || self.default_hours < 0.0 {
            return Err(AbsenceError::InvalidOption(format!(
                "default hours must be a non-negative number, got {}",
                self.default_hours
            )));
        }
        Ok(())
    }
}

/// One person absent for some hours on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbsenceRow {
    pub person_name: String,
    pub date: NaiveDate,
    pub absent_hours: f64,
}

/// An event that could not be aggregated cleanly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregateAnomaly {
    /// No usable date in the start value; the event is left out of the matrix.
    UndatedEvent {
        event_index: usize,
        start: Option<String>,
    },
    /// End precedes start. The negative value is kept as computed.
    NegativeDuration { event_index: usize, hours: f64 },
}

impl fmt::Display for AggregateAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateAnomaly::UndatedEvent { event_index, start } => write!(
                f,
                "event #{}: no usable start date ({})",
                event_index,
                start.as_deref().unwrap_or("missing")
            ),
            AggregateAnomaly::NegativeDuration { event_index, hours } => {
                write!(f, "event #{}: negative duration of {} hours", event_index, hours)
            }
        }
    }
}

/// Calendar day of an event, read from its start value.
///
/// Uses the part before `T` for timed values and the first eight characters
/// otherwise.
pub fn event_date(start: &str) -> Option<NaiveDate> {
    let digits = match start.split_once('T') {
        Some((date, _)) => date,
        None => start.get(..8).unwrap_or(start),
    };
    NaiveDate::parse_from_str(digits, DATE_FORMAT).ok()
}

/// Round to two decimals, exact halves to the even neighbour.
fn round_hundredths(hours: f64) -> f64 {
    (hours * 100.0).round_ties_even() / 100.0
}

/// Hours between two exporter timestamps, rounded to two decimals.
///
/// Falls back to `default_hours` unless both sides carry a time of day and
/// parse against [`TIMESTAMP_FORMAT`].
pub fn absent_hours(start: Option<&str>, end: Option<&str>, default_hours: f64) -> f64 {
    let (Some(start), Some(end)) = (start, end) else {
        return default_hours;
    };
    if !start.contains('T') || !end.contains('T') {
        return default_hours;
    }
    match (
        NaiveDateTime::parse_from_str(start, TIMESTAMP_FORMAT),
        NaiveDateTime::parse_from_str(end, TIMESTAMP_FORMAT),
    ) {
        (Ok(start), Ok(end)) => round_hundredths((end - start).num_seconds() as f64 / 3600.0),
        _ => default_hours,
    }
}

/// Attendee names of an event as they appear in the event table, split back
/// on [`NAME_SEPARATOR`].
///
/// An event without attendees yields no names. A name that itself contains
/// the separator counts as two people, as it does for any consumer of the
/// event table.
pub fn participant_names(event: &CalendarEvent) -> Vec<String> {
    let joined = event.attendee_names();
    if joined.is_empty() {
        return Vec::new();
    }
    joined.split(NAME_SEPARATOR).map(str::to_string).collect()
}

/// Rows produced by [`explode`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Exploded {
    pub rows: Vec<AbsenceRow>,
    pub anomalies: Vec<AggregateAnomaly>,
}

/// Explode events into one [`AbsenceRow`] per attendee.
///
/// `options` are used as given; [`crate::matrix::aggregate`] validates them
/// first.
pub fn explode(events: &[CalendarEvent], options: &AggregateOptions) -> Exploded {
    let mut exploded = Exploded::default();

    for (event_index, event) in events.iter().enumerate() {
        let names = participant_names(event);
        if names.is_empty() {
            tracing::debug!(event_index, "no attendees, not counted as absence");
            continue;
        }

        let Some(date) = event.start.as_deref().and_then(event_date) else {
            let anomaly = AggregateAnomaly::UndatedEvent {
                event_index,
                start: event.start.clone(),
            };
            tracing::warn!(%anomaly, "skipping event");
            exploded.anomalies.push(anomaly);
            continue;
        };

        let hours = absent_hours(
            event.start.as_deref(),
            event.end.as_deref(),
            options.default_hours,
        );
        if hours < 0.0 {
            let anomaly = AggregateAnomaly::NegativeDuration { event_index, hours };
            tracing::warn!(%anomaly, "keeping negative hours");
            exploded.anomalies.push(anomaly);
        }

        for person_name in names {
            if options.skip_unnamed && person_name.is_empty() {
                continue;
            }
            exploded.rows.push(AbsenceRow {
                person_name,
                date,
                absent_hours: hours,
            });
        }
    }

    tracing::debug!(rows = exploded.rows.len(), "exploded events");
    exploded
}
