//! Structured calendar event records.

use serde::Serialize;
use std::fmt;

/// A named participant with their mail address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub name: String,
    pub email: String,
}

impl Participant {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// One `VEVENT` as extracted from the export.
///
/// `start` and `end` keep the exporter's raw `YYYYMMDD[THHMMSS]` text; a value
/// without a `T` marks an all-day event. Every field is optional because the
/// export does not guarantee any of them.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CalendarEvent {
    pub start: Option<String>,
    pub end: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub attendees: Vec<Participant>,
    pub organizer: Option<Participant>,
}

impl CalendarEvent {
    /// True when the event lists at least one attendee or an organizer.
    pub fn has_participants(&self) -> bool {
        !self.attendees.is_empty() || self.organizer.is_some()
    }

    /// Attendee names joined with `", "`, the form used by the event table.
    pub fn attendee_names(&self) -> String {
        self.attendees
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn organizer_name(&self) -> Option<&str> {
        self.organizer.as_ref().map(|o| o.name.as_str())
    }
}

fn or_none(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("(none)")
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Event: {}", or_none(&self.title))?;
        writeln!(f, "Start: {}", or_none(&self.start))?;
        writeln!(f, "End: {}", or_none(&self.end))?;
        writeln!(f, "Categories: {}", or_none(&self.category))?;
        writeln!(f, "Description: {}", or_none(&self.description))?;
        writeln!(f, "Attendees:")?;
        for attendee in &self.attendees {
            writeln!(f, "  - {} <{}>", attendee.name, attendee.email)?;
        }
        if let Some(organizer) = &self.organizer {
            writeln!(f, "Organizer: {} <{}>", organizer.name, organizer.email)?;
        }
        write!(f, "{}", "-".repeat(40))
    }
}
