//! Completeness checks over extracted events.
//!
//! Validation is purely diagnostic: it never mutates or drops an event, and
//! aggregation runs regardless of what it finds.

use crate::event::CalendarEvent;
use serde::Serialize;
use std::fmt;

/// A single failed completeness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Issue {
    /// Start or end is missing.
    IncompleteTimes,
    MissingTitle,
    MissingCategory,
    /// Neither attendees nor an organizer.
    NoParticipants,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Issue::IncompleteTimes => "Event with incomplete times!",
            Issue::MissingTitle => "Event with no title!",
            Issue::MissingCategory => "Event with no category!",
            Issue::NoParticipants => "Event with no participants!",
        })
    }
}

/// An event that failed at least one check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding<'a> {
    pub index: usize,
    pub issues: Vec<Issue>,
    pub event: &'a CalendarEvent,
}

/// Every event that failed a check, in document order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ValidationReport<'a> {
    pub checked: usize,
    pub findings: Vec<Finding<'a>>,
}

impl ValidationReport<'_> {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Number of findings carrying `issue`.
    pub fn count(&self, issue: Issue) -> usize {
        self.findings
            .iter()
            .filter(|f| f.issues.contains(&issue))
            .count()
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Run the four completeness checks against one event.
pub fn check_event(event: &CalendarEvent) -> Vec<Issue> {
    let mut issues = Vec::new();
    if is_blank(&event.start) || is_blank(&event.end) {
        issues.push(Issue::IncompleteTimes);
    }
    if is_blank(&event.title) {
        issues.push(Issue::MissingTitle);
    }
    if is_blank(&event.category) {
        issues.push(Issue::MissingCategory);
    }
    if !event.has_participants() {
        issues.push(Issue::NoParticipants);
    }
    issues
}

/// Check every event and collect those failing at least one check.
pub fn validate(events: &[CalendarEvent]) -> ValidationReport<'_> {
    let findings: Vec<Finding<'_>> = events
        .iter()
        .enumerate()
        .filter_map(|(index, event)| {
            let issues = check_event(event);
            (!issues.is_empty()).then_some(Finding {
                index,
                issues,
                event,
            })
        })
        .collect();

    for finding in &findings {
        tracing::warn!(
            index = finding.index,
            title = finding.event.title.as_deref().unwrap_or_default(),
            issues = ?finding.issues,
            "incomplete event"
        );
    }
    if findings.is_empty() {
        tracing::info!(events = events.len(), "all events complete");
    }

    ValidationReport {
        checked: events.len(),
        findings,
    }
}
