//! Parse raw `VEVENT` bodies into [`CalendarEvent`] records.
//!
//! Lines are matched on their property name (the text before the first `;` or
//! `:`). Simple properties take everything after the first colon as their
//! value. ATTENDEE and ORGANIZER carry a parameter list; the display name comes
//! from the last `CN=` parameter and the address from the last `mailto:`
//! marker, wherever they sit in the list.
//!
//! Lines that cannot be read are skipped and reported as [`LineAnomaly`]s; the
//! event itself is always kept.

use crate::chunker::chunk_events;
use crate::event::{CalendarEvent, Participant};
use crate::unfold::unfold;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static RE_CN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|;)(?i:CN)=(?:"(?P<quoted>[^"]*)"|(?P<bare>[^;]*))"#)
        .expect("valid CN regex")
});

static RE_MAILTO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i:mailto):(?P<email>[^;]*)").expect("valid mailto regex"));

/// Properties the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Property {
    DtStart,
    DtEnd,
    Summary,
    Categories,
    Description,
    Attendee,
    Organizer,
}

impl Property {
    fn from_name(name: &str) -> Option<Self> {
        let property = match name.to_ascii_uppercase().as_str() {
            "DTSTART" => Property::DtStart,
            "DTEND" => Property::DtEnd,
            "SUMMARY" => Property::Summary,
            "CATEGORIES" => Property::Categories,
            "DESCRIPTION" => Property::Description,
            "ATTENDEE" => Property::Attendee,
            "ORGANIZER" => Property::Organizer,
            _ => return None,
        };
        Some(property)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Property::DtStart => "DTSTART",
            Property::DtEnd => "DTEND",
            Property::Summary => "SUMMARY",
            Property::Categories => "CATEGORIES",
            Property::Description => "DESCRIPTION",
            Property::Attendee => "ATTENDEE",
            Property::Organizer => "ORGANIZER",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a recognized line was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// No `:` separating the property from its value.
    MissingValue,
    /// A participant line without the named marker (`CN=` or `mailto:`).
    MissingParameter(&'static str),
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyKind::MissingValue => f.write_str("missing value"),
            AnomalyKind::MissingParameter(marker) => write!(f, "missing {} parameter", marker),
        }
    }
}

/// A property line that could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineAnomaly {
    pub property: Property,
    pub kind: AnomalyKind,
    pub line: String,
}

/// A [`LineAnomaly`] located in the document by event position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseAnomaly {
    /// Zero-based index into [`ParsedCalendar::events`].
    pub event_index: usize,
    #[serde(flatten)]
    pub detail: LineAnomaly,
}

impl fmt::Display for ParseAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "event #{}: {} {} in `{}`",
            self.event_index, self.detail.property, self.detail.kind, self.detail.line
        )
    }
}

/// Result of extracting a single event body.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub event: CalendarEvent,
    pub anomalies: Vec<LineAnomaly>,
}

/// Result of parsing a whole calendar document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedCalendar {
    pub events: Vec<CalendarEvent>,
    pub anomalies: Vec<ParseAnomaly>,
}

/// Accumulates fields for one event; consumed by [`EventBuilder::finish`].
#[derive(Default)]
struct EventBuilder {
    event: CalendarEvent,
}

impl EventBuilder {
    fn set(&mut self, property: Property, value: &str) {
        let slot = match property {
            Property::DtStart => &mut self.event.start,
            Property::DtEnd => &mut self.event.end,
            Property::Summary => &mut self.event.title,
            Property::Categories => &mut self.event.category,
            Property::Description => &mut self.event.description,
            Property::Attendee | Property::Organizer => return,
        };
        *slot = Some(value.to_string());
    }

    fn add_participant(&mut self, property: Property, participant: Participant) {
        match property {
            Property::Attendee => self.event.attendees.push(participant),
            Property::Organizer => self.event.organizer = Some(participant),
            _ => {}
        }
    }

    fn finish(self) -> CalendarEvent {
        self.event
    }
}

/// Split a content line into its property name and the remainder, which starts
/// at the first `;` or `:` (or is empty).
fn split_name(line: &str) -> (&str, &str) {
    match line.find([';', ':']) {
        Some(idx) => line.split_at(idx),
        None => (line, ""),
    }
}

/// Drop a `:mailto:` address glued onto the end of an unquoted name.
///
/// Other colons belong to the name.
fn strip_address(bare: &str) -> &str {
    match RE_MAILTO.find(bare) {
        Some(m) if bare[..m.start()].ends_with(':') => &bare[..m.start() - 1],
        _ => bare,
    }
}

/// Read `CN=` and `mailto:` out of a participant line's parameter list.
pub fn parse_participant(params: &str) -> std::result::Result<Participant, AnomalyKind> {
    let name = RE_CN
        .captures_iter(params)
        .last()
        .and_then(|caps| {
            caps.name("quoted")
                .map(|m| m.as_str())
                .or_else(|| caps.name("bare").map(|m| strip_address(m.as_str())))
        })
        .map(|name| name.trim().to_string())
        .ok_or(AnomalyKind::MissingParameter("CN="))?;
    let email = RE_MAILTO
        .captures_iter(params)
        .last()
        .and_then(|caps| caps.name("email"))
        .map(|m| m.as_str().trim().to_string())
        .ok_or(AnomalyKind::MissingParameter("mailto:"))?;
    Ok(Participant { name, email })
}

/// Extract one event from the text between its BEGIN and END markers.
///
/// The body is expected to be unfolded already.
pub fn extract_event(body: &str) -> Extraction {
    let mut builder = EventBuilder::default();
    let mut anomalies = Vec::new();

    for line in body.lines().map(str::trim) {
        let (name, rest) = split_name(line);
        let Some(property) = Property::from_name(name) else {
            continue;
        };

        let outcome = match property {
            Property::Attendee | Property::Organizer => {
                parse_participant(rest).map(|p| builder.add_participant(property, p))
            }
            _ => match line.split_once(':') {
                Some((_, value)) => {
                    builder.set(property, value);
                    Ok(())
                }
                None => Err(AnomalyKind::MissingValue),
            },
        };

        if let Err(kind) = outcome {
            anomalies.push(LineAnomaly {
                property,
                kind,
                line: line.to_string(),
            });
        }
    }

    Extraction {
        event: builder.finish(),
        anomalies,
    }
}

/// Unfold, chunk, and extract every event in a calendar document.
///
/// Skipped lines are logged at `warn` and returned in
/// [`ParsedCalendar::anomalies`].
pub fn parse_calendar(text: &str) -> ParsedCalendar {
    let unfolded = unfold(text);
    let bodies = chunk_events(&unfolded);
    tracing::debug!(blocks = bodies.len(), "chunked calendar");

    let mut parsed = ParsedCalendar::default();
    for (event_index, body) in bodies.into_iter().enumerate() {
        let Extraction { event, anomalies } = extract_event(body);
        for detail in anomalies {
            let anomaly = ParseAnomaly {
                event_index,
                detail,
            };
            tracing::warn!(%anomaly, "skipped unreadable property line");
            parsed.anomalies.push(anomaly);
        }
        parsed.events.push(event);
    }

    tracing::info!(
        events = parsed.events.len(),
        anomalies = parsed.anomalies.len(),
        "parsed calendar"
    );
    parsed
}
