//! CSV rendering of the event table, the wide matrix, and the long list.
//!
//! Writers are generic over [`std::io::Write`]. [`write_tables`] renders all
//! three tables in memory first so that a rendering failure leaves no files
//! behind.

use crate::absence::AbsenceRow;
use crate::error::{AbsenceError, Result};
use crate::event::CalendarEvent;
use crate::matrix::AbsenceMatrix;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const EVENTS_FILE: &str = "calendar_events.csv";
pub const MATRIX_FILE: &str = "absence_matrix.csv";
pub const LIST_FILE: &str = "absence_list.csv";

/// First header cell of the wide matrix.
const PERSON_COLUMN: &str = "person_name";

#[derive(Serialize)]
struct EventRecord<'a> {
    start: Option<&'a str>,
    end: Option<&'a str>,
    title: Option<&'a str>,
    categories: Option<&'a str>,
    description: Option<&'a str>,
    attendees: String,
    organizer: &'a str,
}

impl<'a> From<&'a CalendarEvent> for EventRecord<'a> {
    fn from(event: &'a CalendarEvent) -> Self {
        Self {
            start: event.start.as_deref(),
            end: event.end.as_deref(),
            title: event.title.as_deref(),
            categories: event.category.as_deref(),
            description: event.description.as_deref(),
            attendees: event.attendee_names(),
            organizer: event.organizer_name().unwrap_or_default(),
        }
    }
}

/// Hours as a float literal (`8.0`, `2.5`).
pub fn format_hours(hours: f64) -> String {
    format!("{:?}", hours)
}

/// One row per event: `start,end,title,categories,description,attendees,organizer`.
pub fn write_events<W: Write>(events: &[CalendarEvent], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if events.is_empty() {
        wtr.write_record([
            "start",
            "end",
            "title",
            "categories",
            "description",
            "attendees",
            "organizer",
        ])?;
    }
    for event in events {
        wtr.serialize(EventRecord::from(event))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Header `person_name,<dates…>`, then one row of hours per person.
pub fn write_matrix<W: Write>(matrix: &AbsenceMatrix, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(matrix.dates().len() + 1);
    header.push(PERSON_COLUMN.to_string());
    header.extend(matrix.dates().iter().map(|d| d.to_string()));
    wtr.write_record(&header)?;

    for (person, cells) in matrix.rows() {
        let mut record = Vec::with_capacity(cells.len() + 1);
        record.push(person.to_string());
        record.extend(cells.iter().map(|&h| format_hours(h)));
        wtr.write_record(&record)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// `person_name,date,absent_hours`, one row per entry.
pub fn write_list<W: Write>(list: &[AbsenceRow], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["person_name", "date", "absent_hours"])?;
    for row in list {
        wtr.write_record([
            row.person_name.clone(),
            row.date.to_string(),
            format_hours(row.absent_hours),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Where [`write_tables`] put each table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePaths {
    pub events: PathBuf,
    pub matrix: PathBuf,
    pub list: PathBuf,
}

/// Write the three output tables into `dir`, creating it if needed.
pub fn write_tables(
    dir: impl AsRef<Path>,
    events: &[CalendarEvent],
    matrix: &AbsenceMatrix,
    list: &[AbsenceRow],
) -> Result<TablePaths> {
    let dir = dir.as_ref();

    let mut events_buf = Vec::new();
    write_events(events, &mut events_buf)?;
    let mut matrix_buf = Vec::new();
    write_matrix(matrix, &mut matrix_buf)?;
    let mut list_buf = Vec::new();
    write_list(list, &mut list_buf)?;

    std::fs::create_dir_all(dir).map_err(|source| AbsenceError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let paths = TablePaths {
        events: dir.join(EVENTS_FILE),
        matrix: dir.join(MATRIX_FILE),
        list: dir.join(LIST_FILE),
    };
    for (path, contents) in [
        (&paths.events, events_buf),
        (&paths.matrix, matrix_buf),
        (&paths.list, list_buf),
    ] {
        std::fs::write(path, contents).map_err(|source| AbsenceError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "wrote table");
    }

    Ok(paths)
}
