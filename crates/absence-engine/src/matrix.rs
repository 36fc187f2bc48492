//! Dense person × date absence matrix.
//!
//! The pivot sums hours per `(person, date)`, collects the sorted distinct
//! persons and dates, then walks their cross-product so that every cell exists,
//! with `0.0` where no row contributed. Cells are stored row-major in one
//! buffer.

use crate::absence::{explode, AbsenceRow, AggregateAnomaly, AggregateOptions};
use crate::error::Result;
use crate::event::CalendarEvent;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AbsenceMatrix {
    persons: Vec<String>,
    dates: Vec<NaiveDate>,
    cells: Vec<f64>,
}

impl AbsenceMatrix {
    /// Pivot rows into a dense matrix, summing duplicates.
    ///
    /// Pivoting the output of [`AbsenceMatrix::melt`] reproduces the matrix.
    pub fn pivot(rows: &[AbsenceRow]) -> Self {
        let mut sums: BTreeMap<(&str, NaiveDate), f64> = BTreeMap::new();
        let mut persons: BTreeSet<&str> = BTreeSet::new();
        let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();

        for row in rows {
            *sums
                .entry((row.person_name.as_str(), row.date))
                .or_insert(0.0) += row.absent_hours;
            persons.insert(row.person_name.as_str());
            dates.insert(row.date);
        }

        let mut cells = Vec::with_capacity(persons.len() * dates.len());
        for &person in &persons {
            for &date in &dates {
                cells.push(sums.get(&(person, date)).copied().unwrap_or(0.0));
            }
        }

        Self {
            persons: persons.into_iter().map(str::to_string).collect(),
            dates: dates.into_iter().collect(),
            cells,
        }
    }

    /// Row labels, ascending.
    pub fn persons(&self) -> &[String] {
        &self.persons
    }

    /// Column labels, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Hours for one cell, or `None` when the person or date is not in the
    /// matrix.
    pub fn get(&self, person: &str, date: NaiveDate) -> Option<f64> {
        let row = self
            .persons
            .binary_search_by(|p| p.as_str().cmp(person))
            .ok()?;
        let col = self.dates.binary_search(&date).ok()?;
        Some(self.cells[row * self.dates.len() + col])
    }

    /// Iterate `(person, cells)` in row order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        let width = self.dates.len();
        self.persons
            .iter()
            .enumerate()
            .map(move |(row, person)| {
                (person.as_str(), &self.cells[row * width..(row + 1) * width])
            })
    }

    /// Long form: one row per cell, zero cells included.
    ///
    /// Ordered by date, then by person within each date.
    pub fn melt(&self) -> Vec<AbsenceRow> {
        let width = self.dates.len();
        let mut list = Vec::with_capacity(self.cells.len());
        for (col, &date) in self.dates.iter().enumerate() {
            for (row, person) in self.persons.iter().enumerate() {
                list.push(AbsenceRow {
                    person_name: person.clone(),
                    date,
                    absent_hours: self.cells[row * width + col],
                });
            }
        }
        list
    }
}

/// Everything derived from a set of events in one aggregation run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aggregation {
    /// Exploded per-attendee rows.
    pub rows: Vec<AbsenceRow>,
    pub matrix: AbsenceMatrix,
    /// Melted matrix.
    pub list: Vec<AbsenceRow>,
    pub anomalies: Vec<AggregateAnomaly>,
}

/// Validate `options`, then explode, pivot, and melt in one pass.
///
/// # Errors
/// Returns `AbsenceError::InvalidOption` if the default hours are negative or
/// not finite.
pub fn aggregate(events: &[CalendarEvent], options: &AggregateOptions) -> Result<Aggregation> {
    options.validate()?;
    let exploded = explode(events, options);
    let matrix = AbsenceMatrix::pivot(&exploded.rows);
    let list = matrix.melt();
    tracing::info!(
        persons = matrix.persons().len(),
        dates = matrix.dates().len(),
        "built absence matrix"
    );
    Ok(Aggregation {
        rows: exploded.rows,
        matrix,
        list,
        anomalies: exploded.anomalies,
    })
}
