//! Error types for absence-engine operations.
//!
//! Only failures that abort a run live here. Data-quality problems found while
//! parsing or aggregating are reported as anomalies alongside the results.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AbsenceError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

pub type Result<T> = std::result::Result<T, AbsenceError>;
