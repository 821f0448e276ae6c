//! Error types for loading, aggregating and exporting dashboard data

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for library operations
pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// A required column is absent from the input header
    #[error("Missing required column: {column}")]
    MissingColumn { column: &'static str },

    /// A required cell is empty
    #[error("Line {line}: missing value for column {column}")]
    MissingValue { line: u64, column: &'static str },

    /// A timestamp cell could not be parsed
    #[error("Line {line}: invalid timestamp in {column}: {value:?}")]
    InvalidTimestamp {
        line: u64,
        column: &'static str,
        value: String,
    },

    /// A numeric cell could not be parsed
    #[error("Line {line}: invalid number in {column}: {value:?}")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// No explicit bounds were given and the dataset has no rows to derive them from
    #[error("Cannot derive a date range from an empty dataset")]
    EmptyDataset,

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Cannot use both --include and --exclude at the same time")]
    ConflictingTableFilters,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl DashboardError {
    /// True for errors caused by a malformed input table
    pub fn is_input_schema(&self) -> bool {
        matches!(
            self,
            DashboardError::MissingColumn { .. }
                | DashboardError::MissingValue { .. }
                | DashboardError::InvalidTimestamp { .. }
                | DashboardError::InvalidNumber { .. }
        )
    }
}
