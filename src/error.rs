//! Error handling for the race statistics pipeline.
//!
//! Provides error types with context for data loading, table joins,
//! feature derivation and artifact writing failures.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RaceStatsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data file not found at path: {path}")]
    DataFileNotFound { path: PathBuf },

    #[error("Column '{column}' missing from {table}")]
    MissingColumn { table: String, column: String },

    #[error("Missing value in column '{column}' of {table} at row {row}")]
    MissingValue {
        table: String,
        column: String,
        row: usize,
    },

    #[error("Duplicate keys in {table} on ({keys}): {count} key combinations appear more than once")]
    DuplicateKeys {
        table: String,
        keys: String,
        count: usize,
    },

    #[error("Unparseable date '{value}' in {table}")]
    DateParse { table: String, value: String },

    #[error("No past race found in calendar before {today}")]
    NoPastRace { today: NaiveDate },

    #[error("No upcoming race found in calendar after {after}")]
    NoUpcomingRace { after: NaiveDate },

    #[error("Calendar has {count} races on {date}, expected exactly one")]
    AmbiguousCalendarDate { date: NaiveDate, count: usize },

    #[error("No stage points for '{value}' in column '{column}'")]
    NoStagePointsMapping { column: String, value: String },

    #[error("Invalid race pointer record in {path}: {reason}")]
    InvalidPointerRecord { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl RaceStatsError {
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RaceStatsError>;
