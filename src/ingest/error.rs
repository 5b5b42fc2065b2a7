use thiserror::Error;

use crate::ingest::parser::{Column, EXPECTED_HEADER};
use crate::model::time_sheet::BatchId;
use crate::store::StoreError;

/// Why an upload was rejected. Every variant aborts the whole upload.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Expected a CSV (.csv) file")]
    InvalidExtension,

    #[error("The provided filename is incorrectly formatted. Expected time-report-{{id}}.csv")]
    InvalidFilename,

    #[error("{0}")]
    Upload(String),

    #[error("A record with ID: {0} already exists")]
    DuplicateBatch(BatchId),

    #[error("Unable to read csv: {0}")]
    UnreadableCsv(#[source] csv::Error),

    #[error("Incorrect column headers found. Expected: {}", EXPECTED_HEADER)]
    Header,

    #[error(transparent)]
    Row(#[from] RowError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A single row that could not be turned into a time sheet.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: cannot parse \"{raw}\" in column \"{column}\" as a day/month/year date: {reason}")]
    DateFormat {
        line: u64,
        column: Column,
        raw: String,
        reason: String,
    },

    #[error("line {line}: cannot parse \"{raw}\" in column \"{column}\" as {expected}: {reason}")]
    NumericFormat {
        line: u64,
        column: Column,
        raw: String,
        expected: &'static str,
        reason: String,
    },
}

impl RowError {
    pub fn line(&self) -> u64 {
        match self {
            RowError::ColumnCount { line, .. }
            | RowError::DateFormat { line, .. }
            | RowError::NumericFormat { line, .. } => *line,
        }
    }
}
