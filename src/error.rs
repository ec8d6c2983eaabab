use thiserror::Error;

use crate::classifier::ColumnRole;

/// Resource-level failure while reading a statement into a [`crate::table::Table`].
///
/// Fatal: no rows are processed once one of these is returned.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No columns found (missing header row)")]
    NoColumns,

    #[error("Malformed row at line {line}: expected at most {expected} fields, found {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },
}

#[derive(Error, Debug)]
pub enum TallyError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Column '{column}' mapped to {role} does not exist in the statement")]
    UnknownColumn { role: ColumnRole, column: String },

    #[error("Unknown column role: {0}")]
    UnknownRole(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, TallyError>;
