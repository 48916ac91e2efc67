//! Error types for the langbase library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for langbase operations.
///
/// Every variant is fatal for the run. Malformed rows are not errors: the
/// reader returns them as [`RejectedRow`](crate::input::RejectedRow) values.
#[derive(Debug, Error)]
pub enum LangbaseError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library that is not attributable to a single row.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no header row.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A column the pipeline relies on is absent from a table.
    #[error("Table '{table}' has no column '{column}'")]
    MissingColumn { table: String, column: String },

    /// A join would produce two columns with the same name.
    #[error("Join '{stage}': column '{column}' exists on both sides")]
    ColumnConflict { stage: String, column: String },

    /// The right side of a join holds the same key twice.
    #[error("Join '{stage}': right table is not unique on key '{key}'")]
    DuplicateJoinKey { stage: String, key: String },

    /// A left join changed the number of left rows.
    #[error("Join '{stage}' changed row count: {left_rows} left rows, {result_rows} result rows")]
    JoinCardinality {
        stage: String,
        left_rows: usize,
        result_rows: usize,
    },

    /// A dimension lookup found no surrogate key.
    #[error("No {dimension} ID for '{name}'")]
    UnresolvedDimension { dimension: String, name: String },

    /// A fatal error while loading one named source file.
    #[error("Failed to load {source_name} source '{path}': {source}")]
    Source {
        source_name: String,
        path: PathBuf,
        #[source]
        source: Box<LangbaseError>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LangbaseError {
    /// Wrap an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LangbaseError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for langbase operations.
pub type Result<T> = std::result::Result<T, LangbaseError>;
