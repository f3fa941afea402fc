//! Error types for sheetsql.

use thiserror::Error;

/// The main error type for sheetsql operations.
#[derive(Debug, Error)]
pub enum SheetSqlError {
    /// A configured range string is not `<label>#<table>!<cells>`.
    #[error("Invalid range '{input}': {message}")]
    InvalidRange { input: String, message: String },

    /// A header cell has no `label#column` shape.
    #[error("Malformed header in `{table}` at column {index}: '{cell}'")]
    MalformedHeader {
        table: String,
        index: usize,
        cell: String,
    },

    /// A data row carries more cells than the header declares.
    #[error("Row {row} of `{table}` has {found} cells, header has {expected}")]
    RowTooWide {
        table: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The range returned no rows, not even a header.
    #[error("Range for `{0}` is empty (no header row)")]
    EmptyRange(String),

    /// The data source refused or failed to return a range.
    #[error("Fetch error for '{range}': {message}")]
    Fetch { range: String, message: String },

    /// Credentials could not be loaded or exchanged for a token.
    #[error("Auth error: {0}")]
    Auth(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SheetSqlError {
    /// Create an invalid range error.
    pub fn invalid_range(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRange {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create a fetch error for the given range.
    pub fn fetch(range: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            range: range.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for sheetsql operations.
pub type SheetResult<T> = Result<T, SheetSqlError>;
