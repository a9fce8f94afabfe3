use std::fmt;

use thiserror::Error;

/// Which of the three base tables an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// Landings: tonnage captured per year/month/region/port/species/agent type.
    Captures,
    /// Industrial processing: raw material in, product out.
    Production,
    /// Processing facilities.
    Plants,
}

impl TableKind {
    /// Stable lowercase name used in messages.
    pub fn as_str(self) -> &'static str {
        match self {
            TableKind::Captures => "captures",
            TableKind::Production => "production",
            TableKind::Plants => "plants",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal construction error: a required column is absent from one of the input tables.
///
/// No engine is built when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("required column '{column}' missing from {table} table")]
pub struct SchemaError {
    /// Table that lacks the column.
    pub table: TableKind,
    /// Physical column name that was looked up.
    pub column: String,
}

/// Convenience result type for loader operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by the loader in [`crate::ingestion`].
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON / NDJSON input.
    #[error("json error: {message}")]
    Json { message: String },

    /// The file extension does not map to a supported format.
    #[error("unsupported table format: {message}")]
    UnsupportedFormat { message: String },

    /// A value could not be parsed into the column's [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// The loaded tables do not carry the required columns.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Per-call business failure.
///
/// Never raised: it travels inside a failure [`crate::analytics::Envelope`], and its `Display`
/// text is the envelope's `error` message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// An optional column the analysis depends on is absent.
    #[error("column '{column}' not available in {table} table")]
    MissingColumn { table: TableKind, column: String },

    /// The filters matched no records.
    #[error("no data available for the specified filters")]
    NoData,
}
