//! Error types for report generation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to write a CSV record.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to flush the CSV writer into its buffer.
    #[error("failed to finish CSV output: {0}")]
    CsvFlush(#[source] std::io::Error),

    /// CSV output was not valid UTF-8.
    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Failed to serialize JSON.
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
