//! Read-only outputs of a run: audit exports and derived metrics.

pub mod audit;
pub mod error;
pub mod metrics;

// === Audit exports ===
pub use audit::{CSV_HEADER, audit_to_csv, audit_to_json};

// === Errors ===
pub use error::{ReportError, Result};

// === Metrics ===
pub use metrics::{BUCKET_WIDTH_MS, HistogramBucket, RunMetrics, delay_histogram};
