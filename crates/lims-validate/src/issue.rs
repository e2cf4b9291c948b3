//! Quality gate findings.
//!
//! Each variant carries only the data its message needs. Findings are
//! turned into [`ValidationError`]s once the record position is known.

use lims_model::{ErrorCode, ValidationError};

/// One rule violation found on a single record.
#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    // Presence checks
    /// Required field is empty, or the value is NaN.
    MissingField { field: &'static str },

    // Vocabulary checks
    /// Field value is outside its controlled vocabulary.
    InvalidEnum { field: &'static str, value: String },

    // Range checks
    /// Numeric value outside `[0, 1_000_000]`.
    ValueOutOfRange { value: f64 },
    /// Collection time predates the retention window.
    TimestampTooOld { collected_at: String, months: u32 },

    // Plausibility checks
    /// REPORTED sample without a finite value.
    ReportedWithoutValue,

    // Format checks
    /// Identifier does not match the identifier pattern.
    InvalidId { value: String },
    /// Accession does not match the accession pattern.
    InvalidAccession { value: String },
    /// Collection time is not strict ISO-8601 UTC or not a real instant.
    InvalidTimestamp { value: String },

    // Chronology checks
    /// Collection time lies after the validation instant.
    FutureTimestamp { collected_at: String },
    /// Collection time is earlier than an earlier record's.
    OutOfOrder {
        collected_at: String,
        running_max: String,
    },

    // Consistency checks
    /// The id and accession pair was already seen in this run.
    Duplicate { key: String },
}

impl Issue {
    pub fn code(&self) -> ErrorCode {
        match self {
            Issue::MissingField { .. } => ErrorCode::MissingField,
            Issue::InvalidEnum { .. } => ErrorCode::InvalidEnum,
            Issue::ValueOutOfRange { .. } | Issue::TimestampTooOld { .. } => ErrorCode::OutOfRange,
            Issue::ReportedWithoutValue => ErrorCode::Plausibility,
            Issue::InvalidId { .. }
            | Issue::InvalidAccession { .. }
            | Issue::InvalidTimestamp { .. } => ErrorCode::Format,
            Issue::FutureTimestamp { .. } | Issue::OutOfOrder { .. } => ErrorCode::Chronology,
            Issue::Duplicate { .. } => ErrorCode::Duplicate,
        }
    }

    /// Name of the sample field the finding is about.
    pub fn field(&self) -> &'static str {
        match self {
            Issue::MissingField { field } | Issue::InvalidEnum { field, .. } => *field,
            Issue::ValueOutOfRange { .. } | Issue::ReportedWithoutValue => "value",
            Issue::InvalidId { .. } | Issue::Duplicate { .. } => "id",
            Issue::InvalidAccession { .. } => "accession",
            Issue::TimestampTooOld { .. }
            | Issue::InvalidTimestamp { .. }
            | Issue::FutureTimestamp { .. }
            | Issue::OutOfOrder { .. } => "collectedAt",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Issue::MissingField { field } => format!("Required field {field} is missing"),
            Issue::InvalidEnum { field, value } => {
                format!("{field} '{value}' is not an allowed value")
            }
            Issue::ValueOutOfRange { value } => {
                format!("value {value} is outside the range 0 to 1000000")
            }
            Issue::TimestampTooOld {
                collected_at,
                months,
            } => format!("collectedAt {collected_at} is older than {months} months"),
            Issue::ReportedWithoutValue => {
                "status REPORTED requires a finite numeric value".to_string()
            }
            Issue::InvalidId { value } => format!("id '{value}' has an invalid format"),
            Issue::InvalidAccession { value } => {
                format!("accession '{value}' has an invalid format")
            }
            Issue::InvalidTimestamp { value } => {
                format!("collectedAt '{value}' is not an ISO-8601 UTC timestamp")
            }
            Issue::FutureTimestamp { collected_at } => {
                format!("collectedAt {collected_at} is in the future")
            }
            Issue::OutOfOrder {
                collected_at,
                running_max,
            } => format!("collectedAt {collected_at} is earlier than preceding {running_max}"),
            Issue::Duplicate { key } => format!("duplicate id+accession {key}"),
        }
    }

    /// Attach the record position to this finding.
    pub fn into_error(self, record_index: usize, record_id: &str) -> ValidationError {
        ValidationError {
            record_index,
            record_id: record_id.to_string(),
            code: self.code(),
            message: self.message(),
            field: self.field().to_string(),
        }
    }
}
