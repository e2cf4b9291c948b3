//! Error taxonomy and quality-gate findings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::sample::NormalizedSample;

/// Rename-safe error codes shared by the gate, the parsers and the audit trail.
///
/// `E009` and `E010` are run-fatal parse failures. Every other code is a
/// per-record finding that never aborts a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Required field missing.
    #[serde(rename = "E001")]
    MissingField,
    /// Invalid enumeration value.
    #[serde(rename = "E002")]
    InvalidEnum,
    /// Value or timestamp out of acceptable range.
    #[serde(rename = "E003")]
    OutOfRange,
    /// Future or out-of-order timestamp.
    #[serde(rename = "E004")]
    Chronology,
    /// Plausibility failure; also the collapsed quarantine code.
    #[serde(rename = "E005")]
    Plausibility,
    /// Duplicate id and accession pair.
    #[serde(rename = "E006")]
    Duplicate,
    /// Format or pattern check failed.
    #[serde(rename = "E007")]
    Format,
    /// Structural parse error in tree (XML) input.
    #[serde(rename = "E009")]
    TreeParse,
    /// Structural parse error in list (JSON) input.
    #[serde(rename = "E010")]
    ListParse,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 9] = [
        ErrorCode::MissingField,
        ErrorCode::InvalidEnum,
        ErrorCode::OutOfRange,
        ErrorCode::Chronology,
        ErrorCode::Plausibility,
        ErrorCode::Duplicate,
        ErrorCode::Format,
        ErrorCode::TreeParse,
        ErrorCode::ListParse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MissingField => "E001",
            ErrorCode::InvalidEnum => "E002",
            ErrorCode::OutOfRange => "E003",
            ErrorCode::Chronology => "E004",
            ErrorCode::Plausibility => "E005",
            ErrorCode::Duplicate => "E006",
            ErrorCode::Format => "E007",
            ErrorCode::TreeParse => "E009",
            ErrorCode::ListParse => "E010",
        }
    }

    /// Short human-readable meaning of the code.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::MissingField => "Required field missing",
            ErrorCode::InvalidEnum => "Invalid enumeration value",
            ErrorCode::OutOfRange => "Value or timestamp out of acceptable range",
            ErrorCode::Chronology => "Chronology violation",
            ErrorCode::Plausibility => "Plausibility failure",
            ErrorCode::Duplicate => "Duplicate id+accession",
            ErrorCode::Format => "Format/pattern check failed",
            ErrorCode::TreeParse => "Structural parse error (tree format)",
            ErrorCode::ListParse => "Structural parse error (list format)",
        }
    }

    /// Returns true for codes that abort a run before validation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorCode::TreeParse | ErrorCode::ListParse)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        ErrorCode::ALL
            .into_iter()
            .find(|code| code.as_str() == normalized)
            .ok_or_else(|| format!("Unknown error code: {s}"))
    }
}

/// One finding raised by the quality gate against one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Zero-based position of the record in the input batch.
    pub record_index: usize,
    pub record_id: String,
    pub code: ErrorCode,
    pub message: String,
    pub field: String,
}

/// Quarantine bucket entry; one per record with at least one finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarantineEntry {
    pub record: NormalizedSample,
    pub reason: String,
    pub code: ErrorCode,
}

impl QuarantineEntry {
    /// Reason attached to every quarantined record.
    pub const REASON: &'static str = "failed quality gate";

    /// Quarantine `record` with the collapsed reason and code.
    pub fn collapsed(record: NormalizedSample) -> Self {
        Self {
            record,
            reason: Self::REASON.to_string(),
            code: ErrorCode::Plausibility,
        }
    }
}
