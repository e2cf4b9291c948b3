//! Error types for batch decoding.

use lims_model::ErrorCode;
use thiserror::Error;

/// Coarse classification of a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestErrorKind {
    /// The top-level input is not a list of records.
    Structure,
    /// The input is malformed at the syntax level.
    Syntax,
    /// The input is well formed but holds no sample records.
    Content,
}

/// Errors that abort a run before validation.
#[derive(Debug, Error)]
pub enum IngestError {
    // === List Format Errors ===
    /// The list input is not valid JSON.
    #[error("invalid JSON input: {source}")]
    ListSyntax {
        #[source]
        source: serde_json::Error,
    },

    /// The list input parsed but the top-level value is not an array.
    #[error("top-level value must be an array of records, found {found}")]
    NotAList { found: &'static str },

    // === Tree Format Errors ===
    /// The tree input is not well-formed XML.
    #[error("malformed XML at byte {position}: {message}")]
    TreeSyntax { position: u64, message: String },

    /// The tree input is well formed but has no `<sample>` elements.
    #[error("XML document contains no <sample> elements")]
    NoSampleElements,
}

impl IngestError {
    /// Taxonomy code reported for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ListSyntax { .. } | Self::NotAList { .. } => ErrorCode::ListParse,
            Self::TreeSyntax { .. } | Self::NoSampleElements => ErrorCode::TreeParse,
        }
    }

    pub fn kind(&self) -> IngestErrorKind {
        match self {
            Self::NotAList { .. } => IngestErrorKind::Structure,
            Self::ListSyntax { .. } | Self::TreeSyntax { .. } => IngestErrorKind::Syntax,
            Self::NoSampleElements => IngestErrorKind::Content,
        }
    }
}

/// Result type for decoding operations.
pub type Result<T> = std::result::Result<T, IngestError>;
