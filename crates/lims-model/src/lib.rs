//! Core data model for the specimen quality gate.
//!
//! Every stage of the pipeline speaks in these types: normalized samples,
//! validation findings, processed samples, simulated acknowledgments and
//! audit entries. The [`checksum`] module holds the single content hash used
//! for audit integrity and for seeding the reconciliation generator.

pub mod ack;
pub mod audit;
pub mod checksum;
pub mod enums;
pub mod error_code;
pub mod numeric;
pub mod options;
pub mod sample;

// === Samples ===
pub use sample::{InputFormat, NormalizedSample, ProcessedSample};

// === Enumerations ===
pub use enums::{Category, SampleStatus, SpecimenType, Unit};

// === Validation ===
pub use error_code::{ErrorCode, QuarantineEntry, ValidationError};

// === Reconciliation and audit ===
pub use ack::AckResult;
pub use audit::{AuditEntry, AuditStage, AuditStatus, RUN_LEVEL_RECORD_ID};

// === Utilities ===
pub use checksum::{canonical_json, canonical_string, content_hash, sort_keys};
pub use numeric::coerce_f64;
pub use options::PipelineOptions;
