//! Batch decoding for the specimen quality gate.
//!
//! Raw text is decoded in two steps: a format-specific parser produces
//! untyped [`RawRecord`]s, then [`normalize_record`] coerces each one into a
//! [`NormalizedSample`](lims_model::NormalizedSample). Parse failures abort
//! the batch; no partial record set is returned.

pub mod error;
pub mod list;
pub mod normalize;
pub mod tree;

use lims_model::{InputFormat, NormalizedSample};
use tracing::{debug, info_span};

// === Errors ===
pub use error::{IngestError, IngestErrorKind, Result};

// === Parsing ===
pub use list::parse_list;
pub use tree::parse_tree;

// === Normalization ===
pub use normalize::{RawRecord, normalize_record, normalize_records};

/// Decode and normalize a batch in the given format.
pub fn parse_batch(input: &str, format: InputFormat) -> Result<Vec<NormalizedSample>> {
    let span = info_span!("parse_batch", format = %format, bytes = input.len());
    let _guard = span.enter();
    let raw = match format {
        InputFormat::List => parse_list(input)?,
        InputFormat::Tree => parse_tree(input)?,
    };
    debug!(records = raw.len(), "decoded raw records");
    Ok(normalize_records(&raw, format))
}
