//! Quality gate rules.
//!
//! Each module performs one kind of check on one record. Chronology and
//! duplicate detection also read and update the cross-record [`GateState`].

mod chronology;
mod duplicate;
mod enumeration;
pub mod format;
mod plausibility;
pub mod range;
mod required;

use lims_model::NormalizedSample;

use crate::context::{GateState, ValidationContext};
use crate::issue::Issue;

/// Run every rule against one record, in evaluation order.
pub fn run_all(
    sample: &NormalizedSample,
    context: &ValidationContext,
    state: &mut GateState,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    // 1. Required field presence
    issues.extend(required::check(sample));

    // 2. Controlled vocabularies (non-empty fields only)
    issues.extend(enumeration::check(sample));

    // 3. Numeric bounds
    issues.extend(range::check(sample));

    // 4. REPORTED needs a finite value
    issues.extend(plausibility::check(sample));

    // 5. id, accession and timestamp patterns
    issues.extend(format::check(sample));

    // 6. Future, retention window and input-order chronology
    issues.extend(chronology::check(sample, context, state));

    // 7. Duplicate id+accession
    issues.extend(duplicate::check(sample, state));

    issues
}
