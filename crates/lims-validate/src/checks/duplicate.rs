//! Duplicate `id::accession` detection across the run.

use lims_model::NormalizedSample;

use crate::context::GateState;
use crate::issue::Issue;

/// Flag a record whose key was already seen. Every key is recorded, whether
/// or not its record turns out valid.
pub fn check(sample: &NormalizedSample, state: &mut GateState) -> Vec<Issue> {
    let key = sample.duplicate_key();
    if state.seen_keys.contains(&key) {
        vec![Issue::Duplicate { key }]
    } else {
        state.seen_keys.insert(key);
        Vec::new()
    }
}
