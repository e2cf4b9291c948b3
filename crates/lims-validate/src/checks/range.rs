//! Numeric bounds.

use lims_model::NormalizedSample;

use crate::issue::Issue;

pub const MIN_VALUE: f64 = 0.0;
/// Inclusive upper bound.
pub const MAX_VALUE: f64 = 1_000_000.0;

/// Flag values outside `[MIN_VALUE, MAX_VALUE]`. NaN is left to the
/// required-field check.
pub fn check(sample: &NormalizedSample) -> Vec<Issue> {
    let value = sample.value;
    if value.is_nan() || (MIN_VALUE..=MAX_VALUE).contains(&value) {
        return Vec::new();
    }
    vec![Issue::ValueOutOfRange { value }]
}
