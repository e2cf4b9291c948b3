//! Status/value plausibility.

use lims_model::{NormalizedSample, SampleStatus};

use crate::issue::Issue;

/// A REPORTED sample must carry a finite value.
///
/// Non-numeric input was already coerced to NaN, so NaN and infinities are
/// the only ways to fail.
pub fn check(sample: &NormalizedSample) -> Vec<Issue> {
    let reported = sample.status == SampleStatus::Reported.as_str();
    if reported && !sample.value.is_finite() {
        vec![Issue::ReportedWithoutValue]
    } else {
        Vec::new()
    }
}
