//! Required field presence.

use lims_model::NormalizedSample;

use crate::issue::Issue;

/// Flag every required field that is empty, and a NaN value.
pub fn check(sample: &NormalizedSample) -> Vec<Issue> {
    let presence: [(&'static str, bool); 7] = [
        ("id", !sample.id.is_empty()),
        ("patientId", !sample.patient_id.is_empty()),
        ("specimenType", !sample.specimen_type.is_empty()),
        ("status", !sample.status.is_empty()),
        ("value", !sample.value.is_nan()),
        ("unit", !sample.unit.is_empty()),
        ("collectedAt", !sample.collected_at.is_empty()),
    ];
    presence
        .into_iter()
        .filter(|(_, present)| !present)
        .map(|(field, _)| Issue::MissingField { field })
        .collect()
}
