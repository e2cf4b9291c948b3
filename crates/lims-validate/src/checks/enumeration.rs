//! Controlled vocabulary membership.
//!
//! Only non-empty fields are checked; empty ones are reported by the
//! required-field check.

use std::str::FromStr;

use lims_model::{NormalizedSample, SampleStatus, SpecimenType, Unit};

use crate::issue::Issue;

pub fn check(sample: &NormalizedSample) -> Vec<Issue> {
    let mut issues = Vec::new();
    check_field::<SpecimenType>("specimenType", &sample.specimen_type, &mut issues);
    check_field::<SampleStatus>("status", &sample.status, &mut issues);
    check_field::<Unit>("unit", &sample.unit, &mut issues);
    issues
}

fn check_field<T: FromStr>(field: &'static str, value: &str, issues: &mut Vec<Issue>) {
    if value.is_empty() || value.parse::<T>().is_ok() {
        return;
    }
    issues.push(Issue::InvalidEnum {
        field,
        value: value.to_string(),
    });
}
