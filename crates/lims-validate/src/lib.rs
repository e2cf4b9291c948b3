//! Quality gate for normalized samples.
//!
//! [`validate_samples`] walks a batch in input order, runs every rule in
//! [`checks`] against each record, and partitions the batch: records with
//! at least one finding go to quarantine, the rest stay valid. Findings are
//! kept in a parallel error list so the collapsed quarantine code never
//! hides which rules failed.

pub mod checks;
pub mod context;
pub mod issue;

use std::collections::BTreeMap;

use lims_model::{ErrorCode, NormalizedSample, QuarantineEntry, ValidationError};
use tracing::{debug, info, info_span};

// === Context ===
pub use context::{GateState, ValidationContext};

// === Findings ===
pub use issue::Issue;

/// Per-record summary used for the validate audit entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordVerdict {
    pub index: usize,
    pub record_id: String,
    /// Checksum of the record before any transformation.
    pub checksum: u32,
    /// Codes of the findings, in evaluation order.
    pub codes: Vec<ErrorCode>,
}

impl RecordVerdict {
    pub fn is_valid(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Result of running the gate over a batch.
#[derive(Debug, Clone, Default)]
pub struct GateOutcome {
    pub valid: Vec<NormalizedSample>,
    pub quarantined: Vec<QuarantineEntry>,
    pub errors: Vec<ValidationError>,
    /// One verdict per input record, in input order.
    pub verdicts: Vec<RecordVerdict>,
}

impl GateOutcome {
    /// Number of records that went through the gate.
    pub fn total(&self) -> usize {
        self.verdicts.len()
    }

    pub fn error_count_by_code(&self) -> BTreeMap<ErrorCode, usize> {
        count_by_code(&self.errors)
    }
}

/// Count findings per error code, in code order.
pub fn count_by_code(errors: &[ValidationError]) -> BTreeMap<ErrorCode, usize> {
    let mut counts = BTreeMap::new();
    for error in errors {
        *counts.entry(error.code).or_insert(0) += 1;
    }
    counts
}

/// Validate a batch and partition it into valid and quarantined records.
pub fn validate_samples(samples: &[NormalizedSample], context: &ValidationContext) -> GateOutcome {
    let span = info_span!("validate", records = samples.len());
    let _guard = span.enter();

    let mut state = GateState::default();
    let mut outcome = GateOutcome::default();

    for (index, sample) in samples.iter().enumerate() {
        let issues = checks::run_all(sample, context, &mut state);
        let codes: Vec<ErrorCode> = issues.iter().map(Issue::code).collect();
        debug!(
            index,
            record_id = %sample.id,
            findings = codes.len(),
            "record evaluated"
        );

        outcome.verdicts.push(RecordVerdict {
            index,
            record_id: sample.id.clone(),
            checksum: sample.checksum(),
            codes,
        });
        if issues.is_empty() {
            outcome.valid.push(sample.clone());
        } else {
            outcome.errors.extend(
                issues
                    .into_iter()
                    .map(|issue| issue.into_error(index, &sample.id)),
            );
            outcome
                .quarantined
                .push(QuarantineEntry::collapsed(sample.clone()));
        }
    }

    info!(
        valid = outcome.valid.len(),
        quarantined = outcome.quarantined.len(),
        errors = outcome.errors.len(),
        "quality gate complete"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use lims_model::InputFormat;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn sample(id: &str, collected_at: &str) -> NormalizedSample {
        NormalizedSample {
            id: id.to_string(),
            patient_id: "P-001".to_string(),
            specimen_type: "BLOOD".to_string(),
            status: "RECEIVED".to_string(),
            value: 10.0,
            unit: "MG/DL".to_string(),
            collected_at: collected_at.to_string(),
            accession: String::new(),
            source: InputFormat::List,
        }
    }

    fn codes(outcome: &GateOutcome, index: usize) -> Vec<ErrorCode> {
        outcome.verdicts[index].codes.clone()
    }

    fn run(samples: &[NormalizedSample]) -> GateOutcome {
        validate_samples(samples, &ValidationContext::new(now()))
    }

    #[test]
    fn clean_record_is_valid() {
        let outcome = run(&[sample("S-0001", "2026-05-01T08:00Z")]);
        assert_eq!(outcome.valid.len(), 1);
        assert!(outcome.quarantined.is_empty());
        assert!(outcome.errors.is_empty());
        assert!(outcome.verdicts[0].is_valid());
    }

    #[test]
    fn value_upper_bound_is_inclusive() {
        let mut at_bound = sample("S-0001", "2026-05-01T08:00Z");
        at_bound.value = 1_000_000.0;
        let mut above = sample("S-0002", "2026-05-01T08:00Z");
        above.value = 1_000_000.01;
        let mut far_above = sample("S-0003", "2026-05-01T08:00Z");
        far_above.value = 1_000_001.0;
        let mut negative = sample("S-0004", "2026-05-01T08:00Z");
        negative.value = -0.5;
        let outcome = run(&[at_bound, above, far_above, negative]);
        assert!(codes(&outcome, 0).is_empty());
        assert_eq!(codes(&outcome, 1), vec![ErrorCode::OutOfRange]);
        assert_eq!(codes(&outcome, 2), vec![ErrorCode::OutOfRange]);
        assert_eq!(codes(&outcome, 3), vec![ErrorCode::OutOfRange]);
    }

    #[test]
    fn now_is_valid_and_one_millisecond_later_is_future() {
        let at_now = sample("S-0001", "2026-06-01T12:00:00.000Z");
        let later = (now() + Duration::milliseconds(1))
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let future = sample("S-0002", &later);
        let outcome = run(&[at_now, future]);
        assert!(codes(&outcome, 0).is_empty());
        assert_eq!(codes(&outcome, 1), vec![ErrorCode::Chronology]);
    }

    #[test]
    fn equal_timestamps_are_non_decreasing() {
        let outcome = run(&[
            sample("S-0001", "2026-05-01T08:00Z"),
            sample("S-0002", "2026-05-01T08:00:00Z"),
            sample("S-0003", "2026-05-01T07:59:59.999Z"),
        ]);
        assert!(codes(&outcome, 0).is_empty());
        assert!(codes(&outcome, 1).is_empty());
        assert_eq!(codes(&outcome, 2), vec![ErrorCode::Chronology]);
    }

    #[test]
    fn future_timestamps_do_not_raise_the_running_max() {
        let outcome = run(&[
            sample("S-0001", "2026-05-01T08:00Z"),
            sample("S-0002", "2027-01-01T00:00Z"),
            sample("S-0003", "2026-05-02T08:00Z"),
        ]);
        assert_eq!(codes(&outcome, 1), vec![ErrorCode::Chronology]);
        assert!(codes(&outcome, 2).is_empty());
    }

    #[test]
    fn invalid_records_still_raise_the_running_max() {
        let mut bad = sample("S-0002", "2026-05-03T08:00Z");
        bad.unit = "G/L".to_string();
        let outcome = run(&[
            sample("S-0001", "2026-05-01T08:00Z"),
            bad,
            sample("S-0003", "2026-05-02T08:00Z"),
        ]);
        assert_eq!(codes(&outcome, 1), vec![ErrorCode::InvalidEnum]);
        assert_eq!(codes(&outcome, 2), vec![ErrorCode::Chronology]);
    }

    #[test]
    fn timestamps_older_than_three_years_are_out_of_range() {
        let outcome = run(&[
            sample("S-0001", "2023-06-01T12:00Z"),
            sample("S-0002", "2023-06-01T11:59Z"),
        ]);
        assert!(codes(&outcome, 0).is_empty());
        assert_eq!(
            codes(&outcome, 1),
            vec![ErrorCode::OutOfRange, ErrorCode::Chronology]
        );
    }

    #[test]
    fn malformed_timestamp_skips_temporal_checks() {
        let outcome = run(&[sample("S-0001", "2099-01-01")]);
        assert_eq!(codes(&outcome, 0), vec![ErrorCode::Format]);
    }

    #[test]
    fn reported_without_value_is_implausible() {
        let mut reported = sample("S-0001", "2026-05-01T08:00Z");
        reported.status = "REPORTED".to_string();
        reported.value = f64::NAN;
        let mut infinite = sample("S-0002", "2026-05-01T08:00Z");
        infinite.status = "REPORTED".to_string();
        infinite.value = f64::INFINITY;
        let mut received = sample("S-0003", "2026-05-01T08:00Z");
        received.value = f64::NAN;
        let outcome = run(&[reported, infinite, received]);
        assert_eq!(
            codes(&outcome, 0),
            vec![ErrorCode::MissingField, ErrorCode::Plausibility]
        );
        assert_eq!(
            codes(&outcome, 1),
            vec![ErrorCode::OutOfRange, ErrorCode::Plausibility]
        );
        assert_eq!(codes(&outcome, 2), vec![ErrorCode::MissingField]);
    }

    #[test]
    fn empty_fields_skip_vocabulary_checks() {
        let mut record = sample("S-0001", "2026-05-01T08:00Z");
        record.specimen_type.clear();
        record.unit = "G/L".to_string();
        let outcome = run(&[record]);
        let fields: Vec<&str> = outcome.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["specimenType", "unit"]);
        assert_eq!(
            codes(&outcome, 0),
            vec![ErrorCode::MissingField, ErrorCode::InvalidEnum]
        );
    }

    #[test]
    fn duplicates_are_flagged_after_first_occurrence() {
        let mut first = sample("S-0001", "2026-05-01T08:00Z");
        first.accession = "ACC-00000001".to_string();
        let mut second = first.clone();
        second.collected_at = "2026-05-01T09:00Z".to_string();
        let mut other_accession = first.clone();
        other_accession.accession = "ACC-00000002".to_string();
        other_accession.collected_at = "2026-05-01T10:00Z".to_string();
        let outcome = run(&[first, second.clone(), other_accession, second]);
        assert!(codes(&outcome, 0).is_empty());
        assert_eq!(codes(&outcome, 1), vec![ErrorCode::Duplicate]);
        assert!(codes(&outcome, 2).is_empty());
        assert_eq!(
            codes(&outcome, 3),
            vec![ErrorCode::Chronology, ErrorCode::Duplicate]
        );
    }

    #[test]
    fn quarantine_collapses_to_one_entry_per_record() {
        let mut record = sample("x", "bad");
        record.unit = "G/L".to_string();
        record.value = -1.0;
        let outcome = run(&[record]);
        assert_eq!(outcome.quarantined.len(), 1);
        assert_eq!(outcome.quarantined[0].code, ErrorCode::Plausibility);
        assert_eq!(outcome.quarantined[0].reason, QuarantineEntry::REASON);
        assert_eq!(outcome.errors.len(), 4);
        assert!(outcome.errors.iter().all(|e| e.record_index == 0));
        let by_code = outcome.error_count_by_code();
        assert_eq!(by_code[&ErrorCode::Format], 2);
        assert_eq!(by_code[&ErrorCode::InvalidEnum], 1);
        assert_eq!(by_code[&ErrorCode::OutOfRange], 1);
    }

    #[test]
    fn verdict_checksum_is_pre_transform_checksum() {
        let record = sample("S-0001", "2026-05-01T08:00Z");
        let outcome = run(std::slice::from_ref(&record));
        assert_eq!(outcome.verdicts[0].checksum, record.checksum());
    }
}
