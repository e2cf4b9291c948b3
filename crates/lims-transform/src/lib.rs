//! Processing of samples that passed the quality gate.
//!
//! Each valid sample is categorized, stamped with the processing instant and
//! given a normalized value. The processed list always replaces any earlier
//! one; nothing accumulates across invocations.

pub mod category;

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use lims_model::{Category, NormalizedSample, ProcessedSample};
use tracing::{debug, info, info_span};

pub use category::categorize;

/// Result of processing the valid list.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutcome {
    pub samples: Vec<ProcessedSample>,
    /// Post-transform checksum of each processed sample, same order.
    pub checksums: Vec<u32>,
    pub by_category: BTreeMap<Category, usize>,
}

impl ProcessOutcome {
    pub fn count(&self, category: Category) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }
}

/// Value carried forward for downstream consumers.
///
/// Samples reaching this stage already hold a finite value in range, so the
/// value passes through unchanged; anything non-finite collapses to NaN.
pub fn normalized_value(sample: &NormalizedSample) -> f64 {
    if sample.value.is_finite() {
        sample.value
    } else {
        f64::NAN
    }
}

/// Categorize and enrich every valid sample.
pub fn process_samples(valid: &[NormalizedSample], processed_at: DateTime<Utc>) -> ProcessOutcome {
    let span = info_span!("process", records = valid.len());
    let _guard = span.enter();

    let stamp = processed_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut outcome = ProcessOutcome::default();
    for sample in valid {
        let processed = ProcessedSample {
            sample: sample.clone(),
            processed_at: stamp.clone(),
            normalized_value: normalized_value(sample),
            category: categorize(sample),
        };
        let checksum = processed.checksum();
        debug!(record_id = %processed.id(), category = %processed.category, checksum, "processed");
        *outcome.by_category.entry(processed.category).or_insert(0) += 1;
        outcome.checksums.push(checksum);
        outcome.samples.push(processed);
    }

    info!(
        processed = outcome.samples.len(),
        hematology = outcome.count(Category::Hematology),
        microbiology = outcome.count(Category::Microbiology),
        chemistry = outcome.count(Category::Chemistry),
        "processing complete"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lims_model::InputFormat;

    fn sample(id: &str, specimen_type: &str, unit: &str) -> NormalizedSample {
        NormalizedSample {
            id: id.to_string(),
            patient_id: "P-1".to_string(),
            specimen_type: specimen_type.to_string(),
            status: "REPORTED".to_string(),
            value: 7.25,
            unit: unit.to_string(),
            collected_at: "2026-01-01T00:00Z".to_string(),
            accession: String::new(),
            source: InputFormat::Tree,
        }
    }

    #[test]
    fn processes_in_order_with_counts() {
        let at = Utc.with_ymd_and_hms(2026, 2, 3, 4, 5, 6).unwrap();
        let outcome = process_samples(
            &[
                sample("S-0001", "BLOOD", "CELLS/µL"),
                sample("S-0002", "SWAB", "IU/L"),
                sample("S-0003", "URINE", "MG/DL"),
                sample("S-0004", "PLASMA", "MMOL/L"),
            ],
            at,
        );
        let ids: Vec<&str> = outcome.samples.iter().map(ProcessedSample::id).collect();
        assert_eq!(ids, vec!["S-0001", "S-0002", "S-0003", "S-0004"]);
        assert_eq!(outcome.count(Category::Hematology), 1);
        assert_eq!(outcome.count(Category::Microbiology), 1);
        assert_eq!(outcome.count(Category::Chemistry), 2);
        assert_eq!(outcome.samples[0].processed_at, "2026-02-03T04:05:06.000Z");
        assert_eq!(outcome.samples[2].normalized_value, 7.25);
    }

    #[test]
    fn checksums_match_processed_records() {
        let at = Utc.with_ymd_and_hms(2026, 2, 3, 4, 5, 6).unwrap();
        let outcome = process_samples(&[sample("S-0001", "SWAB", "IU/L")], at);
        assert_eq!(outcome.checksums, vec![outcome.samples[0].checksum()]);
    }

    #[test]
    fn empty_input_gives_empty_outcome() {
        let outcome = process_samples(&[], Utc::now());
        assert!(outcome.samples.is_empty());
        assert!(outcome.by_category.is_empty());
    }
}
