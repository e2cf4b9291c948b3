//! Temporal plausibility and input-order chronology.

use chrono::{DateTime, Months, SecondsFormat, Utc};
use lims_model::NormalizedSample;

use crate::checks::format::parse_collected_at;
use crate::context::{GateState, ValidationContext};
use crate::issue::Issue;

/// Check the collection time against the validation instant, the retention
/// window and the running maximum of earlier records.
///
/// Timestamps that fail the format check are skipped. The running maximum
/// advances with every well-formed timestamp that is not in the future.
pub fn check(
    sample: &NormalizedSample,
    context: &ValidationContext,
    state: &mut GateState,
) -> Vec<Issue> {
    let Some(collected) = parse_collected_at(&sample.collected_at) else {
        return Vec::new();
    };
    let mut issues = Vec::new();

    if collected > context.now {
        issues.push(Issue::FutureTimestamp {
            collected_at: sample.collected_at.clone(),
        });
        return issues;
    }

    let oldest = context
        .now
        .checked_sub_months(Months::new(context.max_age_months));
    if oldest.is_some_and(|oldest| collected < oldest) {
        issues.push(Issue::TimestampTooOld {
            collected_at: sample.collected_at.clone(),
            months: context.max_age_months,
        });
    }

    match state.running_max {
        Some(max) if collected < max => issues.push(Issue::OutOfOrder {
            collected_at: sample.collected_at.clone(),
            running_max: format_instant(max),
        }),
        Some(max) if collected == max => {}
        _ => state.running_max = Some(collected),
    }
    issues
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
