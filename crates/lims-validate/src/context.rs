//! Validation context and cross-record state.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

/// Inputs that make a validation pass reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    /// Instant the batch is validated at; later timestamps are in the future.
    pub now: DateTime<Utc>,
    /// Collection times older than `now` minus this many months are out of range.
    pub max_age_months: u32,
}

impl ValidationContext {
    pub const DEFAULT_MAX_AGE_MONTHS: u32 = 36;

    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            max_age_months: Self::DEFAULT_MAX_AGE_MONTHS,
        }
    }

    #[must_use]
    pub fn with_max_age_months(mut self, months: u32) -> Self {
        self.max_age_months = months;
        self
    }
}

/// State accumulated while walking a batch in input order.
#[derive(Debug, Default)]
pub struct GateState {
    /// Every `id::accession` key seen so far.
    pub seen_keys: HashSet<String>,
    /// Latest well-formed, non-future collection time seen so far.
    pub running_max: Option<DateTime<Utc>>,
}
