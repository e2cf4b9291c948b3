//! Derived run metrics.
//!
//! Nothing here is stored between calls; a [`RunMetrics`] snapshot is built
//! from the current run state and every rate or histogram is computed from
//! that snapshot on demand.

use std::collections::BTreeMap;

use lims_model::ErrorCode;
use serde::Serialize;

/// Width of one delay histogram bucket in milliseconds.
pub const BUCKET_WIDTH_MS: u32 = 200;

/// Counts describing one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetrics {
    pub total: usize,
    pub valid_count: usize,
    pub error_count: usize,
    pub quarantine_count: usize,
    pub acked_count: usize,
    pub sla_breach_count: usize,
    pub error_count_by_code: BTreeMap<ErrorCode, usize>,
    /// Simulated acknowledgment delays in processed order.
    pub ack_delays: Vec<u32>,
}

/// One fixed-width bucket of the delay histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBucket {
    /// Inclusive lower edge.
    pub start_ms: u32,
    /// Exclusive upper edge.
    pub end_ms: u32,
    pub count: usize,
}

impl HistogramBucket {
    /// Empty bucket at `index`; the end edge saturates at `u32::MAX`.
    fn empty(index: u32) -> Self {
        let start_ms = index * BUCKET_WIDTH_MS;
        Self {
            start_ms,
            end_ms: start_ms.saturating_add(BUCKET_WIDTH_MS),
            count: 0,
        }
    }

    pub fn label(&self) -> String {
        format!("{}-{}ms", self.start_ms, self.end_ms - 1)
    }
}

impl RunMetrics {
    /// Findings per validated record; 0 for an empty run.
    pub fn error_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.error_count as f64 / self.total as f64
        }
    }

    /// Share of acknowledgments that breached the SLA; 0 without acks.
    pub fn sla_breach_rate(&self) -> f64 {
        let acks = self.ack_delays.len();
        if acks == 0 {
            0.0
        } else {
            self.sla_breach_count as f64 / acks as f64
        }
    }

    pub fn quarantine_size(&self) -> usize {
        self.quarantine_count
    }

    /// Records pushed through the gate.
    pub fn throughput(&self) -> usize {
        self.total
    }

    pub fn delay_histogram(&self) -> Vec<HistogramBucket> {
        delay_histogram(&self.ack_delays)
    }
}

/// Bucket delays into [`BUCKET_WIDTH_MS`] buckets starting at zero.
///
/// The bucket count is `max / BUCKET_WIDTH_MS + 1`, so the largest delay
/// always lands in the last bucket. No delays means no buckets.
pub fn delay_histogram(delays: &[u32]) -> Vec<HistogramBucket> {
    let Some(max) = delays.iter().copied().max() else {
        return Vec::new();
    };
    let bucket_count = (max / BUCKET_WIDTH_MS) as usize + 1;
    let mut buckets: Vec<HistogramBucket> = (0..bucket_count)
        .map(|index| HistogramBucket::empty(index as u32))
        .collect();
    for delay in delays {
        buckets[(delay / BUCKET_WIDTH_MS) as usize].count += 1;
    }
    buckets
}
