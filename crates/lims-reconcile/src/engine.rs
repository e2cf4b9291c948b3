//! Acknowledgment and SLA simulation.
//!
//! Every processed sample gets its own generator seeded with the content
//! hash of its id. The first draw sets the delay, the second decides the
//! acknowledgment. No time passes; the delay is a simulated figure.

use lims_model::{AckResult, ProcessedSample, content_hash};
use tracing::{debug, info, info_span};

use crate::rng::Mulberry32;

/// Shortest simulated delay in milliseconds.
pub const MIN_DELAY_MS: u32 = 100;
/// Width of the delay range; delays fall in `[100, 2500)`.
pub const DELAY_SPAN_MS: f64 = 2400.0;
/// Second draws at or below this value fail with ack 500.
pub const FAILURE_CUTOFF: f64 = 0.12;

/// Result of reconciling the processed list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub acks: Vec<AckResult>,
    pub acked: usize,
    pub sla_breaches: usize,
    /// Simulated delays in processed order.
    pub delays: Vec<u32>,
}

/// Simulate the acknowledgment of one record id.
pub fn simulate_ack(record_id: &str, sla_threshold_ms: u32) -> AckResult {
    let mut rng = Mulberry32::new(content_hash(record_id));
    let delay_ms = MIN_DELAY_MS + (rng.next_f64() * DELAY_SPAN_MS).floor() as u32;
    let ok = rng.next_f64() > FAILURE_CUTOFF;
    AckResult {
        record_id: record_id.to_string(),
        ok,
        ack_code: if ok {
            AckResult::ACK_OK
        } else {
            AckResult::ACK_FAILED
        },
        delay_ms,
        sla_met: delay_ms <= sla_threshold_ms,
    }
}

/// Simulate acknowledgments for every processed sample.
pub fn reconcile_samples(processed: &[ProcessedSample], sla_threshold_ms: u32) -> ReconcileOutcome {
    let span = info_span!("reconcile", records = processed.len(), sla_threshold_ms);
    let _guard = span.enter();

    let mut outcome = ReconcileOutcome::default();
    for sample in processed {
        let ack = simulate_ack(sample.id(), sla_threshold_ms);
        debug!(
            record_id = %ack.record_id,
            ack_code = ack.ack_code,
            delay_ms = ack.delay_ms,
            sla_met = ack.sla_met,
            "acknowledgment simulated"
        );
        if ack.ok {
            outcome.acked += 1;
        }
        if !ack.sla_met {
            outcome.sla_breaches += 1;
        }
        outcome.delays.push(ack.delay_ms);
        outcome.acks.push(ack);
    }

    info!(
        acked = outcome.acked,
        sla_breaches = outcome.sla_breaches,
        "reconciliation complete"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_give_known_outcomes() {
        let ack = simulate_ack("S-0001", 1500);
        assert_eq!(ack.delay_ms, 400);
        assert!(ack.ok);
        assert_eq!(ack.ack_code, 200);
        assert!(ack.sla_met);

        let ack = simulate_ack("S-0002", 1500);
        assert_eq!(ack.delay_ms, 2279);
        assert!(ack.ok);
        assert!(!ack.sla_met);
    }

    #[test]
    fn threshold_is_inclusive() {
        let ack = simulate_ack("S-0002", 2279);
        assert!(ack.sla_met);
        let ack = simulate_ack("S-0002", 2278);
        assert!(!ack.sla_met);
    }

    #[test]
    fn empty_input() {
        assert_eq!(reconcile_samples(&[], 1500), ReconcileOutcome::default());
    }
}
