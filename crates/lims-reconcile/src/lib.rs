//! Deterministic downstream reconciliation.
//!
//! Acknowledgment outcomes are a closed-form simulation keyed by record
//! identity: reconciling the same processed list with the same threshold
//! always produces the same acks, delays and counts.

pub mod engine;
pub mod rng;

pub use engine::{ReconcileOutcome, reconcile_samples, simulate_ack};
pub use rng::Mulberry32;
