//! Pipeline runs over specimen batches.
//!
//! A [`Run`] drives a batch through intake, the quality gate, processing
//! and acknowledgment reconciliation, recording every step in an
//! append-only [`AuditLog`].
//!
//! # Example
//!
//! ```ignore
//! use lims_core::Run;
//! use lims_model::InputFormat;
//!
//! let mut run = Run::new();
//! let intake = run.intake(&raw, InputFormat::List);
//! if intake.ok {
//!     run.process()?;
//!     run.reconcile(1500)?;
//! }
//! let csv = run.export_audit_csv()?;
//! ```

mod audit_log;
mod clock;
mod error;
mod run;

// === Error Types ===
pub use error::{Result, RunError};

// === Audit ===
pub use audit_log::{AuditLog, IntegrityError};

// === Orchestration ===
pub use clock::Clock;
pub use run::{IntakeOutcome, Run};
