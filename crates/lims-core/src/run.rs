//! One end-to-end pipeline run.
//!
//! A [`Run`] owns every entity it produces: decoded samples, the gate
//! outcome, processed samples, acknowledgments and the audit log. Starting
//! a new intake discards all of it and mints a new run id. Later stages
//! replace their own results and everything downstream of them.

use std::fmt::Write as _;

use lims_ingest::parse_batch;
use lims_model::{
    AckResult, AuditStage, AuditStatus, Category, ErrorCode, InputFormat, NormalizedSample,
    ProcessedSample, QuarantineEntry, RUN_LEVEL_RECORD_ID, ValidationError,
};
use lims_reconcile::{ReconcileOutcome, reconcile_samples};
use lims_report::RunMetrics;
use lims_transform::{ProcessOutcome, process_samples};
use lims_validate::{GateOutcome, RecordVerdict, ValidationContext, validate_samples};
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::audit_log::AuditLog;
use crate::clock::Clock;
use crate::error::{Result, RunError};

/// What an intake call reports back to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeOutcome {
    pub ok: bool,
    pub message: String,
    /// Set when the batch could not be decoded.
    pub code: Option<ErrorCode>,
    pub total: usize,
    pub valid: usize,
    pub quarantined: usize,
    pub errors: usize,
}

/// Explicit state for one pipeline run.
#[derive(Debug)]
pub struct Run {
    run_id: String,
    clock: Clock,
    max_age_months: u32,
    samples: Vec<NormalizedSample>,
    gate: Option<GateOutcome>,
    processed: Option<ProcessOutcome>,
    reconciled: Option<ReconcileOutcome>,
    audit: AuditLog,
}

impl Default for Run {
    fn default() -> Self {
        Self::new()
    }
}

impl Run {
    /// A run reading the system clock.
    pub fn new() -> Self {
        Self::with_clock(Clock::system())
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            run_id: new_run_id(),
            clock,
            max_age_months: ValidationContext::DEFAULT_MAX_AGE_MONTHS,
            samples: Vec::new(),
            gate: None,
            processed: None,
            reconciled: None,
            audit: AuditLog::new(),
        }
    }

    /// Override the retention window used by the timestamp checks.
    #[must_use]
    pub fn with_max_age_months(mut self, months: u32) -> Self {
        self.max_age_months = months;
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    // =========================================================================
    // Stages
    // =========================================================================

    /// Start a new run from raw input: decode, normalize and validate.
    ///
    /// All state from the previous run is discarded first. A decode failure
    /// is reported through the returned outcome and one fatal audit entry;
    /// the run is then left without samples and later stages refuse to run.
    pub fn intake(&mut self, raw: &str, format: InputFormat) -> IntakeOutcome {
        self.reset();
        let span = info_span!("intake", run_id = %self.run_id, format = %format);
        let _guard = span.enter();

        let samples = match parse_batch(raw, format) {
            Ok(samples) => samples,
            Err(error) => {
                let code = error.code();
                let message = format!("{code}: {error}");
                warn!(code = %code, error = %error, "intake failed");
                self.log(
                    AuditStage::Intake,
                    AuditStatus::Error,
                    RUN_LEVEL_RECORD_ID,
                    message.clone(),
                );
                return IntakeOutcome {
                    ok: false,
                    message,
                    code: Some(code),
                    total: 0,
                    valid: 0,
                    quarantined: 0,
                    errors: 0,
                };
            }
        };
        self.log(
            AuditStage::Intake,
            AuditStatus::Ok,
            RUN_LEVEL_RECORD_ID,
            format!("parsed {} records (format={format})", samples.len()),
        );

        let context =
            ValidationContext::new(self.clock.now()).with_max_age_months(self.max_age_months);
        let gate = validate_samples(&samples, &context);
        for verdict in &gate.verdicts {
            let status = AuditStatus::from_ok(verdict.is_valid());
            self.log(
                AuditStage::Validate,
                status,
                &verdict.record_id,
                validate_notes(verdict),
            );
        }
        let summary = format!(
            "valid={} quarantined={} errors={}",
            gate.valid.len(),
            gate.quarantined.len(),
            gate.errors.len()
        );
        self.log(
            AuditStage::Validate,
            AuditStatus::Ok,
            RUN_LEVEL_RECORD_ID,
            summary.clone(),
        );
        info!(total = samples.len(), %summary, "intake complete");

        let outcome = IntakeOutcome {
            ok: true,
            message: format!("parsed {} records; {summary}", samples.len()),
            code: None,
            total: samples.len(),
            valid: gate.valid.len(),
            quarantined: gate.quarantined.len(),
            errors: gate.errors.len(),
        };
        self.samples = samples;
        self.gate = Some(gate);
        outcome
    }

    /// Categorize and enrich the valid samples, replacing any earlier
    /// processed list and discarding acknowledgments built from it.
    pub fn process(&mut self) -> Result<usize> {
        let Some(gate) = &self.gate else {
            return Err(RunError::StageNotReady {
                stage: AuditStage::Process,
                prerequisite: AuditStage::Intake,
            });
        };
        let span = info_span!("process", run_id = %self.run_id);
        let _guard = span.enter();

        let outcome = process_samples(&gate.valid, self.clock.now());
        self.reconciled = None;
        let mut entries = Vec::with_capacity(outcome.samples.len());
        for (sample, checksum) in outcome.samples.iter().zip(&outcome.checksums) {
            entries.push((
                sample.id().to_string(),
                format!("post={checksum} category={}", sample.category),
            ));
        }
        for (record_id, notes) in entries {
            self.log(AuditStage::Process, AuditStatus::Ok, &record_id, notes);
        }
        let mut summary = format!("processed={}", outcome.samples.len());
        for category in Category::ALL {
            let _ = write!(summary, " {category}={}", outcome.count(category));
        }
        self.log(
            AuditStage::Process,
            AuditStatus::Ok,
            RUN_LEVEL_RECORD_ID,
            summary,
        );

        let count = outcome.samples.len();
        self.processed = Some(outcome);
        Ok(count)
    }

    /// Simulate acknowledgments for the processed list, replacing any
    /// earlier acknowledgments.
    pub fn reconcile(&mut self, sla_threshold_ms: u32) -> Result<usize> {
        let Some(processed) = &self.processed else {
            return Err(RunError::StageNotReady {
                stage: AuditStage::Reconcile,
                prerequisite: AuditStage::Process,
            });
        };
        let span = info_span!("reconcile", run_id = %self.run_id, sla_threshold_ms);
        let _guard = span.enter();

        let outcome = reconcile_samples(&processed.samples, sla_threshold_ms);
        for ack in &outcome.acks {
            let notes = format!(
                "ack={} delay={}ms sla={}",
                ack.ack_code,
                ack.delay_ms,
                if ack.sla_met { "met" } else { "breach" }
            );
            self.log(
                AuditStage::Reconcile,
                AuditStatus::from_ok(ack.ok),
                &ack.record_id,
                notes,
            );
        }
        self.log(
            AuditStage::Reconcile,
            AuditStatus::Ok,
            RUN_LEVEL_RECORD_ID,
            format!(
                "acked={} breaches={} sla={sla_threshold_ms}ms",
                outcome.acked, outcome.sla_breaches
            ),
        );

        let count = outcome.acks.len();
        self.reconciled = Some(outcome);
        Ok(count)
    }

    // =========================================================================
    // Exports and snapshots
    // =========================================================================

    pub fn export_audit_csv(&self) -> lims_report::Result<String> {
        self.audit.to_csv()
    }

    pub fn export_audit_json(&self) -> lims_report::Result<String> {
        self.audit.to_json()
    }

    /// Counts derived from the current state of the run.
    pub fn metrics(&self) -> RunMetrics {
        let mut metrics = RunMetrics::default();
        if let Some(gate) = &self.gate {
            metrics.total = gate.total();
            metrics.valid_count = gate.valid.len();
            metrics.error_count = gate.errors.len();
            metrics.quarantine_count = gate.quarantined.len();
            metrics.error_count_by_code = gate.error_count_by_code();
        }
        if let Some(reconciled) = &self.reconciled {
            metrics.acked_count = reconciled.acked;
            metrics.sla_breach_count = reconciled.sla_breaches;
            metrics.ack_delays = reconciled.delays.clone();
        }
        metrics
    }

    pub fn samples(&self) -> &[NormalizedSample] {
        &self.samples
    }

    pub fn valid(&self) -> &[NormalizedSample] {
        self.gate.as_ref().map_or(&[], |gate| gate.valid.as_slice())
    }

    pub fn quarantined(&self) -> &[QuarantineEntry] {
        self.gate
            .as_ref()
            .map_or(&[], |gate| gate.quarantined.as_slice())
    }

    pub fn errors(&self) -> &[ValidationError] {
        self.gate.as_ref().map_or(&[], |gate| gate.errors.as_slice())
    }

    pub fn processed(&self) -> &[ProcessedSample] {
        self.processed
            .as_ref()
            .map_or(&[], |outcome| outcome.samples.as_slice())
    }

    pub fn acks(&self) -> &[AckResult] {
        self.reconciled
            .as_ref()
            .map_or(&[], |outcome| outcome.acks.as_slice())
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn reset(&mut self) {
        self.run_id = new_run_id();
        self.samples.clear();
        self.gate = None;
        self.processed = None;
        self.reconciled = None;
        self.audit = AuditLog::new();
    }

    fn log(&mut self, stage: AuditStage, status: AuditStatus, record_id: &str, notes: String) {
        let time = self.clock.timestamp();
        self.audit
            .append(time, &self.run_id, stage, status, record_id, notes);
    }
}

fn new_run_id() -> String {
    Uuid::new_v4().to_string()
}

fn validate_notes(verdict: &RecordVerdict) -> String {
    let mut notes = format!("pre={} errors={}", verdict.checksum, verdict.codes.len());
    if !verdict.codes.is_empty() {
        let codes: Vec<&str> = verdict.codes.iter().map(ErrorCode::as_str).collect();
        let _ = write!(notes, " codes={}", codes.join(","));
    }
    notes
}
