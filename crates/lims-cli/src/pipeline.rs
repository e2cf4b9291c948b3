//! File-level driver around [`Run`].

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use lims_core::{IntakeOutcome, Run};
use lims_model::{InputFormat, PipelineOptions, ValidationError};
use lims_report::RunMetrics;
use tracing::{debug, info, info_span};

use crate::logging::redact_value;

pub const AUDIT_CSV_FILE: &str = "audit.csv";
pub const AUDIT_JSON_FILE: &str = "audit.json";

/// Everything `lims run` needs to know.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub input: PathBuf,
    /// Explicit input format; inferred from the extension when absent.
    pub format: Option<InputFormat>,
    pub options: PipelineOptions,
    pub output_dir: Option<PathBuf>,
    pub reconcile: bool,
}

#[derive(Debug, Clone)]
pub struct AuditFiles {
    pub csv: PathBuf,
    pub json: PathBuf,
}

#[derive(Debug)]
pub struct PipelineReport {
    pub run_id: String,
    pub input: PathBuf,
    pub format: InputFormat,
    pub sla_threshold_ms: u32,
    pub intake: IntakeOutcome,
    pub errors: Vec<ValidationError>,
    pub metrics: RunMetrics,
    pub reconciled: bool,
    pub audit_files: Option<AuditFiles>,
}

/// Pick the input format from the flag, falling back to the extension.
pub fn resolve_format(input: &Path, explicit: Option<InputFormat>) -> Result<InputFormat> {
    if let Some(format) = explicit {
        return Ok(format);
    }
    input
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .and_then(InputFormat::from_extension)
        .ok_or_else(|| {
            anyhow!(
                "cannot infer input format of {}; pass --format list or --format tree",
                input.display()
            )
        })
}

/// Read the input file and drive one run through every stage.
///
/// A decode failure is not an `Err`: it is reported through
/// `PipelineReport::intake` and the audit files are still written.
pub fn run_pipeline(request: &PipelineRequest) -> Result<PipelineReport> {
    run_pipeline_with(Run::new(), request)
}

/// Like [`run_pipeline`], starting from a caller-built run.
pub fn run_pipeline_with(mut run: Run, request: &PipelineRequest) -> Result<PipelineReport> {
    let format = resolve_format(&request.input, request.format)?;
    let raw = fs::read_to_string(&request.input)
        .with_context(|| format!("read input {}", request.input.display()))?;

    let intake_start = Instant::now();
    let intake = run.intake(&raw, format);
    let span = info_span!("pipeline", run_id = %run.run_id());
    let _guard = span.enter();
    info!(
        input = %request.input.display(),
        format = %format,
        ok = intake.ok,
        records = intake.total,
        duration_ms = intake_start.elapsed().as_millis(),
        "intake finished"
    );
    for entry in run.quarantined() {
        debug!(
            record_id = %entry.record.id,
            patient_id = redact_value(&entry.record.patient_id),
            "record quarantined"
        );
    }

    let mut reconciled = false;
    if intake.ok {
        let process_start = Instant::now();
        let processed = run.process()?;
        info!(
            processed,
            duration_ms = process_start.elapsed().as_millis(),
            "processing finished"
        );
        if request.reconcile {
            let reconcile_start = Instant::now();
            let acks = run.reconcile(request.options.sla_threshold_ms)?;
            info!(
                acks,
                duration_ms = reconcile_start.elapsed().as_millis(),
                "reconciliation finished"
            );
            reconciled = true;
        }
    }

    let audit_files = match &request.output_dir {
        Some(dir) => Some(write_audit(&run, dir)?),
        None => None,
    };

    Ok(PipelineReport {
        run_id: run.run_id().to_string(),
        input: request.input.clone(),
        format,
        sla_threshold_ms: request.options.sla_threshold_ms,
        intake,
        errors: run.errors().to_vec(),
        metrics: run.metrics(),
        reconciled,
        audit_files,
    })
}

/// Write both audit exports into `dir`, creating it when needed.
pub fn write_audit(run: &Run, dir: &Path) -> Result<AuditFiles> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let files = AuditFiles {
        csv: dir.join(AUDIT_CSV_FILE),
        json: dir.join(AUDIT_JSON_FILE),
    };
    let csv = run.export_audit_csv().context("export audit csv")?;
    fs::write(&files.csv, csv).with_context(|| format!("write {}", files.csv.display()))?;
    let json = run.export_audit_json().context("export audit json")?;
    fs::write(&files.json, json).with_context(|| format!("write {}", files.json.display()))?;
    info!(
        entries = run.audit().len(),
        dir = %dir.display(),
        "audit written"
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_format_wins() {
        let format = resolve_format(Path::new("batch.json"), Some(InputFormat::Tree)).unwrap();
        assert_eq!(format, InputFormat::Tree);
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            resolve_format(Path::new("in/batch.XML"), None).unwrap(),
            InputFormat::Tree
        );
        assert_eq!(
            resolve_format(Path::new("batch.json"), None).unwrap(),
            InputFormat::List
        );
        assert!(resolve_format(Path::new("batch.txt"), None).is_err());
        assert!(resolve_format(Path::new("batch"), None).is_err());
    }
}
