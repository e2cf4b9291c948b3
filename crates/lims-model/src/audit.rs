//! Audit trail entries.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::checksum::content_hash;

/// Record id used for run-level and stage summary entries.
pub const RUN_LEVEL_RECORD_ID: &str = "-";

/// Pipeline stage an audit entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStage {
    Intake,
    Validate,
    Process,
    Reconcile,
}

impl AuditStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStage::Intake => "intake",
            AuditStage::Validate => "validate",
            AuditStage::Process => "process",
            AuditStage::Reconcile => "reconcile",
        }
    }
}

impl fmt::Display for AuditStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Ok,
    Error,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Ok => "ok",
            AuditStatus::Error => "error",
        }
    }

    pub fn from_ok(ok: bool) -> Self {
        if ok { AuditStatus::Ok } else { AuditStatus::Error }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable audit trail entry.
///
/// The checksum is a per-entry content hash of
/// `runId|stage|recordId|notes`; it does not include earlier entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// RFC 3339 instant with millisecond precision.
    pub time: String,
    pub run_id: String,
    pub stage: AuditStage,
    pub status: AuditStatus,
    pub record_id: String,
    pub checksum: u32,
    pub notes: String,
}

impl AuditEntry {
    /// Build an entry and stamp it with its checksum.
    pub fn stamped(
        time: String,
        run_id: &str,
        stage: AuditStage,
        status: AuditStatus,
        record_id: &str,
        notes: String,
    ) -> Self {
        let checksum = Self::compute_checksum(run_id, stage, record_id, &notes);
        Self {
            time,
            run_id: run_id.to_string(),
            stage,
            status,
            record_id: record_id.to_string(),
            checksum,
            notes,
        }
    }

    pub fn compute_checksum(run_id: &str, stage: AuditStage, record_id: &str, notes: &str) -> u32 {
        content_hash(&format!("{run_id}|{}|{record_id}|{notes}", stage.as_str()))
    }

    /// Returns true when the stored checksum matches the entry content.
    pub fn is_intact(&self) -> bool {
        self.checksum
            == Self::compute_checksum(&self.run_id, self.stage, &self.record_id, &self.notes)
    }
}
