//! Append-only audit log.

use lims_model::{AuditEntry, AuditStage, AuditStatus};
use lims_report::{audit_to_csv, audit_to_json};
use thiserror::Error;

/// A stored entry whose checksum no longer matches its content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("audit entry {index} checksum mismatch: stored {stored}, computed {computed}")]
pub struct IntegrityError {
    pub index: usize,
    pub stored: u32,
    pub computed: u32,
}

/// Ordered audit entries for one run. Entries can be appended and read,
/// never edited or removed.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp and append one entry.
    pub fn append(
        &mut self,
        time: String,
        run_id: &str,
        stage: AuditStage,
        status: AuditStatus,
        record_id: &str,
        notes: String,
    ) -> &AuditEntry {
        let index = self.entries.len();
        self.entries.push(AuditEntry::stamped(
            time, run_id, stage, status, record_id, notes,
        ));
        &self.entries[index]
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recompute every checksum and report the first mismatch.
    pub fn verify(&self) -> Result<(), IntegrityError> {
        for (index, entry) in self.entries.iter().enumerate() {
            let computed = AuditEntry::compute_checksum(
                &entry.run_id,
                entry.stage,
                &entry.record_id,
                &entry.notes,
            );
            if computed != entry.checksum {
                return Err(IntegrityError {
                    index,
                    stored: entry.checksum,
                    computed,
                });
            }
        }
        Ok(())
    }

    pub fn to_csv(&self) -> lims_report::Result<String> {
        audit_to_csv(&self.entries)
    }

    pub fn to_json(&self) -> lims_report::Result<String> {
        audit_to_json(&self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lims_model::content_hash;

    #[test]
    fn append_stamps_and_keeps_order() {
        let mut log = AuditLog::new();
        log.append(
            "t0".to_string(),
            "run-9",
            AuditStage::Intake,
            AuditStatus::Ok,
            "-",
            "parsed 0 records (format=tree)".to_string(),
        );
        let entry = log.append(
            "t1".to_string(),
            "run-9",
            AuditStage::Validate,
            AuditStatus::Ok,
            "-",
            "valid=0 quarantined=0 errors=0".to_string(),
        );
        assert_eq!(
            entry.checksum,
            content_hash("run-9|validate|-|valid=0 quarantined=0 errors=0")
        );
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].stage, AuditStage::Intake);
        assert!(log.verify().is_ok());
    }

    #[test]
    fn verify_reports_first_tampered_entry() {
        let mut log = AuditLog::new();
        for n in 0..3 {
            log.append(
                format!("t{n}"),
                "run-9",
                AuditStage::Process,
                AuditStatus::Ok,
                &format!("S-{n:04}"),
                format!("post={n}"),
            );
        }
        let mut tampered = log.clone();
        tampered.entries[1].notes = "post=999".to_string();
        let err = tampered.verify().unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.stored, log.entries()[1].checksum);
    }
}
