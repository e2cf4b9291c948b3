//! Error types for run orchestration.

use lims_model::AuditStage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    /// A stage was invoked before its prerequisite completed.
    #[error("cannot {stage}: the {prerequisite} stage has not completed")]
    StageNotReady {
        stage: AuditStage,
        prerequisite: AuditStage,
    },
}

pub type Result<T> = std::result::Result<T, RunError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RunError::StageNotReady {
            stage: AuditStage::Reconcile,
            prerequisite: AuditStage::Process,
        };
        assert_eq!(
            err.to_string(),
            "cannot reconcile: the process stage has not completed"
        );
    }
}
