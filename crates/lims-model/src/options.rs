//! Tunable pipeline settings.

use serde::{Deserialize, Serialize};

/// Settings that shape a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Acknowledgment delay (ms) above which the SLA counts as breached.
    pub sla_threshold_ms: u32,
}

impl PipelineOptions {
    pub const DEFAULT_SLA_THRESHOLD_MS: u32 = 1500;

    #[must_use]
    pub fn with_sla_threshold_ms(mut self, threshold: u32) -> Self {
        self.sla_threshold_ms = threshold;
        self
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            sla_threshold_ms: Self::DEFAULT_SLA_THRESHOLD_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_threshold() {
        assert_eq!(PipelineOptions::default().sla_threshold_ms, 1500);
        assert_eq!(
            PipelineOptions::default()
                .with_sla_threshold_ms(900)
                .sla_threshold_ms,
            900
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let options: PipelineOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, PipelineOptions::default());
    }
}
