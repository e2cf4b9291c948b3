//! Simulated downstream acknowledgment.

use serde::{Deserialize, Serialize};

/// Outcome of the acknowledgment simulation for one processed sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AckResult {
    pub record_id: String,
    pub ok: bool,
    /// 200 when acknowledged, 500 otherwise.
    pub ack_code: u16,
    pub delay_ms: u32,
    pub sla_met: bool,
}

impl AckResult {
    pub const ACK_OK: u16 = 200;
    pub const ACK_FAILED: u16 = 500;
}
