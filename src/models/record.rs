use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::FailureReason;

/// A row of the CSV output, one per ping sent.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PingRecord {
    /// When the ping was sent.
    pub timestamp: DateTime<Utc>,
    /// Name of the sweep this ping belongs to.
    pub label: String,
    pub interface: String,
    pub target: String,
    /// ICMP payload size in bytes.
    pub size: u16,
    pub no_fragment: bool,
    pub success: bool,
    /// Empty on success.
    pub failure_reason: Option<FailureReason>,
    /// Round-trip time in milliseconds, if reported.
    pub rtt: Option<f64>,
}
