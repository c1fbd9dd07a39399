//! SLA evaluator: fixed availability and latency targets per probe.

use super::Metrics;

use serde::{Deserialize, Serialize};

/// Availability target, percent. Not configurable per probe.
pub const AVAILABILITY_TARGET: f64 = 99.9;

/// Response time target, milliseconds. Not configurable per probe.
pub const RESPONSE_TIME_TARGET: f64 = 500.0;

/// Compliance verdict for one probe over one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlaStatus {
    pub availability_target: f64,
    pub availability_actual: f64,
    pub response_time_target: f64,
    pub response_time_actual: f64,
    pub is_meeting_sla: bool,
}

impl SlaStatus {
    /// Verdict for a probe with no data this run; never compliant.
    pub fn failed() -> Self {
        Self {
            availability_target: AVAILABILITY_TARGET,
            availability_actual: 0.0,
            response_time_target: RESPONSE_TIME_TARGET,
            response_time_actual: 0.0,
            is_meeting_sla: false,
        }
    }
}

/// Both conditions are required; the thresholds are inclusive.
pub fn evaluate_sla(metrics: &Metrics) -> SlaStatus {
    let is_meeting_sla = metrics.uptime_percentage >= AVAILABILITY_TARGET
        && metrics.avg_response_time <= RESPONSE_TIME_TARGET;

    SlaStatus {
        availability_target: AVAILABILITY_TARGET,
        availability_actual: metrics.uptime_percentage,
        response_time_target: RESPONSE_TIME_TARGET,
        response_time_actual: metrics.avg_response_time,
        is_meeting_sla,
    }
}
