//! Anomaly detector: threshold checks over the current run's statistics.

use crate::source::StatisticsSnapshot;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Average response time above this (ms) flags a latency spike.
const SPIKE_THRESHOLD_MS: f64 = 1000.0;

/// Success rate below this flags a reliability drop.
const DROP_THRESHOLD: f64 = 95.0;

/// Success rate below this escalates a drop to high severity.
const DROP_HIGH_THRESHOLD: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    Spike,
    Drop,
    /// Reserved; no detection rule currently produces it.
    Outage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A threshold violation observed during one analysis run. Each run
/// replaces the prior list entirely; anomalies are a snapshot, not a log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub observed_at: DateTime<Utc>,
    pub description: String,
    pub severity: Severity,
}

/// Scan the snapshot for threshold violations. Both rules fire
/// independently, so a probe yields zero, one or two anomalies per run.
pub fn detect_anomalies(snapshot: &StatisticsSnapshot) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();
    let now = Utc::now();

    if snapshot.average_response_time > SPIKE_THRESHOLD_MS {
        anomalies.push(Anomaly {
            kind: AnomalyKind::Spike,
            observed_at: now,
            description: format!(
                "average response time {:.0}ms exceeds {:.0}ms",
                snapshot.average_response_time, SPIKE_THRESHOLD_MS
            ),
            severity: Severity::High,
        });
    }

    if snapshot.success_rate < DROP_THRESHOLD {
        let severity = if snapshot.success_rate < DROP_HIGH_THRESHOLD {
            Severity::High
        } else {
            Severity::Medium
        };
        anomalies.push(Anomaly {
            kind: AnomalyKind::Drop,
            observed_at: now,
            description: format!(
                "success rate {:.1}% below {:.0}%",
                snapshot.success_rate, DROP_THRESHOLD
            ),
            severity,
        });
    }

    anomalies
}
