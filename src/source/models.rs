//! Data model for probe samples consumed from the ops API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a single probe execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Success,
    Failed,
    Timeout,
}

/// Protocol a probe checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Websocket,
    Tcp,
    Udp,
}

/// A configured network check, owned by the server-side scheduling system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Probe {
    pub id: String,
    pub name: String,
    pub address: String,
    pub protocol: Protocol,
}

/// A single raw probe result, immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawResult {
    pub status: ProbeStatus,
    /// Response time in milliseconds; absent for results that never completed.
    pub response_time: Option<f64>,
    pub observed_at: DateTime<Utc>,
}

/// Per-status counts inside a statistics window.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StatusDistribution {
    pub success: u64,
    pub failed: u64,
    pub timeout: u64,
}

/// Aggregate statistics for a fixed trailing window, computed server-side.
///
/// This snapshot is the source of truth for request counts and success rate;
/// the bounded raw-result sample is too small to recompute them from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub total_count: u64,
    /// Percentage in 0..=100.
    pub success_rate: f64,
    pub average_response_time: f64,
    pub status_distribution: StatusDistribution,
}

/// One sampling interval inside a history range. Sequences are ordered
/// oldest first.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HistoryBucket {
    pub success_count: u64,
    pub failed_count: u64,
    pub timeout_count: u64,
    pub average_response_time: f64,
}

/// The four valid analysis time-range presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1d")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
}

impl Default for TimeRange {
    fn default() -> Self {
        TimeRange::Day
    }
}

impl TimeRange {
    pub fn days(self) -> u32 {
        match self {
            TimeRange::Day => 1,
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
        }
    }

    pub fn history_hours(self) -> u32 {
        self.days() * 24
    }

    /// Bucket width used when fetching the history series.
    pub fn bucket_interval_minutes(self) -> u32 {
        match self {
            TimeRange::Day => 60,
            TimeRange::Week => 360,
            TimeRange::Month => 1440,
            TimeRange::Quarter => 4320,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::Day => "1d",
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
            TimeRange::Quarter => "90d",
        }
    }
}
