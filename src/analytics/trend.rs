//! Trend classifier: compares the recent slice of the history series
//! against the slice immediately before it.

use crate::source::HistoryBucket;

use serde::{Deserialize, Serialize};

/// Buckets per comparison window.
const WINDOW_BUCKETS: usize = 24;

/// Minimum success-rate movement, in percentage points, to leave `Stable`.
const SUCCESS_RATE_THRESHOLD: f64 = 1.0;

/// Minimum response-time movement, in milliseconds, to leave `Stable`.
const RESPONSE_TIME_THRESHOLD: f64 = 10.0;

/// Direction of a metric between the earlier and recent windows.
/// `Up` always means improving; for response time that is getting faster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Trend labels for the three independent axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendSet {
    pub success_rate: Trend,
    pub response_time: Trend,
    pub availability: Trend,
}

impl Default for TrendSet {
    fn default() -> Self {
        Self {
            success_rate: Trend::Stable,
            response_time: Trend::Stable,
            availability: Trend::Stable,
        }
    }
}

/// Classify the trend axes from a history series ordered oldest first.
///
/// Deterministic and side-effect free; short series simply shrink one or
/// both windows, and an empty window averages to 0.
pub fn classify_trends(history: &[HistoryBucket]) -> TrendSet {
    let n = history.len();
    let recent = &history[n.saturating_sub(WINDOW_BUCKETS)..];
    let earlier = &history[n.saturating_sub(2 * WINDOW_BUCKETS)..n.saturating_sub(WINDOW_BUCKETS)];

    let recent_rate = avg_success_rate(recent);
    let earlier_rate = avg_success_rate(earlier);

    let recent_time = avg_response_time(recent);
    let earlier_time = avg_response_time(earlier);

    let success_rate = if (recent_rate - earlier_rate).abs() < SUCCESS_RATE_THRESHOLD {
        Trend::Stable
    } else if recent_rate > earlier_rate {
        Trend::Up
    } else {
        Trend::Down
    };

    // Faster responses are an improvement, so lower recent time reads "up".
    let response_time = if (recent_time - earlier_time).abs() < RESPONSE_TIME_THRESHOLD {
        Trend::Stable
    } else if recent_time < earlier_time {
        Trend::Up
    } else {
        Trend::Down
    };

    TrendSet {
        success_rate,
        response_time,
        // Same inputs and thresholds as the success-rate axis.
        availability: success_rate,
    }
}

/// Mean per-bucket success rate in percent; empty buckets count as 0.
fn avg_success_rate(window: &[HistoryBucket]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }

    let sum: f64 = window
        .iter()
        .map(|b| {
            let total = b.success_count + b.failed_count + b.timeout_count;
            if total > 0 {
                100.0 * b.success_count as f64 / total as f64
            } else {
                0.0
            }
        })
        .sum();

    sum / window.len() as f64
}

fn avg_response_time(window: &[HistoryBucket]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }

    let sum: f64 = window.iter().map(|b| b.average_response_time).sum();
    sum / window.len() as f64
}
