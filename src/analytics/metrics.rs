//! Metrics calculator: turns one probe's samples into a fixed metrics record.

use crate::source::{ProbeStatus, RawResult, StatisticsSnapshot};

use serde::{Deserialize, Serialize};

/// Heuristic repair time in minutes reported whenever the raw sample
/// contains any non-success result. A placeholder estimator, not a real
/// time-to-recovery computation.
const MTTR_ESTIMATE_MINUTES: f64 = 30.0;

const MINUTES_PER_DAY: f64 = 1440.0;

/// Derived reliability metrics for one probe over one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_requests: u64,
    pub success_rate: f64,
    pub avg_response_time: f64,
    pub p95_response_time: f64,
    pub p99_response_time: f64,
    pub uptime_percentage: f64,
    /// Mean time to repair, minutes.
    pub mttr: f64,
    /// Mean time between failures, minutes.
    pub mtbf: f64,
}

impl Metrics {
    /// All-zero record used when a probe's fetch failed this run.
    pub fn zeroed() -> Self {
        Self {
            total_requests: 0,
            success_rate: 0.0,
            avg_response_time: 0.0,
            p95_response_time: 0.0,
            p99_response_time: 0.0,
            uptime_percentage: 0.0,
            mttr: 0.0,
            mtbf: 0.0,
        }
    }
}

/// Compute the metrics record for one probe.
///
/// The snapshot is the source of truth for counts and rates; the bounded raw
/// sample only feeds the percentile and MTTR estimates. All divisions are
/// guarded so the output never contains NaN or infinities.
pub fn compute_metrics(
    snapshot: &StatisticsSnapshot,
    recent: &[RawResult],
    range_days: u32,
) -> Metrics {
    let (p95, p99) = response_time_percentiles(recent);

    let uptime_percentage = if snapshot.total_count > 0 {
        100.0 * snapshot.status_distribution.success as f64 / snapshot.total_count as f64
    } else {
        0.0
    };

    let mttr = if recent.iter().any(|r| r.status != ProbeStatus::Success) {
        MTTR_ESTIMATE_MINUTES
    } else {
        0.0
    };

    let range_minutes = range_days as f64 * MINUTES_PER_DAY;
    let failures = snapshot.status_distribution.failed + snapshot.status_distribution.timeout;
    // No failures in the window is reported as an MTBF of the whole window.
    let mtbf = if failures > 0 {
        range_minutes / failures as f64
    } else {
        range_minutes
    };

    Metrics {
        total_requests: snapshot.total_count,
        success_rate: snapshot.success_rate,
        avg_response_time: snapshot.average_response_time,
        p95_response_time: p95,
        p99_response_time: p99,
        uptime_percentage,
        mttr,
        mtbf,
    }
}

/// p95/p99 over successful samples that carry a response time.
///
/// Values are sorted ascending and picked at index `⌊q·n⌋`. An empty
/// qualifying set yields (0, 0) by definition, not an error.
fn response_time_percentiles(recent: &[RawResult]) -> (f64, f64) {
    let mut times: Vec<f64> = recent
        .iter()
        .filter(|r| r.status == ProbeStatus::Success)
        .filter_map(|r| r.response_time)
        .collect();

    if times.is_empty() {
        return (0.0, 0.0);
    }

    times.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = times.len();
    let index_at = |q: f64| ((q * n as f64) as usize).min(n - 1);

    (times[index_at(0.95)], times[index_at(0.99)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StatusDistribution;
    use chrono::Utc;

    fn sample(status: ProbeStatus, response_time: Option<f64>) -> RawResult {
        RawResult {
            status,
            response_time,
            observed_at: Utc::now(),
        }
    }

    fn snapshot(total: u64, success_rate: f64, avg: f64, failed: u64, timeout: u64) -> StatisticsSnapshot {
        StatisticsSnapshot {
            total_count: total,
            success_rate,
            average_response_time: avg,
            status_distribution: StatusDistribution {
                success: total - failed - timeout,
                failed,
                timeout,
            },
        }
    }

    #[test]
    fn test_percentiles_from_fifty_samples() {
        // 50 successful samples with response times 1..50ms.
        let recent: Vec<RawResult> = (1..=50)
            .map(|i| sample(ProbeStatus::Success, Some(i as f64)))
            .collect();

        let metrics = compute_metrics(&snapshot(100, 97.0, 200.0, 0, 0), &recent, 1);

        // floor(0.95 * 50) = 47 -> 48th smallest; floor(0.99 * 50) = 49.
        assert_eq!(metrics.p95_response_time, 48.0);
        assert_eq!(metrics.p99_response_time, 50.0);
    }

    #[test]
    fn test_percentiles_ignore_failures_and_missing_times() {
        let recent = vec![
            sample(ProbeStatus::Success, Some(10.0)),
            sample(ProbeStatus::Failed, Some(9000.0)),
            sample(ProbeStatus::Timeout, None),
            sample(ProbeStatus::Success, None),
        ];

        let metrics = compute_metrics(&snapshot(4, 50.0, 10.0, 1, 1), &recent, 1);
        assert_eq!(metrics.p95_response_time, 10.0);
        assert_eq!(metrics.p99_response_time, 10.0);
    }

    #[test]
    fn test_empty_samples_yield_zero_percentiles() {
        let metrics = compute_metrics(&snapshot(0, 0.0, 0.0, 0, 0), &[], 7);
        assert_eq!(metrics.p95_response_time, 0.0);
        assert_eq!(metrics.p99_response_time, 0.0);
    }

    #[test]
    fn test_counts_come_from_snapshot_not_raw_sample() {
        let recent = vec![sample(ProbeStatus::Success, Some(5.0))];
        let metrics = compute_metrics(&snapshot(100, 97.0, 200.0, 3, 0), &recent, 1);

        assert_eq!(metrics.total_requests, 100);
        assert_eq!(metrics.success_rate, 97.0);
        assert_eq!(metrics.avg_response_time, 200.0);
    }

    #[test]
    fn test_uptime_bounds() {
        let metrics = compute_metrics(&snapshot(100, 97.0, 200.0, 3, 0), &[], 1);
        assert_eq!(metrics.uptime_percentage, 97.0);

        let empty = compute_metrics(&snapshot(0, 0.0, 0.0, 0, 0), &[], 1);
        assert_eq!(empty.uptime_percentage, 0.0);
        assert!(empty.uptime_percentage.is_finite());
    }

    #[test]
    fn test_mttr_heuristic() {
        let healthy = vec![sample(ProbeStatus::Success, Some(5.0))];
        assert_eq!(compute_metrics(&snapshot(10, 100.0, 5.0, 0, 0), &healthy, 1).mttr, 0.0);

        let degraded = vec![
            sample(ProbeStatus::Success, Some(5.0)),
            sample(ProbeStatus::Timeout, None),
        ];
        assert_eq!(compute_metrics(&snapshot(10, 90.0, 5.0, 0, 1), &degraded, 1).mttr, 30.0);
    }

    #[test]
    fn test_mtbf_spans_window_when_no_failures() {
        let metrics = compute_metrics(&snapshot(100, 100.0, 50.0, 0, 0), &[], 7);
        assert_eq!(metrics.mtbf, 7.0 * 1440.0);
    }

    #[test]
    fn test_mtbf_divides_window_by_failure_count() {
        let metrics = compute_metrics(&snapshot(100, 96.0, 50.0, 3, 1), &[], 1);
        assert_eq!(metrics.mtbf, 1440.0 / 4.0);
    }

    #[test]
    fn test_no_nan_or_infinity_on_empty_inputs() {
        let metrics = compute_metrics(&snapshot(0, 0.0, 0.0, 0, 0), &[], 1);
        for value in [
            metrics.success_rate,
            metrics.avg_response_time,
            metrics.p95_response_time,
            metrics.p99_response_time,
            metrics.uptime_percentage,
            metrics.mttr,
            metrics.mtbf,
        ] {
            assert!(value.is_finite());
        }
    }
}
