//! Pairwise reliability comparison across the probes of one run.

use super::AnalyticsRecord;

use serde::{Deserialize, Serialize};

/// Display-volume cap on comparison pairs, in stable input order.
pub const MAX_COMPARISONS: usize = 5;

/// Difference vector between two probes' metrics, a minus b.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonDiff {
    pub success_rate_diff: f64,
    pub response_time_diff: f64,
    pub uptime_diff: f64,
    pub reliability_score_diff: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub probe_a: String,
    pub probe_b: String,
    pub diff: ComparisonDiff,
}

/// Composite score blending success rate and inverse response time. Used
/// only for ranking comparisons, never for SLA determination.
pub fn reliability_score(success_rate: f64, avg_response_time: f64) -> f64 {
    success_rate * 0.6 + (1000.0 / avg_response_time.max(1.0)) * 0.4
}

/// Compare every unordered pair (i, j) with i < j in input order, keeping
/// the first `MAX_COMPARISONS` pairs.
pub fn compare_all(records: &[AnalyticsRecord]) -> Vec<ComparisonRecord> {
    let mut comparisons = Vec::new();

    'outer: for (i, a) in records.iter().enumerate() {
        for b in records.iter().skip(i + 1) {
            comparisons.push(compare_pair(a, b));
            if comparisons.len() >= MAX_COMPARISONS {
                break 'outer;
            }
        }
    }

    comparisons
}

fn compare_pair(a: &AnalyticsRecord, b: &AnalyticsRecord) -> ComparisonRecord {
    let score_a = reliability_score(a.metrics.success_rate, a.metrics.avg_response_time);
    let score_b = reliability_score(b.metrics.success_rate, b.metrics.avg_response_time);

    ComparisonRecord {
        probe_a: a.probe_id.clone(),
        probe_b: b.probe_id.clone(),
        diff: ComparisonDiff {
            success_rate_diff: a.metrics.success_rate - b.metrics.success_rate,
            response_time_diff: a.metrics.avg_response_time - b.metrics.avg_response_time,
            uptime_diff: a.metrics.uptime_percentage - b.metrics.uptime_percentage,
            reliability_score_diff: score_a - score_b,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{Metrics, SlaStatus, TrendSet};

    fn record(id: &str, success_rate: f64, avg_response_time: f64, uptime: f64) -> AnalyticsRecord {
        AnalyticsRecord {
            probe_id: id.to_string(),
            probe_name: id.to_string(),
            metrics: Metrics {
                success_rate,
                avg_response_time,
                uptime_percentage: uptime,
                ..Metrics::zeroed()
            },
            trends: TrendSet::default(),
            anomalies: Vec::new(),
            sla: SlaStatus::failed(),
        }
    }

    #[test]
    fn test_reliability_score_blend() {
        assert!((reliability_score(99.0, 100.0) - 63.4).abs() < 1e-9);
        // max(.., 1) guards the inverse-latency term.
        assert_eq!(reliability_score(50.0, 0.0), 50.0 * 0.6 + 1000.0 * 0.4);
    }

    #[test]
    fn test_diff_fields_and_composite() {
        let a = record("a", 99.0, 100.0, 99.5);
        let b = record("b", 95.0, 300.0, 98.0);

        let comparisons = compare_all(&[a, b]);
        assert_eq!(comparisons.len(), 1);

        let diff = &comparisons[0].diff;
        assert_eq!(diff.success_rate_diff, 4.0);
        assert_eq!(diff.response_time_diff, -200.0);
        assert_eq!(diff.uptime_diff, 1.5);
        // composite(a) = 63.4, composite(b) ≈ 58.333
        assert!((diff.reliability_score_diff - 5.0666666).abs() < 1e-4);
    }

    #[test]
    fn test_swapped_order_negates_every_field() {
        let a = record("a", 99.0, 100.0, 99.5);
        let b = record("b", 95.0, 300.0, 98.0);

        let forward = &compare_all(&[a.clone(), b.clone()])[0].diff;
        let reverse = &compare_all(&[b, a])[0].diff;

        assert_eq!(forward.success_rate_diff, -reverse.success_rate_diff);
        assert_eq!(forward.response_time_diff, -reverse.response_time_diff);
        assert_eq!(forward.uptime_diff, -reverse.uptime_diff);
        assert_eq!(forward.reliability_score_diff, -reverse.reliability_score_diff);
    }

    #[test]
    fn test_pair_order_and_cap() {
        // 4 probes produce 6 unordered pairs; only the first 5 are kept.
        let records: Vec<AnalyticsRecord> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| record(id, 99.0, 100.0, 99.0))
            .collect();

        let comparisons = compare_all(&records);
        assert_eq!(comparisons.len(), MAX_COMPARISONS);

        let pairs: Vec<(&str, &str)> = comparisons
            .iter()
            .map(|c| (c.probe_a.as_str(), c.probe_b.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("a", "b"), ("a", "c"), ("a", "d"), ("b", "c"), ("b", "d")]
        );
    }

    #[test]
    fn test_fewer_than_two_records_yield_nothing() {
        assert!(compare_all(&[]).is_empty());
        assert!(compare_all(&[record("a", 99.0, 100.0, 99.0)]).is_empty());
    }
}
