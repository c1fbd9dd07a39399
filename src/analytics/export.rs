//! Snapshot export: serializes a published run to a downloadable artifact.

use super::{AnalyticsRecord, ComparisonRecord, PublishedRun};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Summary aggregates averaged over the exported records.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub probe_count: usize,
    pub avg_success_rate: f64,
    pub avg_response_time: f64,
    pub avg_uptime: f64,
    pub meeting_sla_count: usize,
}

/// Downloadable snapshot of one published run. Pure serialization; the only
/// computation is the summary averaging.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSnapshot {
    pub generated_at: DateTime<Utc>,
    pub time_range: &'static str,
    pub analysis_type: &'static str,
    pub summary: ExportSummary,
    pub records: Vec<AnalyticsRecord>,
    pub comparisons: Vec<ComparisonRecord>,
}

pub fn build_export(run: &PublishedRun) -> ExportSnapshot {
    ExportSnapshot {
        generated_at: Utc::now(),
        time_range: run.time_range.label(),
        analysis_type: "performance",
        summary: summarize(&run.records),
        records: run.records.clone(),
        comparisons: run.comparisons.clone(),
    }
}

fn summarize(records: &[AnalyticsRecord]) -> ExportSummary {
    let count = records.len();
    let avg = |f: fn(&AnalyticsRecord) -> f64| -> f64 {
        if count == 0 {
            0.0
        } else {
            records.iter().map(f).sum::<f64>() / count as f64
        }
    };

    ExportSummary {
        probe_count: count,
        avg_success_rate: avg(|r| r.metrics.success_rate),
        avg_response_time: avg(|r| r.metrics.avg_response_time),
        avg_uptime: avg(|r| r.metrics.uptime_percentage),
        meeting_sla_count: records.iter().filter(|r| r.sla.is_meeting_sla).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{Metrics, SlaStatus, TrendSet};
    use crate::source::TimeRange;

    fn record(success_rate: f64, avg_response_time: f64, uptime: f64, meets: bool) -> AnalyticsRecord {
        AnalyticsRecord {
            probe_id: "p".to_string(),
            probe_name: "p".to_string(),
            metrics: Metrics {
                success_rate,
                avg_response_time,
                uptime_percentage: uptime,
                ..Metrics::zeroed()
            },
            trends: TrendSet::default(),
            anomalies: Vec::new(),
            sla: SlaStatus {
                is_meeting_sla: meets,
                ..SlaStatus::failed()
            },
        }
    }

    fn run(records: Vec<AnalyticsRecord>) -> PublishedRun {
        PublishedRun {
            run_id: 1,
            generated_at: Utc::now(),
            time_range: TimeRange::Week,
            records,
            comparisons: Vec::new(),
        }
    }

    #[test]
    fn test_summary_averages() {
        let export = build_export(&run(vec![
            record(99.0, 100.0, 99.5, true),
            record(95.0, 300.0, 98.5, false),
        ]));

        assert_eq!(export.time_range, "7d");
        assert_eq!(export.analysis_type, "performance");
        assert_eq!(export.summary.probe_count, 2);
        assert_eq!(export.summary.avg_success_rate, 97.0);
        assert_eq!(export.summary.avg_response_time, 200.0);
        assert_eq!(export.summary.avg_uptime, 99.0);
        assert_eq!(export.summary.meeting_sla_count, 1);
    }

    #[test]
    fn test_empty_run_exports_zero_summary() {
        let export = build_export(&run(Vec::new()));
        assert_eq!(export.summary.probe_count, 0);
        assert_eq!(export.summary.avg_success_rate, 0.0);
        assert!(export.summary.avg_response_time.is_finite());
    }

    #[test]
    fn test_export_serializes() {
        let export = build_export(&run(vec![record(99.0, 100.0, 99.5, true)]));
        let json = serde_json::to_string(&export).unwrap();
        assert!(json.contains("\"analysis_type\":\"performance\""));
        assert!(json.contains("\"time_range\":\"7d\""));
    }
}
