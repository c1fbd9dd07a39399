//! Probe performance analytics engine.
//!
//! The engine fans out to the sample source for every probe in scope,
//! derives metrics, trends, anomalies and SLA verdicts per probe, compares
//! probes pairwise, and atomically publishes the resulting run.

mod anomaly;
mod compare;
mod export;
mod metrics;
mod sla;
mod trend;

pub use anomaly::*;
pub use compare::*;
pub use export::*;
pub use metrics::*;
pub use sla::*;
pub use trend::*;

use crate::source::{
    HistoryBucket, Probe, Protocol, RawResult, SampleSource, SourceError, StatisticsSnapshot,
    TimeRange, RESULT_SAMPLE_LIMIT,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, Mutex, RwLock};

/// Probes analyzed per run when no explicit selection is configured.
pub const DEFAULT_PROBE_LIMIT: usize = 5;

/// Engine error types. Per-probe fetch failures are recovered inside a run
/// and never surface here.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to list probe directory: {0}")]
    ProbeDirectory(#[source] SourceError),
}

/// Full analytics for one probe over one run. Replaced wholesale on every
/// run, never merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    pub probe_id: String,
    pub probe_name: String,
    pub metrics: Metrics,
    pub trends: TrendSet,
    pub anomalies: Vec<Anomaly>,
    pub sla: SlaStatus,
}

/// Post-hoc visibility filters. They decide which records are published,
/// never which probes are fetched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordFilters {
    #[serde(default)]
    pub min_success_rate: Option<f64>,
    #[serde(default)]
    pub max_response_time: Option<f64>,
    #[serde(default)]
    pub sla_only: bool,
}

impl RecordFilters {
    fn matches(&self, record: &AnalyticsRecord) -> bool {
        if let Some(min) = self.min_success_rate {
            if record.metrics.success_rate < min {
                return false;
            }
        }
        if let Some(max) = self.max_response_time {
            if record.metrics.avg_response_time > max {
                return false;
            }
        }
        !self.sla_only || record.sla.is_meeting_sla
    }
}

/// Configuration for analysis runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisOptions {
    #[serde(default)]
    pub time_range: TimeRange,
    /// Explicit probe selection; empty means the first
    /// `DEFAULT_PROBE_LIMIT` probes in the directory.
    #[serde(default)]
    pub selected: Vec<String>,
    /// Pre-filter applied to the probe set before fetching.
    #[serde(default)]
    pub protocol: Option<Protocol>,
    #[serde(default)]
    pub filters: RecordFilters,
}

/// The atomically published output of one completed run.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedRun {
    pub run_id: u64,
    pub generated_at: DateTime<Utc>,
    pub time_range: TimeRange,
    pub records: Vec<AnalyticsRecord>,
    pub comparisons: Vec<ComparisonRecord>,
}

/// One probe's fetched inputs for a run.
struct ProbeSamples {
    statistics: StatisticsSnapshot,
    history: Vec<HistoryBucket>,
    recent: Vec<RawResult>,
}

/// Fan-out/fan-in analytics orchestrator.
///
/// A single logical run is active at a time: every run draws a fresh
/// sequence number and only the latest issued run may publish, so a stale
/// run that finishes late is discarded instead of overwriting fresher
/// results.
pub struct AnalyticsEngine<S> {
    source: Arc<S>,
    run_seq: AtomicU64,
    options: RwLock<AnalysisOptions>,
    published: RwLock<Option<PublishedRun>>,
    refresh_stop: Mutex<Option<broadcast::Sender<()>>>,
}

impl<S: SampleSource> AnalyticsEngine<S> {
    pub fn new(source: S, options: AnalysisOptions) -> Self {
        Self {
            source: Arc::new(source),
            run_seq: AtomicU64::new(0),
            options: RwLock::new(options),
            published: RwLock::new(None),
            refresh_stop: Mutex::new(None),
        }
    }

    /// Currently published analytics records.
    pub async fn records(&self) -> Vec<AnalyticsRecord> {
        self.published
            .read()
            .await
            .as_ref()
            .map(|run| run.records.clone())
            .unwrap_or_default()
    }

    /// Currently published comparison records.
    pub async fn comparisons(&self) -> Vec<ComparisonRecord> {
        self.published
            .read()
            .await
            .as_ref()
            .map(|run| run.comparisons.clone())
            .unwrap_or_default()
    }

    /// The whole published run, if any run has completed yet.
    pub async fn published(&self) -> Option<PublishedRun> {
        self.published.read().await.clone()
    }

    pub async fn options(&self) -> AnalysisOptions {
        self.options.read().await.clone()
    }

    /// Replace the analysis options. Takes effect on the next run.
    pub async fn set_options(&self, options: AnalysisOptions) {
        *self.options.write().await = options;
    }

    /// Execute one analysis run.
    ///
    /// A probe whose fetch fails stays in the run with an all-zero record;
    /// only a failure to list the probe directory fails the run as a whole,
    /// in which case previously published results are left intact.
    pub async fn run(self: &Arc<Self>) -> Result<(), EngineError> {
        let seq = self.run_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let options = self.options.read().await.clone();

        let probes = self.resolve_probes(&options).await?;
        tracing::debug!("run {}: analyzing {} probes", seq, probes.len());

        // Fan-out: one fetch task per probe, failures isolated per probe.
        let mut handles = Vec::with_capacity(probes.len());
        for probe in &probes {
            let source = Arc::clone(&self.source);
            let probe_id = probe.id.clone();
            let range = options.time_range;
            handles.push(tokio::spawn(async move {
                fetch_samples(source.as_ref(), &probe_id, range).await
            }));
        }

        // Fan-in, preserving probe order.
        let mut records = Vec::with_capacity(probes.len());
        for (probe, handle) in probes.iter().zip(handles) {
            let samples = match handle.await {
                Ok(Ok(samples)) => Some(samples),
                Ok(Err(e)) => {
                    tracing::error!("run {}: fetch failed for probe {}: {}", seq, probe.id, e);
                    None
                }
                Err(e) => {
                    tracing::error!("run {}: fetch task for probe {} aborted: {}", seq, probe.id, e);
                    None
                }
            };

            records.push(match samples {
                Some(samples) => analyze_probe(probe, &samples, options.time_range),
                None => zero_record(probe),
            });
        }

        let comparisons = compare_all(&records);
        records.retain(|r| options.filters.matches(r));

        // Publish only if no newer run has been issued meanwhile. The check
        // happens under the write lock so a stale run can never clobber a
        // fresher one.
        let mut published = self.published.write().await;
        if self.run_seq.load(Ordering::SeqCst) != seq {
            tracing::debug!("run {}: superseded, discarding results", seq);
            return Ok(());
        }

        tracing::info!(
            "run {}: published {} records, {} comparisons",
            seq,
            records.len(),
            comparisons.len()
        );
        *published = Some(PublishedRun {
            run_id: seq,
            generated_at: Utc::now(),
            time_range: options.time_range,
            records,
            comparisons,
        });

        Ok(())
    }

    /// Resolve the probe set for a run: explicit selection in directory
    /// order, else the first `DEFAULT_PROBE_LIMIT` probes, then the
    /// protocol pre-filter.
    async fn resolve_probes(&self, options: &AnalysisOptions) -> Result<Vec<Probe>, EngineError> {
        let directory = self
            .source
            .list_probes()
            .await
            .map_err(EngineError::ProbeDirectory)?;

        let mut probes: Vec<Probe> = if options.selected.is_empty() {
            directory.into_iter().take(DEFAULT_PROBE_LIMIT).collect()
        } else {
            directory
                .into_iter()
                .filter(|p| options.selected.iter().any(|id| id == &p.id))
                .collect()
        };

        if let Some(protocol) = options.protocol {
            probes.retain(|p| p.protocol == protocol);
        }

        Ok(probes)
    }

    /// Arm the auto-refresh timer, replacing any previous one. At most one
    /// timer is ever active; the first tick is consumed on arm, so the
    /// first scheduled run happens one full interval later.
    pub async fn enable_auto_refresh(self: &Arc<Self>, interval: Duration) {
        let (stop_tx, mut stop_rx) = broadcast::channel(1);
        {
            let mut stop = self.refresh_stop.lock().await;
            if let Some(old) = stop.replace(stop_tx) {
                let _ = old.send(());
            }
        }

        tracing::info!("auto-refresh armed every {:?}", interval);

        let engine = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = stop_rx.recv() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = engine.run().await {
                            tracing::error!("scheduled analysis run failed: {}", e);
                        }
                    }
                }
            }
        });
    }

    /// The single authoritative cancel path for the auto-refresh timer.
    pub async fn disable_auto_refresh(&self) {
        let mut stop = self.refresh_stop.lock().await;
        if let Some(stop_tx) = stop.take() {
            let _ = stop_tx.send(());
            tracing::info!("auto-refresh disabled");
        }
    }
}

async fn fetch_samples<S: SampleSource>(
    source: &S,
    probe_id: &str,
    range: TimeRange,
) -> Result<ProbeSamples, SourceError> {
    let (statistics, history, recent) = tokio::join!(
        source.get_statistics(probe_id, range.days()),
        source.get_history(probe_id, range.history_hours(), range.bucket_interval_minutes()),
        source.get_results(probe_id, RESULT_SAMPLE_LIMIT),
    );

    Ok(ProbeSamples {
        statistics: statistics?,
        history: history?,
        recent: recent?,
    })
}

fn analyze_probe(probe: &Probe, samples: &ProbeSamples, range: TimeRange) -> AnalyticsRecord {
    let metrics = compute_metrics(&samples.statistics, &samples.recent, range.days());
    let trends = classify_trends(&samples.history);
    let anomalies = detect_anomalies(&samples.statistics);
    let sla = evaluate_sla(&metrics);

    AnalyticsRecord {
        probe_id: probe.id.clone(),
        probe_name: probe.name.clone(),
        metrics,
        trends,
        anomalies,
        sla,
    }
}

/// Record for a probe with no data this run.
fn zero_record(probe: &Probe) -> AnalyticsRecord {
    AnalyticsRecord {
        probe_id: probe.id.clone(),
        probe_name: probe.name.clone(),
        metrics: Metrics::zeroed(),
        trends: TrendSet::default(),
        anomalies: Vec::new(),
        sla: SlaStatus::failed(),
    }
}
