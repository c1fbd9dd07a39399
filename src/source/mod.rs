//! Sample source for probe data.
//!
//! The engine never executes probes itself; it consumes aggregate
//! statistics, bucketed history and recent raw results from the ops API.

mod http;
mod models;

pub use http::*;
pub use models::*;

use std::future::Future;
use thiserror::Error;

/// Maximum number of recent raw results fetched per probe.
pub const RESULT_SAMPLE_LIMIT: usize = 100;

/// Sample source error types.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected status {0} from {1}")]
    Status(u16, String),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Read-only access to one probe's sample data for a configured time range.
///
/// Every call may fail independently; callers decide whether a failure is
/// recoverable. Futures are `Send` so per-probe fetches can be spawned.
pub trait SampleSource: Send + Sync + 'static {
    /// List the known probe directory.
    fn list_probes(&self) -> impl Future<Output = Result<Vec<Probe>, SourceError>> + Send;

    /// Aggregate statistics for the trailing `range_days` window.
    fn get_statistics(
        &self,
        probe_id: &str,
        range_days: u32,
    ) -> impl Future<Output = Result<StatisticsSnapshot, SourceError>> + Send;

    /// Bucketed history series, ordered oldest first.
    fn get_history(
        &self,
        probe_id: &str,
        range_hours: u32,
        bucket_interval_minutes: u32,
    ) -> impl Future<Output = Result<Vec<HistoryBucket>, SourceError>> + Send;

    /// Most recent raw results, capped at `limit`.
    fn get_results(
        &self,
        probe_id: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<RawResult>, SourceError>> + Send;
}
