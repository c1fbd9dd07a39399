//! HTTP implementation of the sample source against the remote ops API.

use super::{
    HistoryBucket, Probe, RawResult, SampleSource, SourceError, StatisticsSnapshot,
};

use serde::de::DeserializeOwned;

/// Sample source backed by the ops API over HTTP.
///
/// No retries and no engine-side timeout; the client's own timeout behavior
/// applies and a failed call surfaces as a `SourceError` for that probe only.
#[derive(Debug, Clone)]
pub struct HttpSampleSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSampleSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, SourceError> {
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16(), url));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))
    }
}

impl SampleSource for HttpSampleSource {
    async fn list_probes(&self) -> Result<Vec<Probe>, SourceError> {
        self.get_json(format!("{}/api/probes", self.base_url)).await
    }

    async fn get_statistics(
        &self,
        probe_id: &str,
        range_days: u32,
    ) -> Result<StatisticsSnapshot, SourceError> {
        self.get_json(format!(
            "{}/api/probes/{}/statistics?days={}",
            self.base_url, probe_id, range_days
        ))
        .await
    }

    async fn get_history(
        &self,
        probe_id: &str,
        range_hours: u32,
        bucket_interval_minutes: u32,
    ) -> Result<Vec<HistoryBucket>, SourceError> {
        self.get_json(format!(
            "{}/api/probes/{}/history?hours={}&interval={}",
            self.base_url, probe_id, range_hours, bucket_interval_minutes
        ))
        .await
    }

    async fn get_results(
        &self,
        probe_id: &str,
        limit: usize,
    ) -> Result<Vec<RawResult>, SourceError> {
        self.get_json(format!(
            "{}/api/probes/{}/results?limit={}",
            self.base_url, probe_id, limit
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let source = HttpSampleSource::new("http://ops.example.com/");
        assert_eq!(source.base_url, "http://ops.example.com");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let source = HttpSampleSource::new("http://127.0.0.1:1");
        let err = source.list_probes().await.unwrap_err();
        assert!(matches!(err, SourceError::Transport(_)));
    }
}
