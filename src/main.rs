//! ProbeScope - Probe Performance Analytics Service
//!
//! Derives reliability metrics, trends, anomalies, SLA verdicts and
//! pairwise comparisons from probe samples served by the remote ops API.

mod analytics;
mod config;
mod source;
mod web;

use analytics::{AnalysisOptions, AnalyticsEngine};
use config::ServerConfig;
use source::HttpSampleSource;
use web::Server;

use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("probescope=info".parse()?))
        .init();

    // Load configuration
    let cfg = ServerConfig::load();
    tracing::info!("Starting ProbeScope on port {}...", cfg.http_port);
    tracing::info!("Using ops API at {}", cfg.api_url);

    // Create the analytics engine against the remote sample source
    let source = HttpSampleSource::new(&cfg.api_url);
    let engine = Arc::new(AnalyticsEngine::new(source, AnalysisOptions::default()));

    // Initial run; a failure here is not fatal, the next run retries
    if let Err(e) = engine.run().await {
        tracing::error!("initial analysis run failed: {}", e);
    }

    // Arm the auto-refresh timer
    engine
        .enable_auto_refresh(Duration::from_secs(cfg.refresh_secs.max(1)))
        .await;

    // Start web server
    let server = Server::new(cfg, engine);
    server.start().await?;

    Ok(())
}
